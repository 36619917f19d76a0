// Copyright (C) 2024 Ethan Uppal. All rights reserved.

use std::process::ExitCode;

use anyhow::Context;
use argh::FromArgs;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use wordvm::{Program, StdTerminal, VM};

#[derive(FromArgs)]
/// Runs a program image. Lines typed as `save` or `load` snapshot and
/// restore the machine instead of reaching the program.
struct Arguments {
    /// the program image, little-endian 16-bit words
    #[argh(positional)]
    image: String,

    /// log level: off, error, warn, info, debug, or trace
    /// `RUST_LOG` takes precedence when set
    #[argh(option, default = "LevelFilter::Warn")]
    log_level: LevelFilter,

    /// stop after this many instructions
    /// if not specified, runs until the program halts
    #[argh(option)]
    max_steps: Option<u64>,
}

fn main() -> anyhow::Result<ExitCode> {
    let arguments = argh::from_env::<Arguments>();

    SimpleLogger::new()
        .with_level(arguments.log_level)
        .env()
        .init()
        .context("failed to install logger")?;

    let program = Program::from_file(&arguments.image)
        .with_context(|| format!("failed to load {}", arguments.image))?;
    log::info!("loaded {} words from {}", program.len(), arguments.image);

    let mut vm = VM::new(&program, StdTerminal::new());
    let halted = vm
        .run_for(arguments.max_steps.unwrap_or(u64::MAX))
        .context("execution aborted")?;

    if halted {
        Ok(ExitCode::SUCCESS)
    } else {
        log::warn!(
            "stopped after {} instructions without halting, at address {}",
            vm.steps(),
            vm.ip()
        );
        Ok(ExitCode::from(2))
    }
}
