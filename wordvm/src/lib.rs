// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

//! A virtual machine over 16-bit memory words and 15-bit values.
//!
//! Memory holds 32768 words shared by code and data. Eight registers and an
//! unbounded stack hold values in `0..32768`. An operand word below 32768 is
//! a literal; `32768..=32775` names a register.

#![forbid(unsafe_code)]

pub mod arch;
pub mod error;
pub mod io;
pub mod memory;
pub mod op;
pub mod operand;
pub mod program;
pub mod registers;
pub mod snapshot;
pub mod stack;
pub mod state;
pub mod vm;

pub use error::{ExecutionError, ProgramError, VMError};
pub use io::{ScriptedTerminal, StdTerminal, StreamTerminal, Terminal};
pub use program::Program;
pub use vm::VM;
