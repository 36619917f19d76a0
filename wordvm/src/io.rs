// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

//! Character I/O between a running program and whatever drives it.

use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

use crate::{arch::NEWLINE, error::VMError};

/// The line-oriented transport behind `in` and `out`.
///
/// Lines are raw bytes: every byte of the line reaches the program as a
/// character code, whether or not the line is valid UTF-8.
pub trait Terminal {
    /// Blocks for the next line, without its terminator. `None` means the
    /// input has ended.
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>>;

    fn write_byte(&mut self, byte: u8) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

/// A [`Terminal`] over a buffered reader and a writer.
///
/// Every byte written is flushed immediately, so prompts without a trailing
/// newline show up before the program asks for input.
pub struct StreamTerminal<R, W> {
    input: R,
    output: W,
}

/// Standard input and output.
pub type StdTerminal =
    StreamTerminal<io::StdinLock<'static>, io::StdoutLock<'static>>;

impl StdTerminal {
    pub fn new() -> Self {
        Self::from_streams(io::stdin().lock(), io::stdout().lock())
    }
}

impl Default for StdTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> StreamTerminal<R, W> {
    pub fn from_streams(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Terminal for StreamTerminal<R, W> {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        self.output.flush()?;

        let mut line = vec![];
        if self.input.read_until(NEWLINE, &mut line)? == 0 {
            return Ok(None);
        }
        strip_terminator(&mut line);
        Ok(Some(line))
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.output.write_all(&[byte])?;
        self.output.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

/// Canned input lines and captured output, for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct ScriptedTerminal {
    input: VecDeque<Vec<u8>>,
    output: Vec<u8>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: vec![],
        }
    }

    pub fn push_line(&mut self, line: impl Into<Vec<u8>>) {
        self.input.push_back(line.into());
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Lines not yet consumed.
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Terminal for ScriptedTerminal {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.input.pop_front())
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.output.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Drops a trailing `\n` or `\r\n`.
fn strip_terminator(line: &mut Vec<u8>) {
    if line.last() == Some(&NEWLINE) {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}

/// Line-buffered input and unbuffered output over a [`Terminal`].
///
/// Input is handed out one byte at a time. A line is only requested once the
/// previous one, including its synthesized newline, has been consumed.
pub struct Console<T> {
    terminal: T,
    pending: VecDeque<u8>,
}

impl<T: Terminal> Console<T> {
    pub fn new(terminal: T) -> Self {
        Self {
            terminal,
            pending: VecDeque::new(),
        }
    }

    pub fn has_pending_input(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Blocks for a fresh line from the terminal.
    pub fn request_line(&mut self) -> Result<Vec<u8>, VMError> {
        self.terminal.read_line()?.ok_or(VMError::InputClosed)
    }

    /// Queues `line` as input, followed by a newline.
    pub fn buffer_line(&mut self, line: &[u8]) {
        self.pending.extend(line);
        self.pending.push_back(NEWLINE);
    }

    pub fn next_byte(&mut self) -> Option<u8> {
        self.pending.pop_front()
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), VMError> {
        Ok(self.terminal.write_byte(byte)?)
    }

    pub fn flush(&mut self) -> Result<(), VMError> {
        Ok(self.terminal.flush()?)
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn into_terminal(self) -> T {
        self.terminal
    }
}
