// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

use std::io;

use thiserror::Error;

use crate::arch::{Address, Word, ADDRESS_SPACE};

/// Why an instruction could not complete.
#[derive(Debug, Error)]
pub enum VMError {
    #[error("pop from an empty stack")]
    StackUnderflow,
    #[error("modulo by zero")]
    DivideByZero,
    #[error("operand {0} is neither a literal nor a register")]
    InvalidOperand(Word),
    #[error("load requested before any save")]
    NoSnapshot,
    #[error("address {0} is outside of memory")]
    InvalidAddress(Address),
    #[error("input closed while waiting for a line")]
    InputClosed,
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

pub type VMResult = Result<(), VMError>;

/// A [`VMError`] located at the instruction that raised it.
#[derive(Debug, Error)]
#[error("{mnemonic} at address {address}: {fault}")]
pub struct ExecutionError {
    pub mnemonic: &'static str,
    pub address: Address,
    #[source]
    pub fault: VMError,
}

/// Failure to turn a binary image into a program.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("image has odd length {0}; words are two bytes")]
    OddLength(usize),
    #[error("image holds {0} words but memory has {max}", max = ADDRESS_SPACE)]
    TooLarge(usize),
    #[error("could not read image: {0}")]
    Io(#[from] io::Error),
}
