// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

use crate::{
    arch::{Address, Word},
    memory::Memory,
    registers::RegisterBank,
    stack::Stack,
};

/// Everything an instruction can read or write.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MachineState {
    pub memory: Memory,
    pub registers: RegisterBank,
    pub stack: Stack,
    /// Address of the next selector to fetch.
    pub ip: Address,
}

impl MachineState {
    /// A fresh machine: `image` at address 0, zeroed registers, empty
    /// stack, `ip` at 0.
    pub fn with_image(image: &[Word]) -> Self {
        Self {
            memory: Memory::with_image(image),
            ..Self::default()
        }
    }
}
