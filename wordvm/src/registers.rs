// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

use crate::arch::{RegisterIndex, Value, REGISTER_COUNT};

/// The eight general-purpose registers, all starting at zero.
///
/// Indices come from [`crate::operand::destination_register`] or
/// [`crate::operand::Operand`], which only produce `0..REGISTER_COUNT`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegisterBank {
    cells: [Value; REGISTER_COUNT],
}

impl RegisterBank {
    /// `None` when `index` is not a register.
    pub fn get(&self, index: RegisterIndex) -> Option<Value> {
        self.cells.get(index).copied()
    }

    pub(crate) fn read(&self, index: RegisterIndex) -> Value {
        self.cells[index]
    }

    pub(crate) fn write(&mut self, index: RegisterIndex, value: Value) {
        self.cells[index] = value;
    }

    pub fn as_array(&self) -> &[Value; REGISTER_COUNT] {
        &self.cells
    }
}
