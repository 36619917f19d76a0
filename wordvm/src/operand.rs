// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

//! Addressing: how a raw operand word becomes a [`Value`].

use crate::{
    arch::{RegisterIndex, Value, Word, MODULUS, REGISTER_BASE, REGISTER_LAST},
    error::VMError,
    registers::RegisterBank,
};

/// A raw operand word, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// `0..32768` stands for itself.
    Literal(Value),
    /// `32768..=32775` names a register.
    Register(RegisterIndex),
}

impl Operand {
    /// Classifies `raw`, rejecting words past the register window.
    pub fn decode(raw: Word) -> Result<Self, VMError> {
        match raw {
            literal if literal < MODULUS => Ok(Self::Literal(literal)),
            REGISTER_BASE..=REGISTER_LAST => {
                Ok(Self::Register((raw - REGISTER_BASE) as RegisterIndex))
            }
            invalid => Err(VMError::InvalidOperand(invalid)),
        }
    }

    /// The raw word that decodes to this operand.
    pub fn encode(self) -> Word {
        match self {
            Self::Literal(value) => value,
            Self::Register(index) => REGISTER_BASE + index as Word,
        }
    }
}

/// Resolves a source operand: literals are returned as is, registers are read.
pub fn resolve(raw: Word, registers: &RegisterBank) -> Result<Value, VMError> {
    Ok(match Operand::decode(raw)? {
        Operand::Literal(value) => value,
        Operand::Register(index) => registers.read(index),
    })
}

/// Decodes a destination operand, which must name a register.
pub fn destination_register(raw: Word) -> Result<RegisterIndex, VMError> {
    match Operand::decode(raw)? {
        Operand::Register(index) => Ok(index),
        Operand::Literal(_) => Err(VMError::InvalidOperand(raw)),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{destination_register, resolve, Operand};
    use crate::{
        arch::{MODULUS, REGISTER_BASE, REGISTER_COUNT},
        error::VMError,
        registers::RegisterBank,
    };

    #[test]
    fn classifies_boundaries() {
        assert_eq!(Some(Operand::Literal(32767)), Operand::decode(32767).ok());
        assert_eq!(Some(Operand::Register(0)), Operand::decode(32768).ok());
        assert_eq!(Some(Operand::Register(7)), Operand::decode(32775).ok());
        assert!(matches!(
            Operand::decode(32776),
            Err(VMError::InvalidOperand(32776))
        ));
    }

    #[test]
    fn destination_must_be_register() {
        assert_eq!(3, destination_register(32771).expect("names r3"));
        assert!(matches!(
            destination_register(5),
            Err(VMError::InvalidOperand(5))
        ));
        assert!(matches!(
            destination_register(65535),
            Err(VMError::InvalidOperand(65535))
        ));
    }

    #[test]
    fn unwritten_register_resolves_to_zero() {
        let registers = RegisterBank::default();
        assert_eq!(0, resolve(REGISTER_BASE + 4, &registers).expect("r4"));
    }

    proptest! {
        #[test]
        fn literals_resolve_to_themselves(value in 0..MODULUS) {
            let registers = RegisterBank::default();
            prop_assert_eq!(value, resolve(value, &registers).expect("literal"));
        }

        #[test]
        fn registers_resolve_to_contents(
            index in 0..REGISTER_COUNT,
            value in 0..MODULUS,
        ) {
            let mut registers = RegisterBank::default();
            registers.write(index, value);

            let raw = Operand::Register(index).encode();
            prop_assert_eq!(value, resolve(raw, &registers).expect("register"));
        }
    }
}
