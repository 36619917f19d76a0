// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

use enum_tags::enum_tags;
use static_assertions::{const_assert, const_assert_eq};

use crate::{
    arch::{Address, Word},
    error::VMError,
    memory::Memory,
};

/// A decoded instruction. Fields are the raw operand words that followed the
/// selector in memory; they are resolved only when the instruction runs.
///
/// Variant order fixes the selector: `Halt` is 0 and `Noop` is 21.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[enum_tags(public, repr(Word))]
pub enum Op {
    /// `Self::Halt` stops the machine.
    Halt,
    /// `Self::Set(a, b)` writes `b` into register `a`.
    Set(Word, Word),
    /// `Self::Push(a)` pushes `a`.
    Push(Word),
    /// `Self::Pop(a)` pops into register `a`; faults on an empty stack.
    Pop(Word),
    /// `Self::Eq(a, b, c)` writes 1 into `a` if `b == c`, else 0.
    Eq(Word, Word, Word),
    /// `Self::Gt(a, b, c)` writes 1 into `a` if `b > c`, else 0.
    Gt(Word, Word, Word),
    /// `Self::Jmp(a)` jumps to `a`.
    Jmp(Word),
    /// `Self::Jt(a, b)` jumps to `b` if `a` is nonzero.
    Jt(Word, Word),
    /// `Self::Jf(a, b)` jumps to `b` if `a` is zero.
    Jf(Word, Word),
    /// `Self::Add(a, b, c)` writes `b + c` into `a`, modulo 32768.
    Add(Word, Word, Word),
    /// `Self::Mult(a, b, c)` writes `b * c` into `a`, modulo 32768.
    Mult(Word, Word, Word),
    /// `Self::Mod(a, b, c)` writes `b % c` into `a`; faults when `c` is 0.
    Mod(Word, Word, Word),
    /// `Self::And(a, b, c)` writes `b & c` into `a`.
    And(Word, Word, Word),
    /// `Self::Or(a, b, c)` writes `b | c` into `a`.
    Or(Word, Word, Word),
    /// `Self::Not(a, b)` writes the 15-bit inverse of `b` into `a`.
    Not(Word, Word),
    /// `Self::Rmem(a, b)` writes the memory cell at `b` into `a`.
    Rmem(Word, Word),
    /// `Self::Wmem(a, b)` writes `b` into the memory cell at `a`.
    Wmem(Word, Word),
    /// `Self::Call(a)` pushes the next instruction's address and jumps to
    /// `a`.
    Call(Word),
    /// `Self::Ret` pops an address and jumps to it; halts on an empty stack.
    Ret,
    /// `Self::Out(a)` writes the character `a` to the terminal.
    Out(Word),
    /// `Self::In(a)` reads the next input character into `a`.
    In(Word),
    /// `Self::Noop` has no effect.
    Noop,
}

const_assert_eq!(Op::VARIANT_COUNT, 22);
const_assert_eq!(Op::HALT_TAG, 0);
const_assert_eq!(Op::NOOP_TAG, 21);
const_assert!(matches!(Op::tag_arity(Op::HALT_TAG), Some(0)));
const_assert!(matches!(Op::tag_arity(Op::SET_TAG), Some(2)));
const_assert!(matches!(Op::tag_arity(Op::EQ_TAG), Some(3)));
const_assert!(matches!(Op::tag_arity(Op::CALL_TAG), Some(1)));
const_assert!(matches!(Op::tag_arity(Op::RET_TAG), Some(0)));
const_assert!(matches!(Op::tag_arity(Op::IN_TAG), Some(1)));
const_assert!(Op::tag_arity(Op::NOOP_TAG + 1).is_none());

impl Op {
    /// Decodes the instruction whose selector sits at `address`, reading its
    /// operands from the following cells.
    ///
    /// Returns `Ok(None)` for a selector with no assigned operation.
    pub fn decode_from(
        memory: &Memory,
        address: Address,
    ) -> Result<Option<Self>, VMError> {
        let selector = memory.read(address)?;
        let operand = |offset: usize| memory.read(address + offset);

        Ok(Some(match selector {
            Self::HALT_TAG => Self::Halt,
            Self::SET_TAG => Self::Set(operand(1)?, operand(2)?),
            Self::PUSH_TAG => Self::Push(operand(1)?),
            Self::POP_TAG => Self::Pop(operand(1)?),
            Self::EQ_TAG => Self::Eq(operand(1)?, operand(2)?, operand(3)?),
            Self::GT_TAG => Self::Gt(operand(1)?, operand(2)?, operand(3)?),
            Self::JMP_TAG => Self::Jmp(operand(1)?),
            Self::JT_TAG => Self::Jt(operand(1)?, operand(2)?),
            Self::JF_TAG => Self::Jf(operand(1)?, operand(2)?),
            Self::ADD_TAG => Self::Add(operand(1)?, operand(2)?, operand(3)?),
            Self::MULT_TAG => {
                Self::Mult(operand(1)?, operand(2)?, operand(3)?)
            }
            Self::MOD_TAG => Self::Mod(operand(1)?, operand(2)?, operand(3)?),
            Self::AND_TAG => Self::And(operand(1)?, operand(2)?, operand(3)?),
            Self::OR_TAG => Self::Or(operand(1)?, operand(2)?, operand(3)?),
            Self::NOT_TAG => Self::Not(operand(1)?, operand(2)?),
            Self::RMEM_TAG => Self::Rmem(operand(1)?, operand(2)?),
            Self::WMEM_TAG => Self::Wmem(operand(1)?, operand(2)?),
            Self::CALL_TAG => Self::Call(operand(1)?),
            Self::RET_TAG => Self::Ret,
            Self::OUT_TAG => Self::Out(operand(1)?),
            Self::IN_TAG => Self::In(operand(1)?),
            Self::NOOP_TAG => Self::Noop,
            _ => return Ok(None),
        }))
    }

    /// Words occupied by this instruction, selector included.
    pub const fn length(&self) -> usize {
        1 + self.arity()
    }
}

#[cfg(test)]
mod tests {
    use super::Op;
    use crate::{
        arch::{Word, ADDRESS_SPACE},
        error::VMError,
        memory::Memory,
    };

    #[test]
    fn every_selector_decodes_with_its_arity() {
        for tag in 0..Op::VARIANT_COUNT as Word {
            let memory = Memory::with_image(&[tag, 32768, 32769, 32770]);
            let op = Op::decode_from(&memory, 0)
                .expect("operands are in memory")
                .expect("selector is assigned");

            assert_eq!(tag, op.tag());
            assert_eq!(Op::tag_arity(tag), Some(op.arity()));
            assert_eq!(Op::tag_mnemonic(tag), Some(op.mnemonic()));
        }
    }

    #[test]
    fn operands_follow_selector() {
        let memory = Memory::with_image(&[0, 9, 32768, 4, 5]);
        let op = Op::decode_from(&memory, 1)
            .expect("operands are in memory")
            .expect("add is assigned");

        assert_eq!(Op::Add(32768, 4, 5), op);
        assert_eq!(4, op.length());
        assert_eq!("add", op.mnemonic());
    }

    #[test]
    fn unassigned_selectors_decode_to_nothing() {
        for selector in [22, 100, 32768, 65535] {
            let memory = Memory::with_image(&[selector]);
            assert_eq!(
                None,
                Op::decode_from(&memory, 0).expect("selector is in memory")
            );
        }
    }

    #[test]
    fn operands_past_memory_fault() {
        let mut memory = Memory::default();
        memory
            .write(ADDRESS_SPACE - 1, Op::PUSH_TAG)
            .expect("last cell is in memory");

        assert!(matches!(
            Op::decode_from(&memory, ADDRESS_SPACE - 1),
            Err(VMError::InvalidAddress(ADDRESS_SPACE))
        ));
    }
}
