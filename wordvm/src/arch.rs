// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

use num_traits::{AsPrimitive, PrimInt};
use static_assertions::{const_assert, const_assert_eq};

/// A raw memory cell.
pub type Word = u16;

/// A resolved operand, always in `0..MODULUS`.
pub type Value = u16;

pub type Address = usize;
pub type RegisterIndex = usize;

/// Bits of meaningful data in a [`Value`].
pub const VALUE_BITS: usize = 15;
const_assert!(VALUE_BITS < Word::BITS as usize);

/// All arithmetic wraps modulo this.
pub const MODULUS: Value = 1 << VALUE_BITS;

/// The largest representable [`Value`]; also the 15-bit inversion mask.
pub const VALUE_MASK: Value = MODULUS - 1;

pub const REGISTER_COUNT: usize = 8;

/// The raw word naming register 0. Register `i` is `REGISTER_BASE + i`.
pub const REGISTER_BASE: Word = MODULUS;

/// The last raw word that still names a register.
pub const REGISTER_LAST: Word = REGISTER_BASE + REGISTER_COUNT as Word - 1;
const_assert_eq!(REGISTER_LAST, 32775);

/// Number of cells in memory. Every [`Value`] is a valid address.
pub const ADDRESS_SPACE: usize = MODULUS as usize;
const_assert_eq!(ADDRESS_SPACE, 1 << VALUE_BITS);

/// The byte appended to every line handed to the program.
pub const NEWLINE: u8 = b'\n';

/// Reduces an intermediate arithmetic result into the [`Value`] domain.
///
/// `value` must be nonnegative; wider types let sums and products be computed
/// without overflow before reduction.
pub fn reduce<T>(value: T) -> Value
where
    T: 'static + PrimInt + AsPrimitive<Value>,
    Value: AsPrimitive<T>,
{
    let modulus: T = MODULUS.as_();
    (value % modulus).as_()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_window() {
        assert_eq!(32768, REGISTER_BASE);
        assert_eq!(8, (REGISTER_LAST - REGISTER_BASE + 1) as usize);
    }

    #[test]
    fn reduce_wraps() {
        assert_eq!(0, reduce(32768u32));
        assert_eq!(32767, reduce(32767u32));
        assert_eq!(3, reduce(32771u32));
        assert_eq!(16384, reduce(16384u32 * 32769u32));
    }
}
