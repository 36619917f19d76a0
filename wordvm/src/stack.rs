// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

use crate::{arch::Value, error::VMError};

/// The value stack shared by `push`/`pop` and `call`/`ret`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stack {
    values: Vec<Value>,
}

impl Stack {
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn pop(&mut self) -> Result<Value, VMError> {
        self.values.pop().ok_or(VMError::StackUnderflow)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bottom first.
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::Stack;
    use crate::{arch::MODULUS, error::VMError};

    #[test]
    fn empty_pop_underflows() {
        let mut stack = Stack::default();
        assert!(matches!(stack.pop(), Err(VMError::StackUnderflow)));
    }

    proptest! {
        #[test]
        fn pops_in_reverse_push_order(
            values in prop::collection::vec(0..MODULUS, 0..64)
        ) {
            let mut stack = Stack::default();
            for &value in &values {
                stack.push(value);
            }
            prop_assert_eq!(values.len(), stack.len());

            for &expected in values.iter().rev() {
                prop_assert_eq!(expected, stack.pop().expect("pushed above"));
            }
            prop_assert!(stack.is_empty());
            prop_assert!(matches!(stack.pop(), Err(VMError::StackUnderflow)));
        }
    }
}
