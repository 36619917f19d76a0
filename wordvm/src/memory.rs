// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

use crate::{
    arch::{Address, Word, ADDRESS_SPACE},
    error::VMError,
};

/// The unified code and data store.
///
/// Instructions are fetched from the same cells that `rmem` and `wmem` touch,
/// so a write to an upcoming instruction is seen by the next fetch.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Box<[Word]>,
}

impl Memory {
    /// Copies `image` to address 0 and zeroes the remaining cells.
    ///
    /// Images longer than [`ADDRESS_SPACE`] are truncated; the loader rejects
    /// those before they get here.
    pub fn with_image(image: &[Word]) -> Self {
        let mut cells = vec![0; ADDRESS_SPACE].into_boxed_slice();
        let length = image.len().min(ADDRESS_SPACE);
        cells[..length].copy_from_slice(&image[..length]);
        Self { cells }
    }

    pub fn read(&self, address: Address) -> Result<Word, VMError> {
        self.cells
            .get(address)
            .copied()
            .ok_or(VMError::InvalidAddress(address))
    }

    pub fn write(&mut self, address: Address, word: Word) -> Result<(), VMError> {
        let cell = self
            .cells
            .get_mut(address)
            .ok_or(VMError::InvalidAddress(address))?;
        *cell = word;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::with_image(&[])
    }
}

impl std::fmt::Debug for Memory {
    // 32768 cells are not useful in a panic message
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("cells", &self.cells.len())
            .finish()
    }
}
