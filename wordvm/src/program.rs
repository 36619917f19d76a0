// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

use std::{fs, path::Path};

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    arch::{Word, ADDRESS_SPACE},
    error::ProgramError,
};

/// A program image: the words loaded into memory from address 0.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Program {
    words: Vec<Word>,
}

impl Program {
    pub fn from_words(words: Vec<Word>) -> Result<Self, ProgramError> {
        if words.len() > ADDRESS_SPACE {
            return Err(ProgramError::TooLarge(words.len()));
        }
        Ok(Self { words })
    }

    /// Decodes a binary image of little-endian 16-bit words.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProgramError> {
        if bytes.len() % 2 != 0 {
            return Err(ProgramError::OddLength(bytes.len()));
        }
        let mut words = vec![0; bytes.len() / 2];
        LittleEndian::read_u16_into(bytes, &mut words);
        Self::from_words(words)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProgramError> {
        Self::from_bytes(&fs::read(path)?)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Program;
    use crate::{arch::ADDRESS_SPACE, error::ProgramError};

    #[test]
    fn decodes_little_endian() {
        let program = Program::from_bytes(&[0x09, 0x00, 0x00, 0x80, 0x04, 0x00])
            .expect("well-formed image");
        assert_eq!(&[9, 32768, 4], program.words());
    }

    #[test]
    fn rejects_odd_length() {
        assert!(matches!(
            Program::from_bytes(&[0x13, 0x00, 0x41]),
            Err(ProgramError::OddLength(3))
        ));
    }

    #[test]
    fn rejects_oversized_images() {
        let bytes = vec![0; 2 * (ADDRESS_SPACE + 1)];
        assert!(matches!(
            Program::from_bytes(&bytes),
            Err(ProgramError::TooLarge(length)) if length == ADDRESS_SPACE + 1
        ));
        assert!(Program::from_bytes(&bytes[2..]).is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Program::from_file("/nonexistent/wordvm/image.bin"),
            Err(ProgramError::Io(_))
        ));
    }
}
