// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

//! The `save`/`load` input commands.
//!
//! A snapshot holds memory, registers, and the instruction pointer. The
//! stack is left out, so a `load` keeps whatever the stack holds at that
//! moment.

use crate::{
    arch::Address, error::VMError, memory::Memory, registers::RegisterBank,
    state::MachineState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCommand {
    Save,
    Load,
}

impl SpecialCommand {
    /// Recognizes lines starting with `save` or `load`, ignoring case.
    pub fn parse(line: &[u8]) -> Option<Self> {
        let prefix = line.get(..4)?;
        if prefix.eq_ignore_ascii_case(b"save") {
            Some(Self::Save)
        } else if prefix.eq_ignore_ascii_case(b"load") {
            Some(Self::Load)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    memory: Memory,
    registers: RegisterBank,
    ip: Address,
}

impl Snapshot {
    pub fn capture(state: &MachineState) -> Self {
        Self {
            memory: state.memory.clone(),
            registers: state.registers,
            ip: state.ip,
        }
    }

    pub fn restore_into(&self, state: &mut MachineState) {
        state.memory.clone_from(&self.memory);
        state.registers = self.registers;
        state.ip = self.ip;
    }

    pub fn ip(&self) -> Address {
        self.ip
    }
}

/// Holds at most one snapshot; each save replaces the last.
#[derive(Debug, Default, Clone)]
pub struct SnapshotSlot {
    saved: Option<Snapshot>,
}

impl SnapshotSlot {
    pub fn is_empty(&self) -> bool {
        self.saved.is_none()
    }

    pub fn saved(&self) -> Option<&Snapshot> {
        self.saved.as_ref()
    }

    pub fn save(&mut self, state: &MachineState) {
        self.saved = Some(Snapshot::capture(state));
    }

    pub fn load(&self, state: &mut MachineState) -> Result<(), VMError> {
        let snapshot = self.saved.as_ref().ok_or(VMError::NoSnapshot)?;
        snapshot.restore_into(state);
        Ok(())
    }

    /// Runs `line` if it is a special command. Returns whether it was one,
    /// in which case it must not be delivered to the program.
    pub fn try_special_command(
        &mut self,
        line: &[u8],
        state: &mut MachineState,
    ) -> Result<bool, VMError> {
        match SpecialCommand::parse(line) {
            Some(SpecialCommand::Save) => {
                self.save(state);
                log::debug!("saved snapshot at ip {}", state.ip);
                Ok(true)
            }
            Some(SpecialCommand::Load) => {
                if self.is_empty() {
                    log::warn!(
                        "`{}` requested with no saved snapshot",
                        String::from_utf8_lossy(line)
                    );
                }
                self.load(state)?;
                log::debug!("loaded snapshot, resuming at ip {}", state.ip);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SnapshotSlot, SpecialCommand};
    use crate::{error::VMError, state::MachineState};

    #[test]
    fn recognizes_commands_case_insensitively() {
        assert_eq!(Some(SpecialCommand::Save), SpecialCommand::parse(b"save"));
        assert_eq!(
            Some(SpecialCommand::Save),
            SpecialCommand::parse(b"SaVe now")
        );
        assert_eq!(Some(SpecialCommand::Load), SpecialCommand::parse(b"LOAD"));
        assert_eq!(
            Some(SpecialCommand::Load),
            SpecialCommand::parse(b"loadgame")
        );
        assert_eq!(
            Some(SpecialCommand::Load),
            SpecialCommand::parse(b"load \xe9")
        );
    }

    #[test]
    fn ignores_everything_else() {
        for line in ["", "sav", " save", "go north", "unsave", "lööd", "ö"] {
            assert_eq!(None, SpecialCommand::parse(line.as_bytes()), "{line:?}");
        }
        assert_eq!(None, SpecialCommand::parse(b"\xe9save"));
        assert_eq!(None, SpecialCommand::parse(b"sa\xffe"));
    }

    #[test]
    fn load_without_save_fails() {
        let mut slot = SnapshotSlot::default();
        let mut state = MachineState::with_image(&[0]);

        assert!(matches!(
            slot.try_special_command(b"load", &mut state),
            Err(VMError::NoSnapshot)
        ));
    }

    #[test]
    fn load_restores_everything_but_the_stack() {
        let mut slot = SnapshotSlot::default();
        let mut state = MachineState::with_image(&[20, 32768]);
        state.registers.write(1, 42);

        assert!(slot
            .try_special_command(b"save", &mut state)
            .expect("save never fails"));

        state.registers.write(1, 7);
        state.memory.write(0, 21).expect("address 0 is in memory");
        state.ip = 100;
        state.stack.push(5);

        assert!(slot
            .try_special_command(b"load", &mut state)
            .expect("a snapshot was saved"));

        assert_eq!(42, state.registers.read(1));
        assert_eq!(20, state.memory.read(0).expect("address 0 is in memory"));
        assert_eq!(0, state.ip);
        assert_eq!(&[5], state.stack.as_slice());
    }

    #[test]
    fn each_save_replaces_the_last() {
        let mut slot = SnapshotSlot::default();
        let mut state = MachineState::with_image(&[]);

        state.ip = 1;
        slot.save(&state);
        state.ip = 2;
        slot.save(&state);
        state.ip = 3;

        slot.load(&mut state).expect("a snapshot was saved");
        assert_eq!(2, state.ip);
    }

    #[test]
    fn ordinary_lines_pass_through() {
        let mut slot = SnapshotSlot::default();
        let mut state = MachineState::with_image(&[]);

        assert!(!slot
            .try_special_command(b"take lamp", &mut state)
            .expect("not a command"));
        assert!(slot.is_empty());
    }
}
