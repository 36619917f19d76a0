// Copyright (C) 2024 Ethan Uppal and Utku Melemetci. All rights reserved.

use crate::{
    arch::{reduce, Address, Value, Word, VALUE_MASK},
    error::{ExecutionError, VMError, VMResult},
    io::{Console, Terminal},
    memory::Memory,
    op::Op,
    operand::{destination_register, resolve},
    program::Program,
    registers::RegisterBank,
    snapshot::SnapshotSlot,
    stack::Stack,
    state::MachineState,
};

pub struct VM<T> {
    state: MachineState,
    console: Console<T>,
    snapshots: SnapshotSlot,
    halted: bool,
    steps: u64,
}

impl<T: Terminal> VM<T> {
    /// Creates a [`VM`] with `program` loaded at address 0, zeroed registers,
    /// and an empty stack.
    pub fn new(program: &Program, terminal: T) -> Self {
        Self {
            state: MachineState::with_image(program.words()),
            console: Console::new(terminal),
            snapshots: SnapshotSlot::default(),
            halted: false,
            steps: 0,
        }
    }

    /// Runs the [`VM`] until it halts.
    pub fn run(&mut self) -> Result<(), ExecutionError> {
        self.run_for(u64::MAX).map(|_| ())
    }

    /// Runs at most `max_steps` instructions. Returns whether the machine
    /// halted within that budget.
    ///
    /// Output is flushed on the way out, whether or not execution faulted.
    pub fn run_for(&mut self, max_steps: u64) -> Result<bool, ExecutionError> {
        let outcome = self.execute(max_steps);
        let flushed = self.console.flush();

        let halted = outcome?;
        flushed.map_err(|fault| ExecutionError {
            // anything left in the buffer was written by an earlier `out`
            mnemonic: "out",
            address: self.state.ip,
            fault,
        })?;
        Ok(halted)
    }

    fn execute(&mut self, max_steps: u64) -> Result<bool, ExecutionError> {
        for _ in 0..max_steps {
            if self.halted {
                break;
            }
            self.step()?;
        }

        if self.halted {
            log::info!(
                "halted at address {} after {} instructions",
                self.state.ip,
                self.steps
            );
        }
        Ok(self.halted)
    }

    /// Fetches, decodes, and executes one instruction. Does nothing once
    /// halted.
    pub fn step(&mut self) -> Result<(), ExecutionError> {
        if self.halted {
            return Ok(());
        }

        let address = self.state.ip;
        let op = match Op::decode_from(&self.state.memory, address) {
            Ok(Some(op)) => op,
            Ok(None) => {
                log::debug!("skipping unassigned selector at address {}", address);
                self.steps += 1;
                self.state.ip = address + 1;
                return Ok(());
            }
            Err(fault) => {
                return Err(ExecutionError {
                    mnemonic: self.mnemonic_at(address),
                    address,
                    fault,
                });
            }
        };

        log::trace!("{:5}: {:?}", address, op);

        self.steps += 1;
        self.execute_op(op).map_err(|fault| ExecutionError {
            mnemonic: op.mnemonic(),
            address,
            fault,
        })
    }

    fn execute_op(&mut self, op: Op) -> VMResult {
        let next = self.state.ip + op.length();

        match op {
            Op::Halt => {
                self.halted = true;
                Ok(())
            }
            Op::Set(a, b) => {
                let value = self.resolve(b)?;
                self.write_register(a, value)?;
                self.jump(next)
            }
            Op::Push(a) => {
                let value = self.resolve(a)?;
                self.state.stack.push(value);
                self.jump(next)
            }
            Op::Pop(a) => {
                let value = self.state.stack.pop()?;
                self.write_register(a, value)?;
                self.jump(next)
            }
            Op::Eq(a, b, c) => {
                let equal = self.resolve(b)? == self.resolve(c)?;
                self.write_register(a, Value::from(equal))?;
                self.jump(next)
            }
            Op::Gt(a, b, c) => {
                let greater = self.resolve(b)? > self.resolve(c)?;
                self.write_register(a, Value::from(greater))?;
                self.jump(next)
            }
            Op::Jmp(a) => {
                let target = self.resolve(a)?;
                self.jump(target as Address)
            }
            Op::Jt(a, b) => {
                if self.resolve(a)? != 0 {
                    let target = self.resolve(b)?;
                    self.jump(target as Address)
                } else {
                    self.jump(next)
                }
            }
            Op::Jf(a, b) => {
                if self.resolve(a)? == 0 {
                    let target = self.resolve(b)?;
                    self.jump(target as Address)
                } else {
                    self.jump(next)
                }
            }
            Op::Add(a, b, c) => {
                let sum =
                    u32::from(self.resolve(b)?) + u32::from(self.resolve(c)?);
                self.write_register(a, reduce(sum))?;
                self.jump(next)
            }
            Op::Mult(a, b, c) => {
                let product =
                    u32::from(self.resolve(b)?) * u32::from(self.resolve(c)?);
                self.write_register(a, reduce(product))?;
                self.jump(next)
            }
            Op::Mod(a, b, c) => {
                let dividend = self.resolve(b)?;
                let divisor = self.resolve(c)?;
                let remainder = dividend
                    .checked_rem(divisor)
                    .ok_or(VMError::DivideByZero)?;
                self.write_register(a, remainder)?;
                self.jump(next)
            }
            Op::And(a, b, c) => {
                let value = self.resolve(b)? & self.resolve(c)?;
                self.write_register(a, value)?;
                self.jump(next)
            }
            Op::Or(a, b, c) => {
                let value = self.resolve(b)? | self.resolve(c)?;
                self.write_register(a, value)?;
                self.jump(next)
            }
            Op::Not(a, b) => {
                let value = self.resolve(b)? ^ VALUE_MASK;
                self.write_register(a, value)?;
                self.jump(next)
            }
            Op::Rmem(a, b) => {
                let source = self.resolve(b)?;
                let word = self.state.memory.read(source as Address)?;
                self.write_register(a, word)?;
                self.jump(next)
            }
            Op::Wmem(a, b) => {
                let destination = self.resolve(a)?;
                let value = self.resolve(b)?;
                self.state.memory.write(destination as Address, value)?;
                self.jump(next)
            }
            Op::Call(a) => {
                let target = self.resolve(a)?;
                // the return address must itself be a cell
                if next >= self.state.memory.len() {
                    return Err(VMError::InvalidAddress(next));
                }
                self.state.stack.push(next as Value);
                self.jump(target as Address)
            }
            Op::Ret => {
                if self.state.stack.is_empty() {
                    self.halted = true;
                    return Ok(());
                }
                let return_address = self.state.stack.pop()?;
                self.jump(return_address as Address)
            }
            Op::Out(a) => {
                // character codes are taken modulo 256
                let byte = self.resolve(a)? as u8;
                self.console.write_byte(byte)?;
                self.jump(next)
            }
            Op::In(a) => {
                let destination = destination_register(a)?;

                if !self.console.has_pending_input() {
                    let line = self.console.request_line()?;
                    if self
                        .snapshots
                        .try_special_command(&line, &mut self.state)?
                    {
                        // `ip` was not advanced (or was restored), so this
                        // `in` runs again and asks for another line
                        return Ok(());
                    }
                    log::debug!("buffered input line of {} bytes", line.len());
                    self.console.buffer_line(&line);
                }

                let byte =
                    self.console.next_byte().ok_or(VMError::InputClosed)?;
                self.state.registers.write(destination, Value::from(byte));
                self.jump(next)
            }
            Op::Noop => self.jump(next),
        }
    }

    fn jump(&mut self, new_ip: Address) -> VMResult {
        if new_ip >= self.state.memory.len() {
            return Err(VMError::InvalidAddress(new_ip));
        }

        self.state.ip = new_ip;

        Ok(())
    }

    fn resolve(&self, raw: Word) -> Result<Value, VMError> {
        resolve(raw, &self.state.registers)
    }

    fn write_register(&mut self, raw: Word, value: Value) -> VMResult {
        let index = destination_register(raw)?;
        self.state.registers.write(index, value);
        Ok(())
    }

    fn mnemonic_at(&self, address: Address) -> &'static str {
        self.state
            .memory
            .read(address)
            .ok()
            .and_then(Op::tag_mnemonic)
            .unwrap_or("fetch")
    }

    pub fn ip(&self) -> Address {
        self.state.ip
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Instructions executed so far, skipped selectors included.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn registers(&self) -> &RegisterBank {
        &self.state.registers
    }

    pub fn stack(&self) -> &Stack {
        &self.state.stack
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn snapshots(&self) -> &SnapshotSlot {
        &self.snapshots
    }

    pub fn terminal(&self) -> &T {
        self.console.terminal()
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        self.console.terminal_mut()
    }

    pub fn into_terminal(self) -> T {
        self.console.into_terminal()
    }
}
