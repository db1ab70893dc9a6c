use std::fmt::Write as _;
use std::io::Write;

use crate::alu::{self, AluOp, FL_EQUAL};
use crate::memory::Memory;
use crate::opcode::{self, Opcode};
use crate::program::Program;
use crate::registers::{RegisterFile, REGISTER_COUNT, SP};

/// Whether the machine is still executing instructions.
///
/// `Halted` is terminal: HLT and MOD-by-zero transition here, and a
/// halted machine ignores further `step` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Running,
  Halted,
}

/// A fatal execution error.
///
/// These abort the run: they indicate either a broken program (register
/// or memory operand out of range, execution running off the end of
/// memory) or a failing output sink. Unknown opcodes and MOD-by-zero are
/// deliberately not here; the former is logged and skipped, the latter
/// halts the machine cleanly.
#[derive(thiserror::Error, Debug)]
pub enum Error {
  #[error("memory access out of bounds: address {address}")]
  OutOfBounds { address: usize },

  #[error("invalid register index {index}")]
  InvalidRegister { index: usize },

  #[error("failed to write program output")]
  Output(#[from] std::io::Error),
}

/// A virtual machine for the LS-8 architecture.
///
/// Owns the whole machine: 256 bytes of RAM, the register file, the
/// program counter, and the comparison flags. One instruction completes
/// fully before the next begins; there is no concurrency anywhere.
#[derive(Debug)]
pub struct Vm {
  pc: usize,
  fl: u8,
  memory: Memory,
  registers: RegisterFile,
  status: Status,
}

impl Vm {
  /// Create a machine with zeroed memory and registers, except the stack
  /// pointer which starts just past the top of the stack region.
  pub fn new() -> Self {
    Self {
      pc: 0,
      fl: 0,
      memory: Memory::new(),
      registers: RegisterFile::new(),
      status: Status::Running,
    }
  }

  /// Copy a program image into memory starting at address 0.
  pub fn load(&mut self, program: &Program) -> Result<(), Error> {
    for (address, &byte) in program.bytes().iter().enumerate() {
      self.memory.write(address, byte)?;
    }
    Ok(())
  }

  /// Execute a single fetch/decode/execute cycle.
  ///
  /// `out` receives PRN output, one decimal line per invocation. Returns
  /// the machine status after the cycle; stepping a halted machine is a
  /// no-op that reports `Halted`.
  pub fn step<W: Write>(&mut self, out: &mut W) -> Result<Status, Error> {
    if self.status == Status::Halted {
      return Ok(Status::Halted);
    }

    log::trace!("{}", self.trace_line());

    let pc = self.pc;
    // both operand bytes are fetched speculatively; instructions that
    // need fewer simply ignore the extra reads
    let ir = self.memory.read(pc)?;
    let operand_a = self.memory.read(pc + 1)?;
    let operand_b = self.memory.read(pc + 2)?;

    let Some(op) = Opcode::decode(ir) else {
      log::warn!("unknown instruction {ir:#04x} at address {pc:#04x}");
      self.pc += 1 + opcode::operand_count(ir);
      return Ok(Status::Running);
    };

    match op {
      Opcode::Nop => {}
      Opcode::Hlt => self.status = Status::Halted,
      Opcode::Ldi => self.registers.set(usize::from(operand_a), operand_b)?,
      Opcode::Prn => {
        let value = self.registers.get(usize::from(operand_a))?;
        writeln!(out, "{value}")?;
      }
      Opcode::Push => {
        let value = self.registers.get(usize::from(operand_a))?;
        self.push(value)?;
      }
      Opcode::Pop => {
        let value = self.pop()?;
        self.registers.set(usize::from(operand_a), value)?;
      }
      Opcode::Call => {
        // the fetch of pc + 2 succeeded, so the return address fits a byte
        self.push((pc + 2) as u8)?;
        self.pc = usize::from(self.registers.get(usize::from(operand_a))?);
      }
      Opcode::Ret => self.pc = usize::from(self.pop()?),
      Opcode::Jmp => self.pc = usize::from(self.registers.get(usize::from(operand_a))?),
      Opcode::Jeq => self.branch(self.fl & FL_EQUAL != 0, op, operand_a)?,
      Opcode::Jne => self.branch(self.fl & FL_EQUAL == 0, op, operand_a)?,
      _ => self.alu(op, usize::from(operand_a), usize::from(operand_b))?,
    }

    // control-flow instructions set pc themselves as part of execution
    if !matches!(
      op,
      Opcode::Call | Opcode::Ret | Opcode::Jmp | Opcode::Jeq | Opcode::Jne
    ) {
      self.pc += 1 + op.operands();
    }
    Ok(self.status)
  }

  /// Run until the machine halts.
  pub fn run<W: Write>(&mut self, out: &mut W) -> Result<(), Error> {
    while self.step(out)? == Status::Running {}
    Ok(())
  }

  /// Run until the machine halts or `limit` instructions have executed.
  ///
  /// A malformed program can loop forever; callers that cannot tolerate
  /// that use this instead of [`Vm::run`]. Returns `Status::Running` if
  /// the ceiling was reached before a halt.
  pub fn run_bounded<W: Write>(&mut self, out: &mut W, limit: u64) -> Result<Status, Error> {
    for _ in 0..limit {
      if self.step(out)? == Status::Halted {
        return Ok(Status::Halted);
      }
    }
    Ok(self.status)
  }

  pub fn pc(&self) -> usize {
    self.pc
  }

  pub fn flags(&self) -> u8 {
    self.fl
  }

  pub fn status(&self) -> Status {
    self.status
  }

  pub fn is_halted(&self) -> bool {
    self.status == Status::Halted
  }

  pub fn registers(&self) -> &RegisterFile {
    &self.registers
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  /// One-line dump of the program counter, the next three memory bytes,
  /// and every register, in hex.
  pub fn trace_line(&self) -> String {
    let mut line = format!(
      "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
      self.pc,
      self.memory.read(self.pc).unwrap_or(0),
      self.memory.read(self.pc + 1).unwrap_or(0),
      self.memory.read(self.pc + 2).unwrap_or(0),
    );
    for index in 0..REGISTER_COUNT {
      let _ = write!(line, " {:02X}", self.registers.get(index).unwrap_or(0));
    }
    line
  }

  fn push(&mut self, value: u8) -> Result<(), Error> {
    let sp = self.registers.get(SP)?.wrapping_sub(1);
    self.registers.set(SP, sp)?;
    self.memory.write(usize::from(sp), value)
  }

  fn pop(&mut self) -> Result<u8, Error> {
    let sp = self.registers.get(SP)?;
    let value = self.memory.read(usize::from(sp))?;
    self.registers.set(SP, sp.wrapping_add(1))?;
    Ok(value)
  }

  fn branch(&mut self, taken: bool, op: Opcode, operand_a: u8) -> Result<(), Error> {
    if taken {
      self.pc = usize::from(self.registers.get(usize::from(operand_a))?);
    } else {
      // fall through using the branch opcode's own operand count
      self.pc += 1 + op.operands();
    }
    Ok(())
  }

  fn alu(&mut self, op: Opcode, reg_a: usize, reg_b: usize) -> Result<(), Error> {
    let alu_op = op.alu_op();
    let a = self.registers.get(reg_a)?;
    let b = match alu_op {
      // unary; the speculatively fetched second operand byte is junk
      AluOp::Not => 0,
      _ => self.registers.get(reg_b)?,
    };
    match alu::execute(alu_op, a, b) {
      alu::Outcome::Value(value) => self.registers.set(reg_a, value)?,
      alu::Outcome::Flags(fl) => self.fl = fl,
      alu::Outcome::DivideByZero => {
        log::error!("cannot divide by zero at address {:#04x}", self.pc);
        self.status = Status::Halted;
      }
    }
    Ok(())
  }
}

impl Default for Vm {
  fn default() -> Self {
    Self::new()
  }
}
