use crate::vm::Error;

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// Index of the register reserved for the stack pointer.
pub const SP: usize = 7;

/// Initial stack pointer value, one past the top of the stack region.
pub const SP_INIT: u8 = 0xF4;

/// Eight 8-bit general-purpose registers.
///
/// R7 is the stack pointer by convention only; nothing stops an
/// instruction from clobbering it, callers must cooperate.
#[derive(Debug)]
pub struct RegisterFile {
  regs: [u8; REGISTER_COUNT],
}

impl RegisterFile {
  pub fn new() -> Self {
    let mut regs = [0; REGISTER_COUNT];
    regs[SP] = SP_INIT;
    Self { regs }
  }

  pub fn get(&self, index: usize) -> Result<u8, Error> {
    self
      .regs
      .get(index)
      .copied()
      .ok_or(Error::InvalidRegister { index })
  }

  /// The `u8` value type is the 8-bit mask; wrap-on-overflow happens at
  /// the call site with wrapping arithmetic.
  pub fn set(&mut self, index: usize, value: u8) -> Result<(), Error> {
    let reg = self
      .regs
      .get_mut(index)
      .ok_or(Error::InvalidRegister { index })?;
    *reg = value;
    Ok(())
  }
}

impl Default for RegisterFile {
  fn default() -> Self {
    Self::new()
  }
}
