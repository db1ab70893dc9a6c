use crate::vm::Error;

/// Number of addressable bytes in an LS-8 machine.
pub const MEMORY_SIZE: usize = 256;

/// Flat, fixed-size RAM.
///
/// Every access is range-checked; an address outside `[0, MEMORY_SIZE)` is
/// an [`Error::OutOfBounds`], never a silent wrap.
#[derive(Debug)]
pub struct Memory {
  cells: [u8; MEMORY_SIZE],
}

impl Memory {
  pub fn new() -> Self {
    Self {
      cells: [0; MEMORY_SIZE],
    }
  }

  pub fn read(&self, address: usize) -> Result<u8, Error> {
    self
      .cells
      .get(address)
      .copied()
      .ok_or(Error::OutOfBounds { address })
  }

  pub fn write(&mut self, address: usize, value: u8) -> Result<(), Error> {
    let cell = self
      .cells
      .get_mut(address)
      .ok_or(Error::OutOfBounds { address })?;
    *cell = value;
    Ok(())
  }
}

impl Default for Memory {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  mod memory {
    use super::*;

    #[test]
    fn new_is_zeroed() {
      let memory = Memory::new();
      for address in 0..MEMORY_SIZE {
        assert_eq!(memory.read(address).unwrap(), 0);
      }
    }

    #[test]
    fn write_then_read() {
      let mut memory = Memory::new();
      memory.write(0xF3, 42).unwrap();
      assert_eq!(memory.read(0xF3).unwrap(), 42);
    }

    #[test]
    fn read_out_of_bounds() {
      let memory = Memory::new();
      assert!(matches!(
        memory.read(MEMORY_SIZE),
        Err(Error::OutOfBounds { address: 256 })
      ));
    }

    #[test]
    fn write_out_of_bounds() {
      let mut memory = Memory::new();
      assert!(matches!(
        memory.write(1000, 1),
        Err(Error::OutOfBounds { address: 1000 })
      ));
    }
  }
}
