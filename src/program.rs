use std::fs;
use std::io;
use std::path::Path;

/// A program image: the ordered bytes preloaded into memory at address 0
/// before a run begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
  bytes: Vec<u8>,
}

impl Program {
  /// Parse the LS-8 textual source format.
  ///
  /// One binary-literal byte per line; `#` starts a comment. Lines that
  /// do not parse as a byte (blank lines, pure comments, stray text) are
  /// silently skipped.
  pub fn from_source(source: &str) -> Self {
    let mut bytes = Vec::new();
    for (number, line) in source.lines().enumerate() {
      let code = line.split('#').next().unwrap_or("").trim();
      match u8::from_str_radix(code, 2) {
        Ok(byte) => bytes.push(byte),
        Err(_) if code.is_empty() => {}
        Err(_) => log::debug!("skipping malformed line {}: {line:?}", number + 1),
      }
    }
    Self { bytes }
  }

  pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
    let source = fs::read_to_string(path)?;
    Ok(Self::from_source(&source))
  }

  pub fn bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }
}

impl From<Vec<u8>> for Program {
  fn from(bytes: Vec<u8>) -> Self {
    Self { bytes }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  mod program {
    use super::*;

    #[test]
    fn parses_binary_lines() {
      let program = Program::from_source("10000010\n00000000\n00001000\n");
      assert_eq!(program.bytes(), &[0x82, 0x00, 0x08]);
    }

    #[test]
    fn strips_comments() {
      let source = "# print the number 8\n10000010 # LDI R0,8\n00000000\n00001000\n01000111 # PRN R0\n00000000\n00000001 # HLT\n";
      let program = Program::from_source(source);
      assert_eq!(program.bytes(), &[0x82, 0x00, 0x08, 0x47, 0x00, 0x01]);
    }

    #[test]
    fn skips_malformed_lines() {
      let program = Program::from_source("garbage\n10101010\n\n2\n00000001\n");
      assert_eq!(program.bytes(), &[0xAA, 0x01]);
    }

    #[test]
    fn from_bytes() {
      let program: Program = vec![0x82, 0x00, 0x08].into();
      assert_eq!(program.len(), 3);
      assert!(!program.is_empty());
    }
  }
}
