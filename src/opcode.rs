use crate::alu::AluOp;

/// The LS-8 instruction set.
///
/// The opcode byte carries its own decode metadata: the top 2 bits are
/// the operand count, and bit 5 marks an ALU operation.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
  /// | Operation | Semantics/RTL  | Assembly |
  /// |-----------|----------------|----------|
  /// | No-op     | `(do nothing)` | `NOP`    |
  Nop = 0x00,

  /// | Operation | Semantics/RTL      | Assembly |
  /// |-----------|--------------------|----------|
  /// | Halt      | `(stop execution)` | `HLT`    |
  Hlt = 0x01,

  /// | Operation | Semantics/RTL                    | Assembly |
  /// |-----------|----------------------------------|----------|
  /// | Return    | `pc ← m[r[SP]]; r[SP] ← r[SP]+1` | `RET`    |
  Ret = 0x11,

  /// | Operation | Semantics/RTL                    | Assembly  |
  /// |-----------|----------------------------------|-----------|
  /// | Push      | `r[SP] ← r[SP]−1; m[r[SP]] ← r[a]` | `PUSH Ra` |
  Push = 0x45,

  /// | Operation | Semantics/RTL                    | Assembly |
  /// |-----------|----------------------------------|----------|
  /// | Pop       | `r[a] ← m[r[SP]]; r[SP] ← r[SP]+1` | `POP Ra` |
  Pop = 0x46,

  /// | Operation | Semantics/RTL      | Assembly |
  /// |-----------|--------------------|----------|
  /// | Print     | `(emit r[a] in decimal)` | `PRN Ra` |
  Prn = 0x47,

  /// | Operation | Semantics/RTL                         | Assembly  |
  /// |-----------|---------------------------------------|-----------|
  /// | Call      | `(push pc + 2); pc ← r[a]`            | `CALL Ra` |
  Call = 0x50,

  /// | Operation | Semantics/RTL | Assembly |
  /// |-----------|---------------|----------|
  /// | Jump      | `pc ← r[a]`   | `JMP Ra` |
  Jmp = 0x54,

  /// | Operation     | Semantics/RTL                 | Assembly |
  /// |---------------|-------------------------------|----------|
  /// | Jump if equal | `if FL.E : pc ← r[a]`         | `JEQ Ra` |
  Jeq = 0x55,

  /// | Operation         | Semantics/RTL          | Assembly |
  /// |-------------------|------------------------|----------|
  /// | Jump if not equal | `if !FL.E : pc ← r[a]` | `JNE Ra` |
  Jne = 0x56,

  /// | Operation   | Semantics/RTL | Assembly |
  /// |-------------|---------------|----------|
  /// | Logical NOT | `r[a] ← ~r[a]` | `NOT Ra` |
  Not = 0x69,

  /// | Operation      | Semantics/RTL | Assembly      |
  /// |----------------|---------------|---------------|
  /// | Load Immediate | `r[a] ← vv`   | `LDI Ra, $vv` |
  Ldi = 0x82,

  /// | Operation | Semantics/RTL        | Assembly     |
  /// |-----------|----------------------|--------------|
  /// | Add       | `r[a] ← r[a] + r[b]` | `ADD Ra, Rb` |
  Add = 0xA0,

  /// | Operation | Semantics/RTL        | Assembly     |
  /// |-----------|----------------------|--------------|
  /// | Subtract  | `r[a] ← r[a] − r[b]` | `SUB Ra, Rb` |
  Sub = 0xA1,

  /// | Operation | Semantics/RTL        | Assembly     |
  /// |-----------|----------------------|--------------|
  /// | Multiply  | `r[a] ← r[a] × r[b]` | `MUL Ra, Rb` |
  Mul = 0xA2,

  /// | Operation | Semantics/RTL        | Assembly     |
  /// |-----------|----------------------|--------------|
  /// | Modulo    | `r[a] ← r[a] % r[b]` | `MOD Ra, Rb` |
  ///
  /// A zero divisor halts the machine.
  Mod = 0xA4,

  /// | Operation | Semantics/RTL                           | Assembly     |
  /// |-----------|------------------------------------------|--------------|
  /// | Compare   | `FL ← E (=), G (>), or L (<)`            | `CMP Ra, Rb` |
  Cmp = 0xA7,

  /// | Operation   | Semantics/RTL        | Assembly     |
  /// |-------------|----------------------|--------------|
  /// | Logical AND | `r[a] ← r[a] & r[b]` | `AND Ra, Rb` |
  And = 0xA8,

  /// | Operation  | Semantics/RTL        | Assembly    |
  /// |------------|----------------------|-------------|
  /// | Logical OR | `r[a] ← r[a] \| r[b]` | `OR Ra, Rb` |
  Or = 0xAA,

  /// | Operation   | Semantics/RTL        | Assembly     |
  /// |-------------|----------------------|--------------|
  /// | Logical XOR | `r[a] ← r[a] ^ r[b]` | `XOR Ra, Rb` |
  Xor = 0xAB,

  /// | Operation  | Semantics/RTL         | Assembly     |
  /// |------------|-----------------------|--------------|
  /// | Shift left | `r[a] ← r[a] << r[b]` | `SHL Ra, Rb` |
  Shl = 0xAC,

  /// | Operation   | Semantics/RTL         | Assembly     |
  /// |-------------|-----------------------|--------------|
  /// | Shift right | `r[a] ← r[a] >> r[b]` | `SHR Ra, Rb` |
  Shr = 0xAD,
}

impl Opcode {
  /// Decode a raw byte. `None` means the byte is not a known instruction;
  /// the execution engine treats that permissively, not fatally.
  pub fn decode(byte: u8) -> Option<Self> {
    let op = match byte {
      0x00 => Self::Nop,
      0x01 => Self::Hlt,
      0x11 => Self::Ret,
      0x45 => Self::Push,
      0x46 => Self::Pop,
      0x47 => Self::Prn,
      0x50 => Self::Call,
      0x54 => Self::Jmp,
      0x55 => Self::Jeq,
      0x56 => Self::Jne,
      0x69 => Self::Not,
      0x82 => Self::Ldi,
      0xA0 => Self::Add,
      0xA1 => Self::Sub,
      0xA2 => Self::Mul,
      0xA4 => Self::Mod,
      0xA7 => Self::Cmp,
      0xA8 => Self::And,
      0xAA => Self::Or,
      0xAB => Self::Xor,
      0xAC => Self::Shl,
      0xAD => Self::Shr,
      _ => return None,
    };
    Some(op)
  }

  /// Number of operand bytes following the opcode, encoded in its top
  /// 2 bits.
  pub fn operands(self) -> usize {
    operand_count(self as u8)
  }

  /// Whether this instruction is handled by the ALU (bit 5 of the
  /// opcode byte).
  pub fn is_alu(self) -> bool {
    (self as u8) & 0b0010_0000 != 0
  }

  /// The ALU operation an ALU opcode dispatches to.
  ///
  /// # Panics
  ///
  /// Feeding a non-ALU opcode here is a decode bug, not a runtime
  /// condition, and panics.
  pub fn alu_op(self) -> AluOp {
    match self {
      Self::Add => AluOp::Add,
      Self::Sub => AluOp::Sub,
      Self::Mul => AluOp::Mul,
      Self::Mod => AluOp::Mod,
      Self::Cmp => AluOp::Cmp,
      Self::And => AluOp::And,
      Self::Or => AluOp::Or,
      Self::Xor => AluOp::Xor,
      Self::Not => AluOp::Not,
      Self::Shl => AluOp::Shl,
      Self::Shr => AluOp::Shr,
      _ => panic!("{self:?} is not an ALU operation"),
    }
  }
}

/// Operand count from the top 2 bits of any opcode byte, known or not.
pub fn operand_count(byte: u8) -> usize {
  usize::from(byte >> 6)
}

#[cfg(test)]
mod tests {
  use super::*;

  mod opcode {
    use super::*;

    #[test]
    fn decode_round_trips() {
      for byte in 0..=u8::MAX {
        if let Some(op) = Opcode::decode(byte) {
          assert_eq!(op as u8, byte);
        }
      }
    }

    #[test]
    fn decode_unknown() {
      assert_eq!(Opcode::decode(0xFF), None);
      assert_eq!(Opcode::decode(0x05), None);
    }

    #[test]
    fn operand_counts_match_encoding() {
      assert_eq!(Opcode::Hlt.operands(), 0);
      assert_eq!(Opcode::Ret.operands(), 0);
      assert_eq!(Opcode::Prn.operands(), 1);
      assert_eq!(Opcode::Call.operands(), 1);
      assert_eq!(Opcode::Not.operands(), 1);
      assert_eq!(Opcode::Ldi.operands(), 2);
      assert_eq!(Opcode::Mul.operands(), 2);
    }

    #[test]
    fn alu_marker_bit() {
      assert!(Opcode::Add.is_alu());
      assert!(Opcode::Not.is_alu());
      assert!(Opcode::Shr.is_alu());
      assert!(!Opcode::Ldi.is_alu());
      assert!(!Opcode::Push.is_alu());
      assert!(!Opcode::Jeq.is_alu());
    }

    #[test]
    fn every_alu_opcode_maps() {
      for byte in 0..=u8::MAX {
        if let Some(op) = Opcode::decode(byte) {
          if op.is_alu() {
            // must not panic
            let _ = op.alu_op();
          }
        }
      }
    }

    #[test]
    #[should_panic(expected = "not an ALU operation")]
    fn non_alu_opcode_panics() {
      let _ = Opcode::Jmp.alu_op();
    }
  }
}
