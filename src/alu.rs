//! Arithmetic/logic unit: pure computation over two register values.
//!
//! The ALU never touches machine state itself; the execution engine reads
//! the operand registers, calls [`execute`], and applies the [`Outcome`].

/// Flags bit recording "equal" from the last CMP.
pub const FL_EQUAL: u8 = 0b001;
/// Flags bit recording "greater than" from the last CMP.
pub const FL_GREATER: u8 = 0b010;
/// Flags bit recording "less than" from the last CMP.
pub const FL_LESS: u8 = 0b100;

/// Operations the ALU knows how to perform.
///
/// Binary operations combine register A with register B; `Not` is unary
/// and ignores B entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
  Add,
  Sub,
  Mul,
  Cmp,
  And,
  Or,
  Xor,
  Not,
  Shl,
  Shr,
  Mod,
}

/// What an ALU operation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// New value for register A.
  Value(u8),
  /// New flags byte; only `Cmp` produces this.
  Flags(u8),
  /// `Mod` with a zero divisor. The machine halts rather than faulting.
  DivideByZero,
}

/// Compute `a op b`.
///
/// All arithmetic wraps mod 256; shifts are logical, and a shift count of
/// 8 or more clears the register.
pub fn execute(op: AluOp, a: u8, b: u8) -> Outcome {
  match op {
    AluOp::Add => Outcome::Value(a.wrapping_add(b)),
    AluOp::Sub => Outcome::Value(a.wrapping_sub(b)),
    AluOp::Mul => Outcome::Value(a.wrapping_mul(b)),
    AluOp::Cmp => Outcome::Flags(compare(a, b)),
    AluOp::And => Outcome::Value(a & b),
    AluOp::Or => Outcome::Value(a | b),
    AluOp::Xor => Outcome::Value(a ^ b),
    AluOp::Not => Outcome::Value(!a),
    AluOp::Shl => Outcome::Value(a.checked_shl(u32::from(b)).unwrap_or(0)),
    AluOp::Shr => Outcome::Value(a.checked_shr(u32::from(b)).unwrap_or(0)),
    AluOp::Mod => {
      if b == 0 {
        Outcome::DivideByZero
      } else {
        Outcome::Value(a % b)
      }
    }
  }
}

/// Exactly one flags bit set for any pair of values.
fn compare(a: u8, b: u8) -> u8 {
  match a.cmp(&b) {
    std::cmp::Ordering::Equal => FL_EQUAL,
    std::cmp::Ordering::Greater => FL_GREATER,
    std::cmp::Ordering::Less => FL_LESS,
  }
}
