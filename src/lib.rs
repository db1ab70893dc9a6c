//! Emulator for the LS-8 Instruction Set Architecture
//!
//! An 8-bit computer with 8-bit addressing: 256 bytes of RAM, eight
//! general-purpose registers (R7 doubling as the stack pointer), a flags
//! register, and a fixed set of 1-3 byte instructions.

pub mod alu;
pub mod memory;
pub mod opcode;
pub mod program;
pub mod registers;
pub mod vm;
