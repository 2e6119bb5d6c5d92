//! # Alex Machine ISA
//!
//! 32-bit register machine with byte-addressable memory.
//!
//! ## Key Features
//! - 16 general-purpose 32-bit registers (r11-r15 aliased fp, sp, gp, at, lr)
//! - 16 IEEE-754 double-precision float registers
//! - 32-bit instruction words with an 8-bit opcode in the top byte
//! - Three instruction formats (R, I, J)
//! - Little-endian, sparse, byte-addressable memory

pub mod register;
pub mod opcode;
pub mod encoding;
pub mod instruction;
pub mod error;

pub use register::{Register, NUM_REGISTERS, NUM_FLOAT_REGISTERS};
pub use opcode::{Opcode, InstructionFamily};
pub use instruction::{decode, Extension, Format, Operands};
pub use error::SpecError;

/// Size of one instruction word in bytes
pub const INSTRUCTION_BYTES: u32 = 4;

/// Byte widths of the four data access sizes
pub const BYTE_BYTES: u32 = 1;
pub const HALF_BYTES: u32 = 2;
pub const WORD_BYTES: u32 = 4;
pub const FLOAT_BYTES: u32 = 8;

/// Segment mask kept from the PC by absolute jumps (top 6 bits, 64 MB segments)
pub const JUMP_SEGMENT_MASK: u32 = 0xFC00_0000;

/// Machine word (32-bit, two's complement when signed)
pub type Word = u32;

/// Address type (32-bit byte address)
pub type Address = u32;

/// Signed view of a machine word
pub type SWord = i32;
