//! # Error Types for the Alex ISA

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    // Instruction errors
    #[error("Invalid opcode: {0:#04x}")]
    InvalidOpcode(u8),

    #[error("Invalid register index: {0} (valid range: 0-15)")]
    InvalidRegister(u8),

    #[error("Invalid immediate value: {value:#x} does not fit in {bits} bits")]
    InvalidImmediate { value: u32, bits: u32 },
}

impl SpecError {
    /// Check if this is a fatal error that should abort execution
    pub fn is_fatal(&self) -> bool {
        matches!(self, SpecError::InvalidOpcode(_) | SpecError::InvalidRegister(_))
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;
