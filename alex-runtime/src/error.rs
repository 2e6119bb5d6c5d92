//! Runtime error types for the Alex simulator

use thiserror::Error;

/// Unrecoverable condition raised while executing one instruction
#[derive(Debug, Error)]
pub enum Fault {
    #[error("Decode fault: no dispatch entry for opcode {opcode:#04x}")]
    Decode { opcode: u8 },

    #[error("Arithmetic fault: division by zero")]
    DivisionByZero,

    #[error("Index fault: register index {index} out of range 0-15")]
    InvalidRegister { index: u8 },

    /// Reserved for bounds enforcement; every address is valid today
    #[error("Memory fault: address {address:#010x}")]
    Memory { address: u32 },

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{fault} (instruction {word:#010x} at PC {pc:#010x})")]
    Fault {
        pc: u32,
        word: u32,
        #[source]
        fault: Fault,
    },

    #[error("Register access failed: {0}")]
    Register(Fault),

    #[error("Snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),
}

impl RuntimeError {
    /// Attach the failing instruction and PC to a fault
    pub fn at(fault: Fault, pc: u32, word: u32) -> Self {
        RuntimeError::Fault { pc, word, fault }
    }

    /// The underlying fault, if this error came from executing an instruction
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            RuntimeError::Fault { fault, .. } | RuntimeError::Register(fault) => Some(fault),
            _ => None,
        }
    }

    /// PC of the failing instruction, if known
    pub fn pc(&self) -> Option<u32> {
        match self {
            RuntimeError::Fault { pc, .. } => Some(*pc),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
