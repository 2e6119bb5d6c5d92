//! Serializable copy of a whole machine

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::memory::Memory;
use crate::registers::RegisterFile;
use crate::state::{RunState, VMState};

/// Registers, PC, run state, and every realized memory page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub registers: RegisterFile,
    pub run: RunState,
    pub cycles: u64,
    /// (page base address, page bytes), ascending by address
    pub memory: Vec<(u32, Vec<u8>)>,
}

impl MachineSnapshot {
    pub fn capture(state: &VMState) -> Self {
        MachineSnapshot {
            registers: state.registers.clone(),
            run: state.run,
            cycles: state.cycles,
            memory: state.memory.pages(),
        }
    }

    /// Rebuild the machine state this snapshot describes
    pub fn to_state(&self) -> VMState {
        VMState {
            registers: self.registers.clone(),
            memory: Memory::from_pages(self.memory.iter().cloned()),
            run: self.run,
            cycles: self.cycles,
        }
    }

    pub fn pc(&self) -> u32 {
        self.registers.pc()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
