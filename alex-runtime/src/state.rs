//! Machine state for the Alex simulator

use alex_spec::Register;
use serde::{Deserialize, Serialize};

use crate::memory::Memory;
use crate::registers::RegisterFile;

/// Control-flow state; only the halt opcode leaves `Running`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Running,
    Halted,
}

/// Why a run ended without a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The halt opcode executed
    Halt,
    /// `VMConfig::max_cycles` was reached first
    CycleLimit,
}

/// Result of executing a single instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Halted,
}

#[derive(Debug, Clone, Default)]
pub struct VMState {
    pub registers: RegisterFile,
    pub memory: Memory,
    pub run: RunState,
    /// Instructions retired since the last reset
    pub cycles: u64,
}

impl VMState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero registers, PC, and memory; resume the running state
    pub fn reset(&mut self) {
        self.registers.reset();
        self.memory.clear();
        self.run = RunState::Running;
        self.cycles = 0;
    }

    #[inline]
    pub fn pc(&self) -> u32 {
        self.registers.pc()
    }

    #[inline]
    pub fn read_reg(&self, reg: Register) -> u32 {
        self.registers.read(reg)
    }

    #[inline]
    pub fn write_reg(&mut self, reg: Register, value: u32) {
        self.registers.write(reg, value);
    }

    #[inline]
    pub fn read_freg(&self, reg: Register) -> f64 {
        self.registers.read_float(reg)
    }

    #[inline]
    pub fn write_freg(&mut self, reg: Register, value: f64) {
        self.registers.write_float(reg, value);
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.run == RunState::Halted
    }

    pub fn halt(&mut self) {
        self.run = RunState::Halted;
    }
}
