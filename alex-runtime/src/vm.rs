//! Alex machine execution driver

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use alex_spec::{Opcode, Register};
use tracing::{debug, trace, warn};

use crate::error::{Result, RuntimeError};
use crate::execute::execute;
use crate::io::IOHandler;
use crate::memory::Memory;
use crate::snapshot::MachineSnapshot;
use crate::state::{HaltReason, StepOutcome, VMState};

/// `{:#010x}` formatting for trace fields
struct Hex(u32);

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// VM configuration
#[derive(Debug, Clone)]
pub struct VMConfig {
    /// Stop `run` after this many retired instructions (`None` = unlimited)
    pub max_cycles: Option<u64>,

    /// Emit a `trace!` event per executed instruction
    pub trace: bool,

    /// Echo character output to process stdout in addition to capturing it
    ///
    /// Output is captured either way and grows until [`VM::take_output`] or
    /// [`VM::reset`] drains it.
    pub echo_output: bool,
}

impl Default for VMConfig {
    fn default() -> Self {
        Self {
            max_cycles: None,
            trace: false,
            echo_output: true,
        }
    }
}

/// Execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Instructions retired, including the halt
    pub cycles: u64,

    /// Reason for halting
    pub halt_reason: HaltReason,

    /// Bytes written by `putc`
    pub output: Vec<u8>,
}

/// Alex virtual machine
#[derive(Debug)]
pub struct VM {
    state: VMState,
    io: IOHandler,
    config: VMConfig,
}

impl VM {
    /// Create a zeroed machine
    pub fn new(config: VMConfig) -> Self {
        let io = if config.echo_output {
            IOHandler::stdout()
        } else {
            IOHandler::new()
        };
        Self::with_io(config, io)
    }

    /// Create a zeroed machine whose output is echoed to `sink`
    pub fn with_output<W: Write + Send + 'static>(config: VMConfig, sink: W) -> Self {
        Self::with_io(config, IOHandler::with_sink(sink))
    }

    fn with_io(config: VMConfig, io: IOHandler) -> Self {
        VM {
            state: VMState::new(),
            io,
            config,
        }
    }

    pub fn config(&self) -> &VMConfig {
        &self.config
    }

    /// Zero registers, PC, and memory, drop captured output, and resume running
    pub fn reset(&mut self) {
        self.state.reset();
        self.io.clear();
        debug!("machine reset");
    }

    /// Load bytes at address 0
    pub fn load(&mut self, bytes: &[u8]) {
        self.load_at(0, bytes);
    }

    /// Load bytes at an arbitrary base address
    pub fn load_at(&mut self, base: u32, bytes: &[u8]) {
        self.state.memory.write_bytes(base, bytes);
        debug!(base = %Hex(base), len = bytes.len(), "loaded bytes");
    }

    /// Load instruction words (little-endian) starting at `base`
    pub fn load_words(&mut self, base: u32, words: &[u32]) {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        self.load_at(base, &bytes);
    }

    pub fn set_registers<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (u8, i32)>,
    {
        self.state
            .registers
            .set_many(values)
            .map_err(RuntimeError::Register)
    }

    pub fn set_registers_unsigned<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (u8, u32)>,
    {
        self.state
            .registers
            .set_many_unsigned(values)
            .map_err(RuntimeError::Register)
    }

    pub fn get_registers(&self, indices: &[u8]) -> Result<BTreeMap<u8, i32>> {
        self.state
            .registers
            .get_many(indices)
            .map_err(RuntimeError::Register)
    }

    pub fn get_registers_unsigned(&self, indices: &[u8]) -> Result<BTreeMap<u8, u32>> {
        self.state
            .registers
            .get_many_unsigned(indices)
            .map_err(RuntimeError::Register)
    }

    pub fn set_float_registers<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (u8, f64)>,
    {
        self.state
            .registers
            .set_many_float(values)
            .map_err(RuntimeError::Register)
    }

    pub fn get_float_registers(&self, indices: &[u8]) -> Result<BTreeMap<u8, f64>> {
        self.state
            .registers
            .get_many_float(indices)
            .map_err(RuntimeError::Register)
    }

    #[inline]
    pub fn register(&self, reg: Register) -> u32 {
        self.state.read_reg(reg)
    }

    #[inline]
    pub fn float_register(&self, reg: Register) -> f64 {
        self.state.read_freg(reg)
    }

    #[inline]
    pub fn pc(&self) -> u32 {
        self.state.pc()
    }

    pub fn set_pc(&mut self, pc: u32) {
        self.state.registers.set_pc(pc);
    }

    pub fn state(&self) -> &VMState {
        &self.state
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    pub fn is_halted(&self) -> bool {
        self.state.is_halted()
    }

    pub fn cycles(&self) -> u64 {
        self.state.cycles
    }

    /// Bytes written by `putc` since the last reset
    pub fn output(&self) -> &[u8] {
        self.io.output()
    }

    /// Drain the captured output, leaving the buffer empty
    pub fn take_output(&mut self) -> Vec<u8> {
        self.io.take_output()
    }

    /// Execute a caller-supplied instruction word at the current PC
    ///
    /// Returns `Halted` without executing if the machine already halted.
    pub fn execute_word(&mut self, word: u32) -> Result<StepOutcome> {
        if self.state.is_halted() {
            return Ok(StepOutcome::Halted);
        }

        let pc = self.state.pc();
        if self.config.trace {
            let mnemonic = Opcode::from_instruction(word).map_or("???", Opcode::mnemonic);
            trace!(
                cycle = self.state.cycles,
                pc = %Hex(pc),
                word = %Hex(word),
                mnemonic,
                "step"
            );
        }

        match execute(word, &mut self.state, &mut self.io) {
            Ok(outcome) => {
                self.state.cycles += 1;
                if outcome == StepOutcome::Halted {
                    debug!(
                        pc = %Hex(pc),
                        cycles = self.state.cycles,
                        "halted"
                    );
                }
                Ok(outcome)
            }
            Err(fault) => {
                warn!(
                    pc = %Hex(pc),
                    word = %Hex(word),
                    %fault,
                    "execution aborted"
                );
                Err(RuntimeError::at(fault, pc, word))
            }
        }
    }

    /// Fetch the word at PC and execute it
    pub fn step(&mut self) -> Result<StepOutcome> {
        if self.state.is_halted() {
            return Ok(StepOutcome::Halted);
        }
        let word = self.state.memory.load_word(self.state.pc());
        self.execute_word(word)
    }

    /// Step until halt or the configured cycle limit
    pub fn run(&mut self) -> Result<ExecutionResult> {
        let halt_reason = loop {
            if self.state.is_halted() {
                break HaltReason::Halt;
            }
            if let Some(max) = self.config.max_cycles {
                if self.state.cycles >= max {
                    debug!(max, "cycle limit reached");
                    break HaltReason::CycleLimit;
                }
            }
            self.step()?;
        };

        Ok(ExecutionResult {
            cycles: self.state.cycles,
            halt_reason,
            output: self.io.output().to_vec(),
        })
    }

    /// Copy of the full machine state
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot::capture(&self.state)
    }

    /// Replace the machine state with a snapshot; captured output is kept
    pub fn restore(&mut self, snapshot: &MachineSnapshot) {
        self.state = snapshot.to_state();
        debug!(pc = %Hex(snapshot.pc()), "restored snapshot");
    }
}
