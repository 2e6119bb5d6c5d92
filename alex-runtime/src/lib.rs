//! # Alex Runtime
//!
//! Instruction-set simulator for the Alex machine.
//!
//! ## Features
//!
//! - **Static dispatch**: a 256-slot table keyed by opcode byte
//! - **Wrapping arithmetic**: 32-bit two's-complement integer ops, IEEE-754 doubles
//! - **Sparse memory**: lazily allocated 4 KiB pages, little-endian, unaligned access
//! - **Snapshots**: full machine state, serializable with bincode
//!
//! ## Example
//!
//! ```rust
//! use alex_runtime::{VM, VMConfig};
//! use alex_spec::encoding::{encode_itype, encode_rtype};
//! use alex_spec::{Opcode, Register};
//!
//! let config = VMConfig { echo_output: false, ..VMConfig::default() };
//! let mut vm = VM::new(config);
//! vm.load_words(0, &[
//!     encode_itype(Opcode::Li, 1, 0, 20),
//!     encode_rtype(Opcode::Add, 1, 1, 1),
//!     encode_rtype(Opcode::Halt, 0, 0, 0),
//! ]);
//! let result = vm.run().unwrap();
//! assert_eq!(result.cycles, 3);
//! assert_eq!(vm.register(Register::R1), 40);
//! ```

pub mod alu;
pub mod fpu;
pub mod error;
pub mod registers;
pub mod memory;
pub mod state;
pub mod io;
pub mod dispatch;
pub mod execute;
pub mod snapshot;
pub mod vm;

pub use dispatch::{lookup, Entry, Exec, Transfer, Width};
pub use error::{Fault, RuntimeError};
pub use io::IOHandler;
pub use memory::{Memory, PAGE_SIZE};
pub use registers::RegisterFile;
pub use snapshot::MachineSnapshot;
pub use state::{HaltReason, RunState, StepOutcome, VMState};
pub use vm::{ExecutionResult, VMConfig, VM};

/// Simple execution helper
///
/// Loads `program` at address 0, runs it to completion without echoing
/// output, and returns the result.
pub fn run(program: &[u8]) -> Result<ExecutionResult, RuntimeError> {
    let config = VMConfig {
        echo_output: false,
        ..VMConfig::default()
    };
    let mut vm = VM::new(config);
    vm.load(program);
    vm.run()
}
