//! Instruction execution
//!
//! Looks up the dispatch entry, decodes operands with the entry's format,
//! applies its behavior to the machine state, and then its control transfer.
//! Every fault is detected before the first state mutation of the
//! instruction that raises it.

use alex_spec::encoding::{extract_opcode, jump_target};
use alex_spec::{Operands, Register, INSTRUCTION_BYTES, WORD_BYTES};

use crate::dispatch::{lookup, Entry, Exec, Width};
use crate::error::Fault;
use crate::fpu;
use crate::io::IOHandler;
use crate::state::{StepOutcome, VMState};

/// Operand fields flattened across formats
#[derive(Debug, Clone, Copy)]
struct Args {
    ra: Register,
    rb: Register,
    rc: Register,
    /// Extended immediate, or the raw 24-bit target for J-format
    imm: u32,
}

impl From<Operands> for Args {
    fn from(operands: Operands) -> Self {
        match operands {
            Operands::R { ra, rb, rc } => Args { ra, rb, rc, imm: 0 },
            Operands::I { ra, rb, imm } => Args {
                ra,
                rb,
                rc: Register::R0,
                imm,
            },
            Operands::J { target } => Args {
                ra: Register::R0,
                rb: Register::R0,
                rc: Register::R0,
                imm: target,
            },
        }
    }
}

/// Execute one instruction word as if fetched from the current PC
pub fn execute(word: u32, state: &mut VMState, io: &mut IOHandler) -> Result<StepOutcome, Fault> {
    let opcode = extract_opcode(word);
    let entry = lookup(opcode).ok_or(Fault::Decode { opcode })?;
    let pc = state.pc();

    let target = apply(entry, word, pc, state, io)?;

    match entry.transfer.next_pc(pc, target) {
        Some(next) => {
            state.registers.set_pc(next);
            Ok(StepOutcome::Continue)
        }
        None => {
            state.halt();
            Ok(StepOutcome::Halted)
        }
    }
}

/// Perform an entry's behavior; returns the jump target for transfer instructions
fn apply(
    entry: &Entry,
    word: u32,
    pc: u32,
    state: &mut VMState,
    io: &mut IOHandler,
) -> Result<Option<u32>, Fault> {
    let Args { ra, rb, rc, imm } = Args::from(entry.format.decode(word));

    match entry.exec {
        Exec::Nop => {}

        Exec::BinR(op) => {
            let value = op.apply(state.read_reg(rb), state.read_reg(rc))?;
            state.write_reg(ra, value);
        }

        Exec::BinI(op) => {
            let value = op.apply(state.read_reg(rb), imm)?;
            state.write_reg(ra, value);
        }

        Exec::LoadImm => state.write_reg(ra, imm),

        Exec::LoadUpper => state.write_reg(ra, imm << 16),

        Exec::Branch(cond) => {
            let target = if cond.test(state.read_reg(ra), state.read_reg(rb)) {
                pc.wrapping_add(imm)
            } else {
                pc.wrapping_add(INSTRUCTION_BYTES)
            };
            return Ok(Some(target));
        }

        Exec::Jump => return Ok(Some(jump_target(pc, imm))),

        Exec::JumpReg => return Ok(Some(state.read_reg(ra))),

        Exec::Call => {
            let sp = state.read_reg(Register::SP).wrapping_sub(WORD_BYTES);
            state.write_reg(Register::SP, sp);
            state.memory.store_word(sp, pc.wrapping_add(INSTRUCTION_BYTES));
            return Ok(Some(state.read_reg(ra)));
        }

        Exec::Ret => {
            let sp = state.read_reg(Register::SP);
            let target = state.memory.load_word(sp);
            state.write_reg(Register::SP, sp.wrapping_add(WORD_BYTES));
            return Ok(Some(target));
        }

        Exec::Load(width) => {
            let addr = state.read_reg(rb).wrapping_add(imm);
            let value = load(state, width, addr);
            state.write_reg(ra, value);
        }

        Exec::LoadFloat => {
            let addr = state.read_reg(rb).wrapping_add(imm);
            let value = state.memory.load_float(addr);
            state.write_freg(ra, value);
        }

        Exec::Store(width) => {
            let addr = state.read_reg(rb).wrapping_add(imm);
            let value = state.read_reg(ra);
            store(state, width, addr, value);
        }

        Exec::StoreFloat => {
            let addr = state.read_reg(rb).wrapping_add(imm);
            let value = state.read_freg(ra);
            state.memory.store_float(addr, value);
        }

        Exec::Pop { width, step } => {
            let value = load(state, width, state.read_reg(Register::SP));
            state.write_reg(ra, value);
            let sp = state.read_reg(Register::SP).wrapping_add(step);
            state.write_reg(Register::SP, sp);
        }

        Exec::PopFloat => {
            let sp = state.read_reg(Register::SP);
            let value = state.memory.load_float(sp);
            state.write_freg(ra, value);
            state.write_reg(Register::SP, sp.wrapping_add(alex_spec::FLOAT_BYTES));
        }

        Exec::Push { width, step } => {
            let sp = state.read_reg(Register::SP).wrapping_sub(step);
            state.write_reg(Register::SP, sp);
            let value = state.read_reg(ra);
            store(state, width, sp, value);
        }

        Exec::PushFloat => {
            let sp = state
                .read_reg(Register::SP)
                .wrapping_sub(alex_spec::FLOAT_BYTES);
            state.write_reg(Register::SP, sp);
            let value = state.read_freg(ra);
            state.memory.store_float(sp, value);
        }

        Exec::IntToFloat { signed } => {
            let bits = state.read_reg(rb);
            let value = if signed { fpu::itof(bits) } else { fpu::utof(bits) };
            state.write_freg(ra, value);
        }

        Exec::FloatToInt { signed } => {
            let value = state.read_freg(rb);
            let bits = if signed { fpu::ftoi(value) } else { fpu::ftou(value) };
            state.write_reg(ra, bits);
        }

        Exec::FloatBin(op) => {
            let value = op.apply(state.read_freg(rb), state.read_freg(rc));
            state.write_freg(ra, value);
        }

        Exec::FloatCmp(cmp) => {
            let value = cmp.apply(state.read_freg(rb), state.read_freg(rc));
            state.write_reg(ra, value);
        }

        Exec::Round(rounding) => {
            let value = rounding.apply(state.read_freg(rb));
            state.write_freg(ra, value);
        }

        Exec::Putc => io.putc(state.read_reg(rb) as u8)?,

        Exec::Halt => {}
    }

    Ok(None)
}

fn load(state: &VMState, width: Width, addr: u32) -> u32 {
    match width {
        Width::Byte => state.memory.load_byte(addr) as u32,
        Width::Half => state.memory.load_half(addr) as u32,
        Width::Word => state.memory.load_word(addr),
    }
}

fn store(state: &mut VMState, width: Width, addr: u32, value: u32) {
    match width {
        Width::Byte => state.memory.store_byte(addr, value as u8),
        Width::Half => state.memory.store_half(addr, value as u16),
        Width::Word => state.memory.store_word(addr, value),
    }
}
