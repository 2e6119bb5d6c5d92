//! Opcode dispatch table
//!
//! A 256-entry static array keyed by the opcode byte. Each populated slot
//! pairs the operand format with an execute behavior and the control
//! transfer applied afterwards. Empty slots are unassigned opcodes.

use alex_spec::{Format, Opcode, FLOAT_BYTES, HALF_BYTES, INSTRUCTION_BYTES, WORD_BYTES};

use crate::alu::{AluOp, Cond};
use crate::fpu::{FpuCmp, FpuOp, Rounding};

/// Integer memory access width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Half,
    Word,
}

impl Width {
    pub const fn bytes(self) -> u32 {
        match self {
            Width::Byte => alex_spec::BYTE_BYTES,
            Width::Half => HALF_BYTES,
            Width::Word => WORD_BYTES,
        }
    }
}

/// What an instruction does to registers, memory, and output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exec {
    Nop,
    /// ra = rb op rc
    BinR(AluOp),
    /// ra = rb op imm
    BinI(AluOp),
    /// ra = imm
    LoadImm,
    /// ra = imm << 16
    LoadUpper,
    /// Taken: PC + imm, otherwise PC + 4
    Branch(Cond),
    /// Segment-relative absolute jump
    Jump,
    /// PC = ra
    JumpReg,
    Call,
    Ret,
    /// ra = mem[rb + imm], zero-extended
    Load(Width),
    /// f[ra] = mem[rb + imm]
    LoadFloat,
    /// mem[rb + imm] = ra, truncated
    Store(Width),
    StoreFloat,
    /// ra = mem[SP]; SP += step
    Pop { width: Width, step: u32 },
    PopFloat,
    /// SP -= step; mem[SP] = ra
    Push { width: Width, step: u32 },
    PushFloat,
    /// f[ra] = rb as signed or unsigned
    IntToFloat { signed: bool },
    /// ra = floor(f[rb]) saturated to signed or unsigned
    FloatToInt { signed: bool },
    FloatBin(FpuOp),
    FloatCmp(FpuCmp),
    Round(Rounding),
    Putc,
    Halt,
}

/// Control transfer applied after execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// PC += 4
    Advance,
    /// PC := value produced by execute
    Jump,
    /// Stop; PC stays on the halt instruction
    Halt,
}

impl Transfer {
    /// Next PC, or `None` for halt
    pub fn next_pc(self, pc: u32, target: Option<u32>) -> Option<u32> {
        match self {
            Transfer::Advance => Some(pc.wrapping_add(INSTRUCTION_BYTES)),
            Transfer::Jump => Some(target.unwrap_or_else(|| pc.wrapping_add(INSTRUCTION_BYTES))),
            Transfer::Halt => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub opcode: Opcode,
    pub format: Format,
    pub exec: Exec,
    pub transfer: Transfer,
}

const fn behavior(op: Opcode) -> (Exec, Transfer) {
    use Exec::*;
    use Opcode as O;
    use Transfer::{Advance, Jump as J, Halt as H};

    match op {
        O::Nop | O::Rsv => (Nop, Advance),

        O::Add => (BinR(AluOp::Add), Advance),
        O::Addi | O::Addiu => (BinI(AluOp::Add), Advance),
        O::Sub => (BinR(AluOp::Sub), Advance),
        O::Subi | O::Subiu => (BinI(AluOp::Sub), Advance),
        O::Mul => (BinR(AluOp::Mul), Advance),
        O::Muli | O::Muliu => (BinI(AluOp::Mul), Advance),
        O::Div => (BinR(AluOp::Div), Advance),
        O::Divi | O::Diviu => (BinI(AluOp::Div), Advance),
        O::Divu => (BinR(AluOp::Divu), Advance),
        O::Mod => (BinR(AluOp::Mod), Advance),
        O::Modi | O::Modiu => (BinI(AluOp::Mod), Advance),
        O::Modu => (BinR(AluOp::Modu), Advance),

        O::Shl => (BinR(AluOp::Shl), Advance),
        O::Shli => (BinI(AluOp::Shl), Advance),
        O::Shr => (BinR(AluOp::Shr), Advance),
        O::Shri => (BinI(AluOp::Shr), Advance),
        O::Sar => (BinR(AluOp::Sar), Advance),
        O::Sari => (BinI(AluOp::Sar), Advance),

        O::And => (BinR(AluOp::And), Advance),
        O::Or => (BinR(AluOp::Or), Advance),
        O::Ori => (BinI(AluOp::Or), Advance),
        O::Xor => (BinR(AluOp::Xor), Advance),
        O::Not => (BinR(AluOp::Not), Advance),

        O::Eq => (BinR(AluOp::Eq), Advance),
        O::Ne => (BinR(AluOp::Ne), Advance),
        O::Lt => (BinR(AluOp::Lt), Advance),
        O::Ltu => (BinR(AluOp::Ltu), Advance),
        O::Gt => (BinR(AluOp::Gt), Advance),
        O::Gtu => (BinR(AluOp::Gtu), Advance),
        O::Le => (BinR(AluOp::Le), Advance),
        O::Leu => (BinR(AluOp::Leu), Advance),
        O::Ge => (BinR(AluOp::Ge), Advance),
        O::Geu => (BinR(AluOp::Geu), Advance),

        O::Br => (Branch(Cond::Always), J),
        O::Beq => (Branch(Cond::Eq), J),
        O::Bne => (Branch(Cond::Ne), J),
        O::Blt => (Branch(Cond::Lt), J),
        O::Bgt => (Branch(Cond::Gt), J),
        O::J => (Jump, J),
        O::Jr => (JumpReg, J),
        O::Call => (Call, J),
        O::Ret => (Ret, J),

        O::Lw => (Load(Width::Word), Advance),
        O::Lh => (Load(Width::Half), Advance),
        O::Lb => (Load(Width::Byte), Advance),
        O::Lf => (LoadFloat, Advance),
        O::Li | O::Liu => (LoadImm, Advance),
        O::Lui => (LoadUpper, Advance),
        O::Sw => (Store(Width::Word), Advance),
        O::Sh => (Store(Width::Half), Advance),
        O::Sb => (Store(Width::Byte), Advance),
        O::Sf => (StoreFloat, Advance),

        O::Pop => (Pop { width: Width::Word, step: WORD_BYTES }, Advance),
        O::Poph => (Pop { width: Width::Half, step: HALF_BYTES }, Advance),
        O::Popb => (Pop { width: Width::Byte, step: alex_spec::BYTE_BYTES }, Advance),
        O::Popf => (PopFloat, Advance),
        O::Popw8 => (Pop { width: Width::Word, step: FLOAT_BYTES }, Advance),
        O::Push => (Push { width: Width::Word, step: WORD_BYTES }, Advance),
        O::Pushh => (Push { width: Width::Half, step: HALF_BYTES }, Advance),
        O::Pushb => (Push { width: Width::Byte, step: alex_spec::BYTE_BYTES }, Advance),
        O::Pushf => (PushFloat, Advance),
        O::Pushw8 => (Push { width: Width::Word, step: FLOAT_BYTES }, Advance),

        O::Itof => (IntToFloat { signed: true }, Advance),
        O::Utof => (IntToFloat { signed: false }, Advance),
        O::Ftoi => (FloatToInt { signed: true }, Advance),
        O::Ftou => (FloatToInt { signed: false }, Advance),

        O::Fadd => (FloatBin(FpuOp::Add), Advance),
        O::Fsub => (FloatBin(FpuOp::Sub), Advance),
        O::Fmul => (FloatBin(FpuOp::Mul), Advance),
        O::Fdiv => (FloatBin(FpuOp::Div), Advance),
        O::Fmod => (FloatBin(FpuOp::Mod), Advance),
        O::Feq => (FloatCmp(FpuCmp::Eq), Advance),
        O::Fne => (FloatCmp(FpuCmp::Ne), Advance),
        O::Flt => (FloatCmp(FpuCmp::Lt), Advance),
        O::Fgt => (FloatCmp(FpuCmp::Gt), Advance),
        O::Fle => (FloatCmp(FpuCmp::Le), Advance),
        O::Fge => (FloatCmp(FpuCmp::Ge), Advance),
        O::Floor => (Round(Rounding::Floor), Advance),
        O::Ceil => (Round(Rounding::Ceil), Advance),

        O::Putc => (Putc, Advance),
        O::Halt => (Halt, H),
    }
}

const fn build_table() -> [Option<Entry>; 256] {
    let mut table: [Option<Entry>; 256] = [None; 256];
    let mut i = 0;
    while i < Opcode::ALL.len() {
        let opcode = Opcode::ALL[i];
        let (exec, transfer) = behavior(opcode);
        table[opcode.to_u8() as usize] = Some(Entry {
            opcode,
            format: opcode.format(),
            exec,
            transfer,
        });
        i += 1;
    }
    table
}

static TABLE: [Option<Entry>; 256] = build_table();

/// Dispatch entry for an opcode byte, if assigned
#[inline]
pub fn lookup(opcode: u8) -> Option<&'static Entry> {
    TABLE[opcode as usize].as_ref()
}
