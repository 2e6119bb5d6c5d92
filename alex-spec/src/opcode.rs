//! # Alex Opcode Definitions
//!
//! This module defines the opcode values for all Alex machine instructions.
//! Opcodes occupy the top 8 bits of an instruction word (0x00-0xFF); values
//! not listed here are unassigned.
//!
//! ## Opcode Map
//!
//! - 0x00: NOP
//! - 0x01-0x0F: Arithmetic (ADD, SUB, MUL, DIV, MOD; register, signed and unsigned immediate)
//! - 0x10-0x15: Shift (SHL, SHR, SAR; register and immediate)
//! - 0x16-0x19, 0x42: Logical (AND, OR, XOR, NOT, ORI)
//! - 0x1A-0x23: Compare (EQ, NE, LT, LTU, GT, GTU, LE, LEU, GE, GEU)
//! - 0x24-0x28: Branch (BR, BEQ, BNE, BLT, BGT)
//! - 0x29-0x2C: Jump (J, JR, CALL, RET)
//! - 0x2D-0x33: Load (LW, LH, LB, LF) and load-immediate (LI, LIU, LUI)
//! - 0x34-0x37: Store (SW, SH, SB, SF)
//! - 0x38-0x41: Stack (POP*, PUSH*)
//! - 0x43-0x44: Unsigned arithmetic (DIVU, MODU)
//! - 0x45-0x47, 0x55: Conversion (ITOF, UTOF, FTOI, FTOU)
//! - 0x48-0x54: Float (FADD..FMOD, FEQ..FGE, FLOOR, CEIL)
//! - 0x80-0x81: System (RSV, PUTC)
//! - 0xFF: HALT

use serde::{Deserialize, Serialize};

use crate::instruction::{Extension, Format};

macro_rules! opcodes {
    ($($(#[$doc:meta])* $name:ident = $value:literal => $mnemonic:literal,)*) => {
        /// Instruction opcode (top byte of the instruction word)
        #[repr(u8)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum Opcode {
            $($(#[$doc])* $name = $value,)*
        }

        impl Opcode {
            /// Every assigned opcode, in declaration order
            pub const ALL: &'static [Opcode] = &[$(Opcode::$name,)*];

            /// Try to convert from u8
            pub const fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $($value => Some(Opcode::$name),)*
                    _ => None,
                }
            }

            /// Assembly mnemonic
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(Opcode::$name => $mnemonic,)*
                }
            }
        }
    };
}

opcodes! {
    /// NOP: does nothing
    Nop = 0x00 => "nop",

    // ========== Arithmetic ==========
    /// ADD: ra = rb + rc
    Add = 0x01 => "add",
    /// ADDI: ra = rb + sext(imm)
    Addi = 0x02 => "addi",
    /// ADDIU: ra = rb + zext(imm)
    Addiu = 0x03 => "addiu",
    /// SUB: ra = rb - rc
    Sub = 0x04 => "sub",
    /// SUBI: ra = rb - sext(imm)
    Subi = 0x05 => "subi",
    /// SUBIU: ra = rb - zext(imm)
    Subiu = 0x06 => "subiu",
    /// MUL: ra = low 32 bits of rb * rc
    Mul = 0x07 => "mul",
    /// MULI: ra = rb * sext(imm)
    Muli = 0x08 => "muli",
    /// MULIU: ra = rb * zext(imm)
    Muliu = 0x09 => "muliu",
    /// DIV: ra = rb / rc (signed)
    Div = 0x0A => "div",
    /// DIVI: ra = rb / sext(imm) (signed)
    Divi = 0x0B => "divi",
    /// DIVIU: ra = rb / zext(imm) (signed divide, unsigned immediate)
    Diviu = 0x0C => "diviu",
    /// MOD: ra = rb % rc (signed)
    Mod = 0x0D => "mod",
    /// MODI: ra = rb % sext(imm) (signed)
    Modi = 0x0E => "modi",
    /// MODIU: ra = rb % zext(imm) (signed remainder, unsigned immediate)
    Modiu = 0x0F => "modiu",

    // ========== Shift ==========
    /// SHL: ra = rb << rc
    Shl = 0x10 => "shl",
    /// SHLI: ra = rb << zext(imm)
    Shli = 0x11 => "shli",
    /// SHR: ra = rb >> rc (logical)
    Shr = 0x12 => "shr",
    /// SHRI: ra = rb >> zext(imm) (logical)
    Shri = 0x13 => "shri",
    /// SAR: ra = rb >> rc (arithmetic)
    Sar = 0x14 => "sar",
    /// SARI: ra = rb >> zext(imm) (arithmetic)
    Sari = 0x15 => "sari",

    // ========== Logical ==========
    /// AND: ra = rb & rc
    And = 0x16 => "and",
    /// OR: ra = rb | rc
    Or = 0x17 => "or",
    /// XOR: ra = rb ^ rc
    Xor = 0x18 => "xor",
    /// NOT: ra = !rb
    Not = 0x19 => "not",

    // ========== Compare ==========
    /// EQ: ra = (rb == rc) ? 1 : 0
    Eq = 0x1A => "eq",
    /// NE: ra = (rb != rc) ? 1 : 0
    Ne = 0x1B => "ne",
    /// LT: ra = (rb < rc) ? 1 : 0 (signed)
    Lt = 0x1C => "lt",
    /// LTU: ra = (rb < rc) ? 1 : 0 (unsigned)
    Ltu = 0x1D => "ltu",
    /// GT: ra = (rb > rc) ? 1 : 0 (signed)
    Gt = 0x1E => "gt",
    /// GTU: ra = (rb > rc) ? 1 : 0 (unsigned)
    Gtu = 0x1F => "gtu",
    /// LE: ra = (rb <= rc) ? 1 : 0 (signed)
    Le = 0x20 => "le",
    /// LEU: ra = (rb <= rc) ? 1 : 0 (unsigned)
    Leu = 0x21 => "leu",
    /// GE: ra = (rb >= rc) ? 1 : 0 (signed)
    Ge = 0x22 => "ge",
    /// GEU: ra = (rb >= rc) ? 1 : 0 (unsigned)
    Geu = 0x23 => "geu",

    // ========== Branch ==========
    /// BR: PC += offset
    Br = 0x24 => "br",
    /// BEQ: if (ra == rb) PC += offset
    Beq = 0x25 => "beq",
    /// BNE: if (ra != rb) PC += offset
    Bne = 0x26 => "bne",
    /// BLT: if (ra < rb) PC += offset (signed)
    Blt = 0x27 => "blt",
    /// BGT: if (ra > rb) PC += offset (signed)
    Bgt = 0x28 => "bgt",

    // ========== Jump ==========
    /// J: PC = (PC & 0xFC000000) | (imm << 2)
    J = 0x29 => "j",
    /// JR: PC = ra
    Jr = 0x2A => "jr",
    /// CALL: push PC + 4; PC = ra
    Call = 0x2B => "call",
    /// RET: pop PC
    Ret = 0x2C => "ret",

    // ========== Load ==========
    /// LW: ra = mem32[rb + sext(imm)]
    Lw = 0x2D => "lw",
    /// LH: ra = zext(mem16[rb + sext(imm)])
    Lh = 0x2E => "lh",
    /// LB: ra = zext(mem8[rb + sext(imm)])
    Lb = 0x2F => "lb",
    /// LF: fa = mem64[rb + sext(imm)]
    Lf = 0x30 => "lf",
    /// LI: ra = sext(imm)
    Li = 0x31 => "li",
    /// LIU: ra = zext(imm)
    Liu = 0x32 => "liu",
    /// LUI: ra = imm << 16
    Lui = 0x33 => "lui",

    // ========== Store ==========
    /// SW: mem32[rb + sext(imm)] = ra
    Sw = 0x34 => "sw",
    /// SH: mem16[rb + sext(imm)] = ra[15:0]
    Sh = 0x35 => "sh",
    /// SB: mem8[rb + sext(imm)] = ra[7:0]
    Sb = 0x36 => "sb",
    /// SF: mem64[rb + sext(imm)] = fa
    Sf = 0x37 => "sf",

    // ========== Stack ==========
    /// POP: ra = mem32[sp]; sp += 4
    Pop = 0x38 => "pop",
    /// POPH: ra = mem16[sp]; sp += 2
    Poph = 0x39 => "poph",
    /// POPB: ra = mem8[sp]; sp += 1
    Popb = 0x3A => "popb",
    /// POPF: fa = mem64[sp]; sp += 8
    Popf = 0x3B => "popf",
    /// POPW8: ra = mem32[sp]; sp += 8
    Popw8 = 0x3C => "popw8",
    /// PUSH: sp -= 4; mem32[sp] = ra
    Push = 0x3D => "push",
    /// PUSHH: sp -= 2; mem16[sp] = ra
    Pushh = 0x3E => "pushh",
    /// PUSHB: sp -= 1; mem8[sp] = ra
    Pushb = 0x3F => "pushb",
    /// PUSHF: sp -= 8; mem64[sp] = fa
    Pushf = 0x40 => "pushf",
    /// PUSHW8: sp -= 8; mem32[sp] = ra
    Pushw8 = 0x41 => "pushw8",

    /// ORI: ra = rb | zext(imm)
    Ori = 0x42 => "ori",
    /// DIVU: ra = rb / rc (unsigned)
    Divu = 0x43 => "divu",
    /// MODU: ra = rb % rc (unsigned)
    Modu = 0x44 => "modu",

    // ========== Conversion ==========
    /// ITOF: fa = (f64) (i32) rb
    Itof = 0x45 => "itof",
    /// UTOF: fa = (f64) (u32) rb
    Utof = 0x46 => "utof",
    /// FTOI: ra = (i32) floor(fb)
    Ftoi = 0x47 => "ftoi",

    // ========== Float ==========
    /// FADD: fa = fb + fc
    Fadd = 0x48 => "fadd",
    /// FSUB: fa = fb - fc
    Fsub = 0x49 => "fsub",
    /// FMUL: fa = fb * fc
    Fmul = 0x4A => "fmul",
    /// FDIV: fa = fb / fc
    Fdiv = 0x4B => "fdiv",
    /// FMOD: fa = fb % fc
    Fmod = 0x4C => "fmod",
    /// FEQ: ra = (fb == fc) ? 1 : 0
    Feq = 0x4D => "feq",
    /// FNE: ra = (fb != fc) ? 1 : 0
    Fne = 0x4E => "fne",
    /// FLT: ra = (fb < fc) ? 1 : 0
    Flt = 0x4F => "flt",
    /// FGT: ra = (fb > fc) ? 1 : 0
    Fgt = 0x50 => "fgt",
    /// FLE: ra = (fb <= fc) ? 1 : 0
    Fle = 0x51 => "fle",
    /// FGE: ra = (fb >= fc) ? 1 : 0
    Fge = 0x52 => "fge",
    /// FLOOR: fa = floor(fb)
    Floor = 0x53 => "floor",
    /// CEIL: fa = ceil(fb)
    Ceil = 0x54 => "ceil",
    /// FTOU: ra = (u32) floor(fb)
    Ftou = 0x55 => "ftou",

    // ========== System ==========
    /// RSV: reserved, executes as a no-op
    Rsv = 0x80 => "rsv",
    /// PUTC: write the low byte of rb to the output stream
    Putc = 0x81 => "putc",
    /// HALT: stop the machine
    Halt = 0xFF => "halt",
}

impl Opcode {
    /// Position of the opcode field in an instruction word
    pub const SHIFT: u32 = 24;

    /// Convert to u8
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Extract opcode from 32-bit instruction word
    #[inline]
    pub const fn from_instruction(instruction: u32) -> Option<Self> {
        Self::from_u8((instruction >> Self::SHIFT) as u8)
    }

    /// Instruction format and immediate extension policy
    ///
    /// Chosen by the opcode alone; no other field of the word is consulted.
    pub const fn format(self) -> Format {
        use Opcode::*;
        match self {
            Addi | Subi | Muli | Divi | Modi
            | Lw | Lh | Lb | Lf | Li
            | Sw | Sh | Sb | Sf => Format::I(Extension::Signed),

            Addiu | Subiu | Muliu | Diviu | Modiu
            | Shli | Shri | Sari | Ori
            | Liu | Lui => Format::I(Extension::Unsigned),

            Br | Beq | Bne | Blt | Bgt => Format::I(Extension::Offset),

            J => Format::J,

            _ => Format::R,
        }
    }

    /// Check if this is an arithmetic opcode
    #[inline]
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Addi
                | Opcode::Addiu
                | Opcode::Sub
                | Opcode::Subi
                | Opcode::Subiu
                | Opcode::Mul
                | Opcode::Muli
                | Opcode::Muliu
                | Opcode::Div
                | Opcode::Divi
                | Opcode::Diviu
                | Opcode::Divu
                | Opcode::Mod
                | Opcode::Modi
                | Opcode::Modiu
                | Opcode::Modu
        )
    }

    /// Check if this is a shift opcode
    #[inline]
    pub const fn is_shift(self) -> bool {
        matches!(
            self,
            Opcode::Shl | Opcode::Shli | Opcode::Shr | Opcode::Shri | Opcode::Sar | Opcode::Sari
        )
    }

    /// Check if this is a logical opcode
    #[inline]
    pub const fn is_logical(self) -> bool {
        matches!(
            self,
            Opcode::And | Opcode::Or | Opcode::Ori | Opcode::Xor | Opcode::Not
        )
    }

    /// Check if this is an integer compare opcode
    #[inline]
    pub const fn is_compare(self) -> bool {
        matches!(
            self,
            Opcode::Eq
                | Opcode::Ne
                | Opcode::Lt
                | Opcode::Ltu
                | Opcode::Gt
                | Opcode::Gtu
                | Opcode::Le
                | Opcode::Leu
                | Opcode::Ge
                | Opcode::Geu
        )
    }

    /// Check if this is a branch opcode
    #[inline]
    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            Opcode::Br | Opcode::Beq | Opcode::Bne | Opcode::Blt | Opcode::Bgt
        )
    }

    /// Check if this is a jump opcode (including call and return)
    #[inline]
    pub const fn is_jump(self) -> bool {
        matches!(self, Opcode::J | Opcode::Jr | Opcode::Call | Opcode::Ret)
    }

    /// Check if this is a load opcode (memory or immediate)
    #[inline]
    pub const fn is_load(self) -> bool {
        matches!(
            self,
            Opcode::Lw
                | Opcode::Lh
                | Opcode::Lb
                | Opcode::Lf
                | Opcode::Li
                | Opcode::Liu
                | Opcode::Lui
        )
    }

    /// Check if this is a store opcode
    #[inline]
    pub const fn is_store(self) -> bool {
        matches!(self, Opcode::Sw | Opcode::Sh | Opcode::Sb | Opcode::Sf)
    }

    /// Check if this is a stack push/pop opcode
    #[inline]
    pub const fn is_stack(self) -> bool {
        matches!(
            self,
            Opcode::Pop
                | Opcode::Poph
                | Opcode::Popb
                | Opcode::Popf
                | Opcode::Popw8
                | Opcode::Push
                | Opcode::Pushh
                | Opcode::Pushb
                | Opcode::Pushf
                | Opcode::Pushw8
        )
    }

    /// Check if this is a float/integer conversion opcode
    #[inline]
    pub const fn is_conversion(self) -> bool {
        matches!(self, Opcode::Itof | Opcode::Utof | Opcode::Ftoi | Opcode::Ftou)
    }

    /// Check if this is a float arithmetic or compare opcode
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(
            self,
            Opcode::Fadd
                | Opcode::Fsub
                | Opcode::Fmul
                | Opcode::Fdiv
                | Opcode::Fmod
                | Opcode::Feq
                | Opcode::Fne
                | Opcode::Flt
                | Opcode::Fgt
                | Opcode::Fle
                | Opcode::Fge
                | Opcode::Floor
                | Opcode::Ceil
        )
    }

    /// Check if this opcode transfers control (writes the PC directly)
    #[inline]
    pub const fn is_control(self) -> bool {
        self.is_branch() || self.is_jump()
    }

    /// Get the instruction family
    #[inline]
    pub const fn family(self) -> InstructionFamily {
        if self.is_arithmetic() {
            InstructionFamily::Arithmetic
        } else if self.is_shift() {
            InstructionFamily::Shift
        } else if self.is_logical() {
            InstructionFamily::Logical
        } else if self.is_compare() {
            InstructionFamily::Compare
        } else if self.is_branch() {
            InstructionFamily::Branch
        } else if self.is_jump() {
            InstructionFamily::Jump
        } else if self.is_load() {
            InstructionFamily::Load
        } else if self.is_store() {
            InstructionFamily::Store
        } else if self.is_stack() {
            InstructionFamily::Stack
        } else if self.is_conversion() {
            InstructionFamily::Conversion
        } else if self.is_float() {
            InstructionFamily::Float
        } else {
            InstructionFamily::System
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = crate::SpecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(crate::SpecError::InvalidOpcode(value))
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Instruction family
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstructionFamily {
    /// ADD, SUB, MUL, DIV, MOD and their immediate/unsigned forms
    Arithmetic = 0,
    /// SHL, SHR, SAR
    Shift = 1,
    /// AND, OR, XOR, NOT
    Logical = 2,
    /// EQ, NE, LT, LTU, GT, GTU, LE, LEU, GE, GEU
    Compare = 3,
    /// BR, BEQ, BNE, BLT, BGT
    Branch = 4,
    /// J, JR, CALL, RET
    Jump = 5,
    /// LW, LH, LB, LF, LI, LIU, LUI
    Load = 6,
    /// SW, SH, SB, SF
    Store = 7,
    /// PUSH*, POP*
    Stack = 8,
    /// ITOF, UTOF, FTOI, FTOU
    Conversion = 9,
    /// FADD..FMOD, FEQ..FGE, FLOOR, CEIL
    Float = 10,
    /// NOP, RSV, PUTC, HALT
    System = 11,
}

impl InstructionFamily {
    /// Total number of instruction families
    pub const COUNT: usize = 12;
}

impl std::fmt::Display for InstructionFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InstructionFamily::Arithmetic => "arithmetic",
            InstructionFamily::Shift => "shift",
            InstructionFamily::Logical => "logical",
            InstructionFamily::Compare => "compare",
            InstructionFamily::Branch => "branch",
            InstructionFamily::Jump => "jump",
            InstructionFamily::Load => "load",
            InstructionFamily::Store => "store",
            InstructionFamily::Stack => "stack",
            InstructionFamily::Conversion => "conversion",
            InstructionFamily::Float => "float",
            InstructionFamily::System => "system",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_values() {
        assert_eq!(Opcode::Nop.to_u8(), 0x00);
        assert_eq!(Opcode::Add.to_u8(), 0x01);
        assert_eq!(Opcode::Shl.to_u8(), 0x10);
        assert_eq!(Opcode::Eq.to_u8(), 0x1A);
        assert_eq!(Opcode::Br.to_u8(), 0x24);
        assert_eq!(Opcode::Call.to_u8(), 0x2B);
        assert_eq!(Opcode::Lw.to_u8(), 0x2D);
        assert_eq!(Opcode::Pushw8.to_u8(), 0x41);
        assert_eq!(Opcode::Ceil.to_u8(), 0x54);
        assert_eq!(Opcode::Putc.to_u8(), 0x81);
        assert_eq!(Opcode::Halt.to_u8(), 0xFF);
    }

    #[test]
    fn test_opcode_from_u8() {
        assert_eq!(Opcode::from_u8(0x01), Some(Opcode::Add));
        assert_eq!(Opcode::from_u8(0x43), Some(Opcode::Divu));
        assert_eq!(Opcode::from_u8(0xFF), Some(Opcode::Halt));
        assert_eq!(Opcode::from_u8(0x7E), None);
        assert_eq!(Opcode::from_u8(0x56), None);
    }

    #[test]
    fn test_all_roundtrips_through_from_u8() {
        for &op in Opcode::ALL {
            assert_eq!(Opcode::from_u8(op.to_u8()), Some(op));
        }
        assert_eq!(Opcode::ALL.len(), 89);
    }

    #[test]
    fn test_opcode_from_instruction() {
        let instruction: u32 = 0x2512_0008;
        assert_eq!(Opcode::from_instruction(instruction), Some(Opcode::Beq));

        let instruction: u32 = 0xFF00_0000;
        assert_eq!(Opcode::from_instruction(instruction), Some(Opcode::Halt));
    }

    #[test]
    fn test_format_selection() {
        assert_eq!(Opcode::Add.format(), Format::R);
        assert_eq!(Opcode::Addi.format(), Format::I(Extension::Signed));
        assert_eq!(Opcode::Addiu.format(), Format::I(Extension::Unsigned));
        assert_eq!(Opcode::Shli.format(), Format::I(Extension::Unsigned));
        assert_eq!(Opcode::Lw.format(), Format::I(Extension::Signed));
        assert_eq!(Opcode::Sf.format(), Format::I(Extension::Signed));
        assert_eq!(Opcode::Lui.format(), Format::I(Extension::Unsigned));
        assert_eq!(Opcode::Beq.format(), Format::I(Extension::Offset));
        assert_eq!(Opcode::J.format(), Format::J);
        assert_eq!(Opcode::Call.format(), Format::R);
        assert_eq!(Opcode::Halt.format(), Format::R);
    }

    #[test]
    fn test_opcode_family() {
        assert_eq!(Opcode::Add.family(), InstructionFamily::Arithmetic);
        assert_eq!(Opcode::Modu.family(), InstructionFamily::Arithmetic);
        assert_eq!(Opcode::Sari.family(), InstructionFamily::Shift);
        assert_eq!(Opcode::Ori.family(), InstructionFamily::Logical);
        assert_eq!(Opcode::Geu.family(), InstructionFamily::Compare);
        assert_eq!(Opcode::Bgt.family(), InstructionFamily::Branch);
        assert_eq!(Opcode::Ret.family(), InstructionFamily::Jump);
        assert_eq!(Opcode::Lui.family(), InstructionFamily::Load);
        assert_eq!(Opcode::Sb.family(), InstructionFamily::Store);
        assert_eq!(Opcode::Pushf.family(), InstructionFamily::Stack);
        assert_eq!(Opcode::Ftoi.family(), InstructionFamily::Conversion);
        assert_eq!(Opcode::Fge.family(), InstructionFamily::Float);
        assert_eq!(Opcode::Putc.family(), InstructionFamily::System);
        assert_eq!(Opcode::Halt.family(), InstructionFamily::System);
    }

    #[test]
    fn test_is_control() {
        assert!(Opcode::Br.is_control());
        assert!(Opcode::Call.is_control());
        assert!(Opcode::Ret.is_control());
        assert!(!Opcode::Halt.is_control());
        assert!(!Opcode::Lw.is_control());
    }

    #[test]
    fn test_display() {
        assert_eq!(Opcode::Addiu.to_string(), "addiu");
        assert_eq!(Opcode::Pushw8.to_string(), "pushw8");
        assert_eq!(InstructionFamily::Stack.to_string(), "stack");
    }

    #[test]
    fn test_try_from() {
        assert_eq!(Opcode::try_from(0x2Bu8), Ok(Opcode::Call));
        assert_eq!(
            Opcode::try_from(0x7Eu8),
            Err(crate::SpecError::InvalidOpcode(0x7E))
        );
    }
}
