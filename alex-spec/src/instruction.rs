//! Alex instruction decoding
//!
//! 32-bit instructions with an 8-bit opcode and 4-bit register fields.
//!
//! ## Instruction Formats
//! - R-type: [opcode:8][ra:4][rb:4][rc:4][reserved:12]
//! - I-type: [opcode:8][ra:4][rb:4][imm:16]
//! - J-type: [opcode:8][imm:24]

use crate::encoding::{
    extract_imm, extract_opcode, extract_ra, extract_rb, extract_rc, extract_target,
    offset_extend, sign_extend, zero_extend,
};
use crate::error::{Result, SpecError};
use crate::opcode::Opcode;
use crate::register::Register;
use serde::{Deserialize, Serialize};

/// How a 16-bit I-type immediate is widened to 32 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extension {
    /// Sign replication
    Signed,
    /// Zero fill
    Unsigned,
    /// Branch byte displacement
    Offset,
}

impl Extension {
    /// Apply this extension to a raw immediate field
    #[inline]
    pub const fn apply(self, imm: u32) -> u32 {
        match self {
            Extension::Signed => sign_extend(imm),
            Extension::Unsigned => zero_extend(imm),
            Extension::Offset => offset_extend(imm),
        }
    }
}

/// Instruction layout, selected per opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    R,
    I(Extension),
    J,
}

impl Format {
    /// Split an instruction word into operands according to this format
    pub const fn decode(self, word: u32) -> Operands {
        match self {
            Format::R => Operands::R {
                ra: Register::from_field(extract_ra(word)),
                rb: Register::from_field(extract_rb(word)),
                rc: Register::from_field(extract_rc(word)),
            },
            Format::I(ext) => Operands::I {
                ra: Register::from_field(extract_ra(word)),
                rb: Register::from_field(extract_rb(word)),
                imm: ext.apply(extract_imm(word)),
            },
            Format::J => Operands::J {
                target: extract_target(word),
            },
        }
    }
}

/// Decoded instruction arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operands {
    /// Register-register
    R { ra: Register, rb: Register, rc: Register },

    /// Register plus extended immediate
    I { ra: Register, rb: Register, imm: u32 },

    /// Raw 24-bit absolute jump target (not yet shifted or combined with PC)
    J { target: u32 },
}

impl Operands {
    /// First register operand, if the format has one
    pub fn ra(&self) -> Option<Register> {
        match self {
            Operands::R { ra, .. } | Operands::I { ra, .. } => Some(*ra),
            Operands::J { .. } => None,
        }
    }

    /// Second register operand, if the format has one
    pub fn rb(&self) -> Option<Register> {
        match self {
            Operands::R { rb, .. } | Operands::I { rb, .. } => Some(*rb),
            Operands::J { .. } => None,
        }
    }

    /// Third register operand (R-type only)
    pub fn rc(&self) -> Option<Register> {
        match self {
            Operands::R { rc, .. } => Some(*rc),
            _ => None,
        }
    }

    /// Extended immediate (I-type) or raw target (J-type)
    pub fn imm(&self) -> Option<u32> {
        match self {
            Operands::I { imm, .. } => Some(*imm),
            Operands::J { target } => Some(*target),
            Operands::R { .. } => None,
        }
    }
}

/// Decode a 32-bit instruction word
///
/// The opcode selects both format and extension policy.
pub fn decode(word: u32) -> Result<(Opcode, Operands)> {
    let raw = extract_opcode(word);
    let opcode = Opcode::from_u8(raw).ok_or(SpecError::InvalidOpcode(raw))?;
    Ok((opcode, opcode.format().decode(word)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{encode_itype, encode_jtype, encode_rtype};

    #[test]
    fn test_decode_rtype() {
        let word = encode_rtype(Opcode::Add, 3, 4, 5);
        let (op, operands) = decode(word).unwrap();
        assert_eq!(op, Opcode::Add);
        assert_eq!(
            operands,
            Operands::R {
                ra: Register::R3,
                rb: Register::R4,
                rc: Register::R5
            }
        );
    }

    #[test]
    fn test_decode_itype_signed() {
        let word = encode_itype(Opcode::Addi, 1, 2, 0xFFFE);
        let (_, operands) = decode(word).unwrap();
        assert_eq!(operands.imm(), Some((-2i32) as u32));
    }

    #[test]
    fn test_decode_itype_unsigned() {
        let word = encode_itype(Opcode::Addiu, 1, 2, 0xFFFE);
        let (_, operands) = decode(word).unwrap();
        assert_eq!(operands.imm(), Some(0xFFFE));
    }

    #[test]
    fn test_decode_branch_offset() {
        let word = encode_itype(Opcode::Beq, 1, 2, 0xFFF0);
        let (op, operands) = decode(word).unwrap();
        assert_eq!(op, Opcode::Beq);
        assert_eq!(operands.ra(), Some(Register::R1));
        assert_eq!(operands.rb(), Some(Register::R2));
        assert_eq!(operands.imm().map(|i| i as i32), Some(-16));
    }

    #[test]
    fn test_decode_jtype() {
        let word = encode_jtype(Opcode::J, 0x12_3456);
        let (op, operands) = decode(word).unwrap();
        assert_eq!(op, Opcode::J);
        assert_eq!(operands, Operands::J { target: 0x12_3456 });
        assert_eq!(operands.ra(), None);
    }

    #[test]
    fn test_decode_ignores_reserved_bits() {
        let word = encode_rtype(Opcode::Sub, 1, 2, 3) | 0xFFF;
        let (_, operands) = decode(word).unwrap();
        assert_eq!(operands.rc(), Some(Register::R3));
    }

    #[test]
    fn test_decode_unknown_opcode() {
        assert_eq!(decode(0x7E00_0000), Err(SpecError::InvalidOpcode(0x7E)));
        assert_eq!(decode(0x5600_0000), Err(SpecError::InvalidOpcode(0x56)));
    }

    #[test]
    fn test_format_decode_is_opcode_independent() {
        // The same low 24 bits decode differently only through the format
        let low = 0x0012_8000;
        assert_eq!(
            Format::I(Extension::Signed).decode(low).imm(),
            Some(0xFFFF_8000)
        );
        assert_eq!(
            Format::I(Extension::Unsigned).decode(low).imm(),
            Some(0x8000)
        );
    }
}
