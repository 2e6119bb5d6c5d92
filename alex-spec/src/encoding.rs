//! # Instruction Encoding Constants and Helpers
//!
//! Field layout, extraction, immediate extension, and encoding of Alex
//! instruction words.
//!
//! ## Instruction Format (32-bit)
//!
//! ```text
//! R-type: [opcode:8][ra:4][rb:4][rc:4][reserved:12]
//! I-type: [opcode:8][ra:4][rb:4][imm:16]
//! J-type: [opcode:8][imm:24]
//! ```
//!
//! The opcode always sits in bits 24-31.

use crate::error::{Result, SpecError};
use crate::{Opcode, JUMP_SEGMENT_MASK};

// ============================================================================
// Bit Position Constants
// ============================================================================

/// Opcode field: bits 24-31 (8 bits)
pub const OPCODE_SHIFT: u32 = 24;

/// First register field: bits 20-23 (4 bits)
pub const RA_SHIFT: u32 = 20;

/// Second register field: bits 16-19 (4 bits)
pub const RB_SHIFT: u32 = 16;

/// Third register field (R-type): bits 12-15 (4 bits)
pub const RC_SHIFT: u32 = 12;

/// Immediate for I-type: bits 0-15 (16 bits)
pub const IMM_SHIFT: u32 = 0;

/// Target for J-type: bits 0-23 (24 bits)
pub const TARGET_SHIFT: u32 = 0;

// ============================================================================
// Field Masks
// ============================================================================

/// Opcode mask (8 bits)
pub const OPCODE_MASK: u32 = 0xFF;

/// Register field mask (4 bits)
pub const REGISTER_MASK: u32 = 0xF;

/// Immediate field mask for I-type (16 bits)
pub const IMM_MASK: u32 = 0xFFFF;

/// Target field mask for J-type (24 bits)
pub const TARGET_MASK: u32 = 0xFF_FFFF;

// ============================================================================
// Field Extraction Functions
// ============================================================================

/// Extract opcode from instruction (bits 24-31)
#[inline]
pub const fn extract_opcode(inst: u32) -> u8 {
    ((inst >> OPCODE_SHIFT) & OPCODE_MASK) as u8
}

/// Extract first register field (bits 20-23)
#[inline]
pub const fn extract_ra(inst: u32) -> u32 {
    (inst >> RA_SHIFT) & REGISTER_MASK
}

/// Extract second register field (bits 16-19)
#[inline]
pub const fn extract_rb(inst: u32) -> u32 {
    (inst >> RB_SHIFT) & REGISTER_MASK
}

/// Extract third register field (bits 12-15)
#[inline]
pub const fn extract_rc(inst: u32) -> u32 {
    (inst >> RC_SHIFT) & REGISTER_MASK
}

/// Extract raw 16-bit immediate (bits 0-15)
#[inline]
pub const fn extract_imm(inst: u32) -> u32 {
    (inst >> IMM_SHIFT) & IMM_MASK
}

/// Extract raw 24-bit jump target (bits 0-23)
#[inline]
pub const fn extract_target(inst: u32) -> u32 {
    (inst >> TARGET_SHIFT) & TARGET_MASK
}

// ============================================================================
// Immediate Extension
// ============================================================================

/// Sign-extend a 16-bit immediate to 32 bits
#[inline]
pub const fn sign_extend(imm: u32) -> u32 {
    (imm & IMM_MASK) as u16 as i16 as i32 as u32
}

/// Zero-extend a 16-bit immediate to 32 bits
#[inline]
pub const fn zero_extend(imm: u32) -> u32 {
    imm & IMM_MASK
}

/// Extend a 16-bit branch offset to a 32-bit byte displacement
///
/// The offset is sign-extended and used as-is: it counts bytes, not
/// instructions, so `PC + offset_extend(8)` lands two words ahead.
#[inline]
pub const fn offset_extend(imm: u32) -> u32 {
    sign_extend(imm)
}

/// Compute the absolute target of a J-type jump from the current PC
#[inline]
pub const fn jump_target(pc: u32, target: u32) -> u32 {
    (pc & JUMP_SEGMENT_MASK) | ((target & TARGET_MASK) << 2)
}

// ============================================================================
// Instruction Encoding Functions
// ============================================================================

/// Encode R-type instruction
#[inline]
pub const fn encode_rtype(opcode: Opcode, ra: u32, rb: u32, rc: u32) -> u32 {
    ((opcode.to_u8() as u32) << OPCODE_SHIFT)
        | ((ra & REGISTER_MASK) << RA_SHIFT)
        | ((rb & REGISTER_MASK) << RB_SHIFT)
        | ((rc & REGISTER_MASK) << RC_SHIFT)
}

/// Encode I-type instruction
///
/// Only the low 16 bits of `imm` are kept; pass negative values as
/// `(value as i16) as u16 as u32` or use [`encode_itype_checked`].
#[inline]
pub const fn encode_itype(opcode: Opcode, ra: u32, rb: u32, imm: u32) -> u32 {
    ((opcode.to_u8() as u32) << OPCODE_SHIFT)
        | ((ra & REGISTER_MASK) << RA_SHIFT)
        | ((rb & REGISTER_MASK) << RB_SHIFT)
        | ((imm & IMM_MASK) << IMM_SHIFT)
}

/// Encode I-type instruction with a signed immediate, rejecting values
/// outside the 16-bit signed range
pub fn encode_itype_checked(opcode: Opcode, ra: u32, rb: u32, imm: i32) -> Result<u32> {
    if imm < i16::MIN as i32 || imm > i16::MAX as i32 {
        return Err(SpecError::InvalidImmediate {
            value: imm as u32,
            bits: 16,
        });
    }
    Ok(encode_itype(opcode, ra, rb, imm as u32))
}

/// Encode J-type instruction
#[inline]
pub const fn encode_jtype(opcode: Opcode, target: u32) -> u32 {
    ((opcode.to_u8() as u32) << OPCODE_SHIFT) | ((target & TARGET_MASK) << TARGET_SHIFT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_opcode() {
        let inst = 0x2D12_0004u32;
        assert_eq!(extract_opcode(inst), 0x2D);
    }

    #[test]
    fn test_extract_registers() {
        // opcode=0x01, ra=5, rb=10, rc=15
        let inst = (0x01 << 24) | (5 << 20) | (10 << 16) | (15 << 12);
        assert_eq!(extract_ra(inst), 5);
        assert_eq!(extract_rb(inst), 10);
        assert_eq!(extract_rc(inst), 15);
    }

    #[test]
    fn test_extract_imm_and_target() {
        let inst = 0x0212_ABCDu32;
        assert_eq!(extract_imm(inst), 0xABCD);
        let inst = 0x29AB_CDEFu32;
        assert_eq!(extract_target(inst), 0xAB_CDEF);
    }

    #[test]
    fn test_sign_extend() {
        assert_eq!(sign_extend(0x0064), 100);
        assert_eq!(sign_extend(0xFFFF), 0xFFFF_FFFF);
        assert_eq!(sign_extend(0x8000), 0xFFFF_8000);
        assert_eq!(sign_extend(0x7FFF), 0x0000_7FFF);
    }

    #[test]
    fn test_zero_extend() {
        assert_eq!(zero_extend(0xFFFF), 0x0000_FFFF);
        assert_eq!(zero_extend(0x8000), 0x0000_8000);
        assert_eq!(zero_extend(0x1_2345), 0x2345);
    }

    #[test]
    fn test_offset_extend_is_byte_displacement() {
        assert_eq!(offset_extend(8), 8);
        assert_eq!(offset_extend(0xFFFC) as i32, -4);
        assert_eq!(100u32.wrapping_add(offset_extend(8)), 108);
        assert_eq!(100u32.wrapping_add(offset_extend(0xFFF8)), 92);
    }

    #[test]
    fn test_jump_target() {
        // Target stays inside the current 64 MB segment
        assert_eq!(jump_target(0x0000_0100, 0x40), 0x100);
        assert_eq!(jump_target(0x0400_0010, 0x10), 0x0400_0040);
        assert_eq!(jump_target(0xFC00_0000, TARGET_MASK), 0xFFFF_FFFC);
        // Always word-aligned
        assert_eq!(jump_target(0x1234_5677, 0x12_3457) & 3, 0);
    }

    #[test]
    fn test_encode_rtype() {
        let inst = encode_rtype(Opcode::Add, 1, 2, 3);
        assert_eq!(inst, 0x0112_3000);
        assert_eq!(extract_opcode(inst), Opcode::Add.to_u8());
        assert_eq!(extract_ra(inst), 1);
        assert_eq!(extract_rb(inst), 2);
        assert_eq!(extract_rc(inst), 3);
    }

    #[test]
    fn test_encode_itype() {
        let inst = encode_itype(Opcode::Addi, 1, 2, 100);
        assert_eq!(extract_opcode(inst), Opcode::Addi.to_u8());
        assert_eq!(extract_ra(inst), 1);
        assert_eq!(extract_rb(inst), 2);
        assert_eq!(extract_imm(inst), 100);
    }

    #[test]
    fn test_encode_itype_checked() {
        let inst = encode_itype_checked(Opcode::Addi, 1, 0, -50).unwrap();
        assert_eq!(sign_extend(extract_imm(inst)) as i32, -50);

        assert!(encode_itype_checked(Opcode::Addi, 1, 0, 40_000).is_err());
        assert!(encode_itype_checked(Opcode::Addi, 1, 0, -40_000).is_err());
    }

    #[test]
    fn test_encode_jtype() {
        let inst = encode_jtype(Opcode::J, 0x1000);
        assert_eq!(extract_opcode(inst), Opcode::J.to_u8());
        assert_eq!(extract_target(inst), 0x1000);
    }
}
