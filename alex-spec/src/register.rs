//! Register definitions for the Alex machine

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SpecError;

/// Number of integer registers
pub const NUM_REGISTERS: usize = 16;

/// Number of float registers
pub const NUM_FLOAT_REGISTERS: usize = 16;

/// Register index (r0-r15)
///
/// The same 4-bit index names both an integer register and a float
/// register; which file is meant depends on the instruction.
/// Nothing is hardwired: r0 is an ordinary register.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Register {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
    R8 = 8,
    R9 = 9,
    R10 = 10,
    R11 = 11, // fp - frame pointer
    R12 = 12, // sp - stack pointer (used by call/ret/push/pop)
    R13 = 13, // gp - global pointer
    R14 = 14, // at - assembler temporary
    R15 = 15, // lr - link register
}

impl Register {
    pub const FP: Self = Self::R11;
    pub const SP: Self = Self::R12;
    pub const GP: Self = Self::R13;
    pub const AT: Self = Self::R14;
    pub const LR: Self = Self::R15;

    /// All registers in index order
    pub const ALL: [Register; NUM_REGISTERS] = [
        Self::R0, Self::R1, Self::R2, Self::R3,
        Self::R4, Self::R5, Self::R6, Self::R7,
        Self::R8, Self::R9, Self::R10, Self::R11,
        Self::R12, Self::R13, Self::R14, Self::R15,
    ];

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Build a register from a 4-bit instruction field
    ///
    /// Only the low 4 bits are looked at, so this can never fail.
    #[inline]
    pub const fn from_field(field: u32) -> Self {
        Self::ALL[(field & 0xF) as usize]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::R0 => "r0",
            Self::R1 => "r1",
            Self::R2 => "r2",
            Self::R3 => "r3",
            Self::R4 => "r4",
            Self::R5 => "r5",
            Self::R6 => "r6",
            Self::R7 => "r7",
            Self::R8 => "r8",
            Self::R9 => "r9",
            Self::R10 => "r10",
            Self::R11 => "fp",
            Self::R12 => "sp",
            Self::R13 => "gp",
            Self::R14 => "at",
            Self::R15 => "lr",
        }
    }
}

impl TryFrom<u8> for Register {
    type Error = SpecError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index as usize).ok_or(SpecError::InvalidRegister(index))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(Register::FP.index(), 11);
        assert_eq!(Register::SP.index(), 12);
        assert_eq!(Register::GP.index(), 13);
        assert_eq!(Register::AT.index(), 14);
        assert_eq!(Register::LR.index(), 15);
    }

    #[test]
    fn test_from_index() {
        for i in 0..NUM_REGISTERS {
            assert_eq!(Register::from_index(i).map(Register::index), Some(i));
        }
        assert_eq!(Register::from_index(16), None);
    }

    #[test]
    fn test_try_from_out_of_range() {
        assert_eq!(Register::try_from(16u8), Err(SpecError::InvalidRegister(16)));
        assert_eq!(Register::try_from(12u8), Ok(Register::SP));
    }

    #[test]
    fn test_from_field_masks() {
        assert_eq!(Register::from_field(0x1F), Register::R15);
        assert_eq!(Register::from_field(0x3), Register::R3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Register::R0.to_string(), "r0");
        assert_eq!(Register::SP.to_string(), "sp");
        assert_eq!(Register::LR.to_string(), "lr");
    }
}
