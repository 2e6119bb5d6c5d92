//! Fixed-width integer arithmetic
//!
//! Every operation takes and returns 32-bit words. Signed operations
//! reinterpret the bits as two's complement; all results wrap modulo 2^32.
//! Relational operations return exactly 0 or 1.

use crate::error::Fault;

pub type AluResult = Result<u32, Fault>;

#[inline]
fn flag(b: bool) -> u32 {
    b as u32
}

#[inline]
pub fn add32(a: u32, b: u32) -> u32 {
    a.wrapping_add(b)
}

#[inline]
pub fn sub32(a: u32, b: u32) -> u32 {
    a.wrapping_sub(b)
}

/// Low 32 bits of the product (identical for signed and unsigned operands)
#[inline]
pub fn mul32(a: u32, b: u32) -> u32 {
    a.wrapping_mul(b)
}

/// Signed division, truncating toward zero; `i32::MIN / -1` wraps to `i32::MIN`
pub fn div32(a: u32, b: u32) -> AluResult {
    if b == 0 {
        return Err(Fault::DivisionByZero);
    }
    Ok((a as i32).wrapping_div(b as i32) as u32)
}

pub fn divu32(a: u32, b: u32) -> AluResult {
    if b == 0 {
        return Err(Fault::DivisionByZero);
    }
    Ok(a / b)
}

/// Signed remainder; the result takes the sign of the dividend
pub fn mod32(a: u32, b: u32) -> AluResult {
    if b == 0 {
        return Err(Fault::DivisionByZero);
    }
    Ok((a as i32).wrapping_rem(b as i32) as u32)
}

pub fn modu32(a: u32, b: u32) -> AluResult {
    if b == 0 {
        return Err(Fault::DivisionByZero);
    }
    Ok(a % b)
}

// Shift amounts use the low 5 bits only.

#[inline]
pub fn shl32(a: u32, b: u32) -> u32 {
    a.wrapping_shl(b)
}

#[inline]
pub fn shr32(a: u32, b: u32) -> u32 {
    a.wrapping_shr(b)
}

#[inline]
pub fn sar32(a: u32, b: u32) -> u32 {
    (a as i32).wrapping_shr(b) as u32
}

#[inline]
pub fn and32(a: u32, b: u32) -> u32 {
    a & b
}

#[inline]
pub fn or32(a: u32, b: u32) -> u32 {
    a | b
}

#[inline]
pub fn xor32(a: u32, b: u32) -> u32 {
    a ^ b
}

/// Bitwise complement of `a`; the second operand is ignored
#[inline]
pub fn not32(a: u32, _b: u32) -> u32 {
    !a
}

#[inline]
pub fn eq32(a: u32, b: u32) -> u32 {
    flag(a == b)
}

#[inline]
pub fn ne32(a: u32, b: u32) -> u32 {
    flag(a != b)
}

#[inline]
pub fn lt32(a: u32, b: u32) -> u32 {
    flag((a as i32) < (b as i32))
}

#[inline]
pub fn ltu32(a: u32, b: u32) -> u32 {
    flag(a < b)
}

#[inline]
pub fn gt32(a: u32, b: u32) -> u32 {
    flag((a as i32) > (b as i32))
}

#[inline]
pub fn gtu32(a: u32, b: u32) -> u32 {
    flag(a > b)
}

#[inline]
pub fn le32(a: u32, b: u32) -> u32 {
    flag((a as i32) <= (b as i32))
}

#[inline]
pub fn leu32(a: u32, b: u32) -> u32 {
    flag(a <= b)
}

#[inline]
pub fn ge32(a: u32, b: u32) -> u32 {
    flag((a as i32) >= (b as i32))
}

#[inline]
pub fn geu32(a: u32, b: u32) -> u32 {
    flag(a >= b)
}

/// Two-operand integer operation selectable from the dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
    Divu,
    Mod,
    Modu,
    Shl,
    Shr,
    Sar,
    And,
    Or,
    Xor,
    Not,
    Eq,
    Ne,
    Lt,
    Ltu,
    Gt,
    Gtu,
    Le,
    Leu,
    Ge,
    Geu,
}

impl AluOp {
    /// Apply the operation; only division and remainder can fail
    pub fn apply(self, a: u32, b: u32) -> AluResult {
        let value = match self {
            AluOp::Add => add32(a, b),
            AluOp::Sub => sub32(a, b),
            AluOp::Mul => mul32(a, b),
            AluOp::Div => return div32(a, b),
            AluOp::Divu => return divu32(a, b),
            AluOp::Mod => return mod32(a, b),
            AluOp::Modu => return modu32(a, b),
            AluOp::Shl => shl32(a, b),
            AluOp::Shr => shr32(a, b),
            AluOp::Sar => sar32(a, b),
            AluOp::And => and32(a, b),
            AluOp::Or => or32(a, b),
            AluOp::Xor => xor32(a, b),
            AluOp::Not => not32(a, b),
            AluOp::Eq => eq32(a, b),
            AluOp::Ne => ne32(a, b),
            AluOp::Lt => lt32(a, b),
            AluOp::Ltu => ltu32(a, b),
            AluOp::Gt => gt32(a, b),
            AluOp::Gtu => gtu32(a, b),
            AluOp::Le => le32(a, b),
            AluOp::Leu => leu32(a, b),
            AluOp::Ge => ge32(a, b),
            AluOp::Geu => geu32(a, b),
        };
        Ok(value)
    }
}

/// Branch condition on two registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Always,
    Eq,
    Ne,
    Lt,
    Gt,
}

impl Cond {
    pub fn test(self, a: u32, b: u32) -> bool {
        let taken = match self {
            Cond::Always => 1,
            Cond::Eq => eq32(a, b),
            Cond::Ne => ne32(a, b),
            Cond::Lt => lt32(a, b),
            Cond::Gt => gt32(a, b),
        };
        taken == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapping_add_sub() {
        assert_eq!(add32(u32::MAX, 1), 0);
        assert_eq!(sub32(0, 1), u32::MAX);
        assert_eq!(add32(i32::MAX as u32, 1), i32::MIN as u32);
    }

    #[test]
    fn test_mul_low_bits() {
        assert_eq!(mul32(0x1_0000, 0x1_0000), 0);
        assert_eq!(mul32(-3i32 as u32, 7) as i32, -21);
        assert_eq!(mul32(0xFFFF_FFFF, 0xFFFF_FFFF), 1);
    }

    #[test]
    fn test_signed_division() {
        assert_eq!(div32(7, 2).unwrap(), 3);
        assert_eq!(div32(-7i32 as u32, 2).unwrap() as i32, -3);
        assert_eq!(div32(i32::MIN as u32, -1i32 as u32).unwrap(), i32::MIN as u32);
    }

    #[test]
    fn test_unsigned_division() {
        assert_eq!(divu32(0xFFFF_FFFE, 2).unwrap(), 0x7FFF_FFFF);
        assert_eq!(modu32(0xFFFF_FFFF, 10).unwrap(), 5);
    }

    #[test]
    fn test_signed_remainder_sign() {
        assert_eq!(mod32(-7i32 as u32, 3).unwrap() as i32, -1);
        assert_eq!(mod32(7, -3i32 as u32).unwrap() as i32, 1);
        assert_eq!(mod32(i32::MIN as u32, -1i32 as u32).unwrap(), 0);
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(div32(1, 0), Err(Fault::DivisionByZero)));
        assert!(matches!(divu32(1, 0), Err(Fault::DivisionByZero)));
        assert!(matches!(mod32(1, 0), Err(Fault::DivisionByZero)));
        assert!(matches!(modu32(1, 0), Err(Fault::DivisionByZero)));
    }

    #[test]
    fn test_shifts() {
        assert_eq!(shl32(1, 31), 0x8000_0000);
        assert_eq!(shl32(1, 32), 1);
        assert_eq!(shr32(0x8000_0000, 31), 1);
        assert_eq!(sar32(0x8000_0000, 31), 0xFFFF_FFFF);
        assert_eq!(sar32(0x4000_0000, 30), 1);
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(and32(0xF0F0, 0xFF00), 0xF000);
        assert_eq!(or32(0xF0F0, 0x0F0F), 0xFFFF);
        assert_eq!(xor32(0xFFFF, 0x0F0F), 0xF0F0);
        assert_eq!(not32(0, 12345), 0xFFFF_FFFF);
    }

    #[test]
    fn test_relational_signedness() {
        let minus_one = -1i32 as u32;
        assert_eq!(lt32(minus_one, 0), 1);
        assert_eq!(ltu32(minus_one, 0), 0);
        assert_eq!(gt32(minus_one, 0), 0);
        assert_eq!(gtu32(minus_one, 0), 1);
        assert_eq!(le32(5, 5), 1);
        assert_eq!(leu32(6, 5), 0);
        assert_eq!(ge32(minus_one, minus_one), 1);
        assert_eq!(geu32(0, minus_one), 0);
        assert_eq!(eq32(3, 3), 1);
        assert_eq!(ne32(3, 3), 0);
    }

    #[test]
    fn test_alu_op_apply() {
        assert_eq!(AluOp::Add.apply(2, 3).unwrap(), 5);
        assert_eq!(AluOp::Not.apply(0xFFFF_0000, 0).unwrap(), 0x0000_FFFF);
        assert!(AluOp::Modu.apply(9, 0).is_err());
    }

    #[test]
    fn test_branch_conditions() {
        assert!(Cond::Always.test(1, 2));
        assert!(Cond::Eq.test(5, 5));
        assert!(!Cond::Eq.test(5, 6));
        assert!(Cond::Ne.test(5, 6));
        assert!(Cond::Lt.test(-1i32 as u32, 0));
        assert!(!Cond::Gt.test(-1i32 as u32, 0));
    }
}
