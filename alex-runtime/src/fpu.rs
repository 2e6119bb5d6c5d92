//! Double-precision float operations
//!
//! Plain IEEE-754 arithmetic. NaN and infinities propagate; nothing traps.

#[inline]
fn flag(b: bool) -> u32 {
    b as u32
}

/// Binary float operation producing a float
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpuOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Truncated remainder (sign of the dividend)
    Mod,
}

impl FpuOp {
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            FpuOp::Add => a + b,
            FpuOp::Sub => a - b,
            FpuOp::Mul => a * b,
            FpuOp::Div => a / b,
            FpuOp::Mod => a % b,
        }
    }
}

/// Float comparison producing 0 or 1
///
/// Every ordered comparison against NaN is false; `Ne` against NaN is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpuCmp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl FpuCmp {
    pub fn apply(self, a: f64, b: f64) -> u32 {
        flag(match self {
            FpuCmp::Eq => a == b,
            FpuCmp::Ne => a != b,
            FpuCmp::Lt => a < b,
            FpuCmp::Gt => a > b,
            FpuCmp::Le => a <= b,
            FpuCmp::Ge => a >= b,
        })
    }
}

/// Single-operand float rounding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Floor,
    Ceil,
}

impl Rounding {
    pub fn apply(self, a: f64) -> f64 {
        match self {
            Rounding::Floor => a.floor(),
            Rounding::Ceil => a.ceil(),
        }
    }
}

#[inline]
pub fn itof(word: u32) -> f64 {
    word as i32 as f64
}

#[inline]
pub fn utof(word: u32) -> f64 {
    word as f64
}

/// Floor toward negative infinity, then saturate into `i32`
///
/// NaN converts to 0.
#[inline]
pub fn ftoi(value: f64) -> u32 {
    value.floor() as i32 as u32
}

/// Floor, then saturate into `u32`; negatives and NaN become 0
#[inline]
pub fn ftou(value: f64) -> u32 {
    value.floor() as u32
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_itof_ftoi_round_trip(x in any::<i32>()) {
            prop_assert_eq!(ftoi(itof(x as u32)) as i32, x);
        }

        #[test]
        fn test_utof_ftou_round_trip(x in any::<u32>()) {
            prop_assert_eq!(ftou(utof(x)), x);
        }

        #[test]
        fn test_comparisons_are_boolean(a in any::<f64>(), b in any::<f64>()) {
            for cmp in [FpuCmp::Eq, FpuCmp::Ne, FpuCmp::Lt, FpuCmp::Gt, FpuCmp::Le, FpuCmp::Ge] {
                let r = cmp.apply(a, b);
                prop_assert!(r == 0 || r == 1);
            }
        }
    }
}
