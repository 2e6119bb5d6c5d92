//! Register file: 16 integer registers, 16 float registers, and the PC

use std::collections::BTreeMap;

use alex_spec::{Register, NUM_FLOAT_REGISTERS, NUM_REGISTERS};
use serde::{Deserialize, Serialize};

use crate::error::Fault;

/// Architectural registers
///
/// Register 0 is an ordinary register; writes to it stick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterFile {
    regs: [u32; NUM_REGISTERS],
    fregs: [f64; NUM_FLOAT_REGISTERS],
    pc: u32,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

fn checked(index: u8) -> Result<Register, Fault> {
    Register::from_index(index as usize).ok_or(Fault::InvalidRegister { index })
}

impl RegisterFile {
    pub fn new() -> Self {
        RegisterFile {
            regs: [0; NUM_REGISTERS],
            fregs: [0.0; NUM_FLOAT_REGISTERS],
            pc: 0,
        }
    }

    /// Zero every register and the PC
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn read(&self, reg: Register) -> u32 {
        self.regs[reg.index()]
    }

    #[inline]
    pub fn write(&mut self, reg: Register, value: u32) {
        self.regs[reg.index()] = value;
    }

    #[inline]
    pub fn read_float(&self, reg: Register) -> f64 {
        self.fregs[reg.index()]
    }

    #[inline]
    pub fn write_float(&mut self, reg: Register, value: f64) {
        self.fregs[reg.index()] = value;
    }

    #[inline]
    pub fn pc(&self) -> u32 {
        self.pc
    }

    #[inline]
    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    /// Read an integer register by raw index
    pub fn get(&self, index: u8) -> Result<u32, Fault> {
        Ok(self.read(checked(index)?))
    }

    /// Write an integer register by raw index
    pub fn set(&mut self, index: u8, value: u32) -> Result<(), Fault> {
        let reg = checked(index)?;
        self.write(reg, value);
        Ok(())
    }

    pub fn get_float(&self, index: u8) -> Result<f64, Fault> {
        Ok(self.read_float(checked(index)?))
    }

    pub fn set_float(&mut self, index: u8, value: f64) -> Result<(), Fault> {
        let reg = checked(index)?;
        self.write_float(reg, value);
        Ok(())
    }

    /// Read the listed integer registers as signed values
    pub fn get_many(&self, indices: &[u8]) -> Result<BTreeMap<u8, i32>, Fault> {
        indices
            .iter()
            .map(|&i| self.get(i).map(|v| (i, v as i32)))
            .collect()
    }

    /// Read the listed integer registers as unsigned values
    pub fn get_many_unsigned(&self, indices: &[u8]) -> Result<BTreeMap<u8, u32>, Fault> {
        indices
            .iter()
            .map(|&i| self.get(i).map(|v| (i, v)))
            .collect()
    }

    pub fn get_many_float(&self, indices: &[u8]) -> Result<BTreeMap<u8, f64>, Fault> {
        indices
            .iter()
            .map(|&i| self.get_float(i).map(|v| (i, v)))
            .collect()
    }

    /// Write signed values into integer registers
    ///
    /// Every index is validated before any register changes.
    pub fn set_many<I>(&mut self, values: I) -> Result<(), Fault>
    where
        I: IntoIterator<Item = (u8, i32)>,
    {
        self.set_many_unsigned(values.into_iter().map(|(i, v)| (i, v as u32)))
    }

    /// Write unsigned values into integer registers
    ///
    /// Every index is validated before any register changes.
    pub fn set_many_unsigned<I>(&mut self, values: I) -> Result<(), Fault>
    where
        I: IntoIterator<Item = (u8, u32)>,
    {
        let writes = values
            .into_iter()
            .map(|(i, v)| checked(i).map(|reg| (reg, v)))
            .collect::<Result<Vec<_>, _>>()?;
        for (reg, value) in writes {
            self.write(reg, value);
        }
        Ok(())
    }

    /// Write float registers; validated like [`set_many`](Self::set_many)
    pub fn set_many_float<I>(&mut self, values: I) -> Result<(), Fault>
    where
        I: IntoIterator<Item = (u8, f64)>,
    {
        let writes = values
            .into_iter()
            .map(|(i, v)| checked(i).map(|reg| (reg, v)))
            .collect::<Result<Vec<_>, _>>()?;
        for (reg, value) in writes {
            self.write_float(reg, value);
        }
        Ok(())
    }

    pub fn integers(&self) -> &[u32; NUM_REGISTERS] {
        &self.regs
    }

    pub fn floats(&self) -> &[f64; NUM_FLOAT_REGISTERS] {
        &self.fregs
    }
}
