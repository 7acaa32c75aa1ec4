//! Register file.
//!
//! Nine named registers backed by 16-bit storage: four general-purpose
//! (AX, BX, CX, DX), the control registers PC, SP, and IR, and the
//! memory-staging pair MAR/MBR. All arithmetic wraps at 16 bits.

use std::collections::BTreeMap;

use serde::Serialize;

/// Named processor registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Register {
    /// Accumulator.
    Ax,
    /// Base.
    Bx,
    /// Counter.
    Cx,
    /// Data.
    Dx,
    /// Program counter.
    Pc,
    /// Stack pointer.
    Sp,
    /// Instruction register (last executed word, truncated to 16 bits).
    Ir,
    /// Memory address register (last issued address, truncated).
    Mar,
    /// Memory buffer register (last transferred word, truncated).
    Mbr,
}

impl Register {
    /// All registers in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Ax,
        Self::Bx,
        Self::Cx,
        Self::Dx,
        Self::Pc,
        Self::Sp,
        Self::Ir,
        Self::Mar,
        Self::Mbr,
    ];
}

/// Fixed register file with 16-bit wrapping semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterFile {
    values: [u16; 9],
}

impl RegisterFile {
    /// Creates a register file with every register zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register.
    pub fn read(&self, register: Register) -> u16 {
        self.values[register as usize]
    }

    /// Writes a register.
    pub fn write(&mut self, register: Register, value: u16) {
        self.values[register as usize] = value;
    }

    /// Adds to a register, wrapping at 16 bits.
    pub fn add(&mut self, register: Register, value: u16) {
        let current = self.read(register);
        self.write(register, current.wrapping_add(value));
    }

    /// Subtracts from a register, wrapping at 16 bits.
    pub fn sub(&mut self, register: Register, value: u16) {
        let current = self.read(register);
        self.write(register, current.wrapping_sub(value));
    }

    /// Copies all registers into an ordered name→value map.
    pub fn snapshot(&self) -> BTreeMap<Register, u16> {
        Register::ALL
            .into_iter()
            .map(|register| (register, self.read(register)))
            .collect()
    }
}
