//! Instruction set.
//!
//! Instructions are fixed-width 32-bit words packing an opcode in the top
//! byte, operand 1 in the next byte, and operand 2 in the byte below that.
//! The bottom byte is reserved. Words are decoded on every execute and never
//! mutated.
//!
//! The module also ships a deterministic demo-program generator so drivers
//! and tests can build workloads without an assembler.

use serde::{Deserialize, Serialize};

/// Operand codes addressing the general-purpose registers.
///
/// Only AX and BX are addressable from instructions; any other code is a
/// defined no-op at execution time, not an error.
pub mod operand {
    /// Accumulator.
    pub const AX: u8 = 0x01;
    /// Base register.
    pub const BX: u8 = 0x02;
}

/// Instruction opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Load an immediate into a register.
    Mov = 0x01,
    /// Add an immediate to a register (16-bit wrapping).
    Add = 0x02,
    /// Subtract an immediate from a register (16-bit wrapping).
    Sub = 0x03,
    /// Load the program counter with a target.
    Jmp = 0x04,
}

impl Opcode {
    /// Decodes an opcode byte; unknown encodings yield `None`.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::Mov),
            0x02 => Some(Self::Add),
            0x03 => Some(Self::Sub),
            0x04 => Some(Self::Jmp),
            _ => None,
        }
    }
}

/// A fixed-width encoded instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction(pub u32);

impl Instruction {
    /// Packs an opcode and two operand bytes into a word.
    pub fn new(opcode: Opcode, operand1: u8, operand2: u8) -> Self {
        Self((u32::from(opcode as u8) << 24) | (u32::from(operand1) << 16) | (u32::from(operand2) << 8))
    }

    /// The raw encoded word.
    pub fn word(self) -> u32 {
        self.0
    }

    /// Decodes the opcode byte; `None` for unknown encodings.
    pub fn opcode(self) -> Option<Opcode> {
        Opcode::from_byte((self.0 >> 24) as u8)
    }

    /// First operand byte (destination register code, or jump target).
    pub fn operand1(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Second operand byte (immediate value).
    pub fn operand2(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// `MOV reg, imm`.
    pub fn mov(register: u8, immediate: u8) -> Self {
        Self::new(Opcode::Mov, register, immediate)
    }

    /// `ADD reg, imm`.
    pub fn add(register: u8, immediate: u8) -> Self {
        Self::new(Opcode::Add, register, immediate)
    }

    /// `SUB reg, imm`.
    pub fn sub(register: u8, immediate: u8) -> Self {
        Self::new(Opcode::Sub, register, immediate)
    }

    /// `JMP target`.
    pub fn jmp(target: u8) -> Self {
        Self::new(Opcode::Jmp, target, 0)
    }
}

/// Deterministic demo-program generator.
///
/// Produces a mixed MOV/ADD/SUB/JMP stream sized roughly one instruction per
/// four bytes of process size. Uses an xorshift generator so the same seed
/// always yields the same program.
#[derive(Debug, Clone)]
pub struct ProgramGenerator {
    state: u64,
}

impl ProgramGenerator {
    /// Creates a generator from a seed (zero is remapped; xorshift must not
    /// start at zero).
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generates a program for a process of `size_kb` KiB.
    pub fn generate(&mut self, size_kb: u64) -> Vec<Instruction> {
        let count = (size_kb / 4).max(1) as usize;
        let mut program = Vec::with_capacity(count);
        for _ in 0..count {
            let register = if self.next() % 2 == 0 {
                operand::AX
            } else {
                operand::BX
            };
            let instruction = match self.next() % 4 {
                0 => Instruction::mov(register, (self.next() % 256) as u8),
                1 => Instruction::add(register, (self.next() % 100 + 1) as u8),
                2 => Instruction::sub(register, (self.next() % 50 + 1) as u8),
                _ => Instruction::jmp((self.next() % count.max(1) as u64) as u8),
            };
            program.push(instruction);
        }
        program
    }
}
