//! Simulated processes.
//!
//! A [`Process`] is the unit of work the engine executes: an identity, a size
//! used for memory allocation, an ordered instruction sequence, and a program
//! counter indexing into it. The external layer constructs processes; the
//! engine mutates their counter and lifecycle state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::isa::Instruction;

/// Process identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProcessId(pub u32);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Process lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Created, memory not yet bound to the CPU.
    New,
    /// Loaded and waiting to run.
    Ready,
    /// Currently executing instructions.
    Running,
    /// Instruction stream exhausted; memory released or about to be.
    Terminated,
}

/// A simulated program: identity, size, state, and instruction stream.
#[derive(Debug, Clone)]
pub struct Process {
    /// Unique identifier.
    pub id: ProcessId,
    /// Display name.
    pub name: String,
    /// Size in KiB, used for memory allocation.
    pub size_kb: u64,
    /// Lifecycle state.
    pub state: ProcessState,
    /// Encoded instruction sequence.
    pub instructions: Vec<Instruction>,
    /// Logical address of the first instruction.
    pub start_address: u64,
    /// Index of the next instruction to execute.
    pub program_counter: usize,
}

impl Process {
    /// Creates a process in the `New` state with its counter at zero.
    pub fn new(
        id: ProcessId,
        name: impl Into<String>,
        size_kb: u64,
        instructions: Vec<Instruction>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            size_kb,
            state: ProcessState::New,
            instructions,
            start_address: 0,
            program_counter: 0,
        }
    }

    /// Returns the next instruction and advances the program counter, or
    /// `None` when the stream is exhausted.
    pub fn next_instruction(&mut self) -> Option<Instruction> {
        let instruction = self.instructions.get(self.program_counter).copied()?;
        self.program_counter += 1;
        Some(instruction)
    }

    /// `true` once every instruction has been consumed.
    pub fn is_finished(&self) -> bool {
        self.program_counter >= self.instructions.len()
    }
}
