//! CPU core.
//!
//! The [`Processor`] owns the register file, the L1/L2 cache pair, and the
//! MMU. It decodes and executes one instruction per call under external
//! drive; it never fetches on its own and never blocks.

/// Fixed-capacity FIFO cache used for both L1 and L2.
pub mod cache;

/// CPU-side address translation unit.
pub mod mmu;

/// Named registers and the 16-bit register file.
pub mod registers;

pub use cache::Cache;
pub use mmu::Mmu;
pub use registers::{Register, RegisterFile};

use tracing::trace;

use crate::config::CacheConfig;
use crate::isa::{operand, Instruction, Opcode};
use crate::process::{Process, ProcessId};
use crate::stats::{CpuSnapshot, CpuState};

/// The simulated microprocessor.
#[derive(Debug)]
pub struct Processor {
    /// Register file; public so drivers and tests can inspect values directly.
    pub registers: RegisterFile,
    state: CpuState,
    cycles: u64,
    current_program: Option<String>,
    /// First-level cache.
    pub l1: Cache,
    /// Second-level cache.
    pub l2: Cache,
    /// CPU-side translation unit.
    pub mmu: Mmu,
}

impl Processor {
    /// Creates a halted processor with zeroed registers and empty caches.
    pub fn new(cache: &CacheConfig) -> Self {
        Self {
            registers: RegisterFile::new(),
            state: CpuState::Halted,
            cycles: 0,
            current_program: None,
            l1: Cache::new(cache.l1_kb),
            l2: Cache::new(cache.l2_kb),
            mmu: Mmu::new(),
        }
    }

    /// Binds a process as the current program: PC takes its start address and
    /// the processor becomes `Ready`.
    pub fn load_program(&mut self, process: &Process) {
        self.current_program = Some(process.name.clone());
        self.registers
            .write(Register::Pc, process.start_address as u16);
        self.state = CpuState::Ready;
    }

    /// Executes one decoded instruction.
    ///
    /// Stores the word in IR, counts a cycle, and dispatches on the opcode.
    /// Operand codes other than AX/BX are no-ops by definition. JMP loads PC
    /// with its target and suppresses the usual increment; every other opcode
    /// (including an unknown one) advances PC by one.
    pub fn execute(&mut self, instruction: Instruction) {
        self.registers
            .write(Register::Ir, instruction.word() as u16);
        self.cycles += 1;
        self.state = CpuState::Running;

        let operand1 = instruction.operand1();
        let operand2 = instruction.operand2();

        match instruction.opcode() {
            Some(Opcode::Mov) => {
                if let Some(register) = Self::general_purpose(operand1) {
                    self.registers.write(register, u16::from(operand2));
                }
            }
            Some(Opcode::Add) => {
                if let Some(register) = Self::general_purpose(operand1) {
                    self.registers.add(register, u16::from(operand2));
                }
            }
            Some(Opcode::Sub) => {
                if let Some(register) = Self::general_purpose(operand1) {
                    self.registers.sub(register, u16::from(operand2));
                }
            }
            Some(Opcode::Jmp) => {
                trace!(target = operand1, "jmp");
                self.registers.write(Register::Pc, u16::from(operand1));
                return;
            }
            None => trace!(word = instruction.word(), "unknown opcode ignored"),
        }

        self.registers.add(Register::Pc, 1);
    }

    /// Issues a word-sized access through the cache hierarchy.
    ///
    /// Probes L1, then L2; a hit at either level fills the levels above. A
    /// double miss translates through the MMU and installs the word in both
    /// levels. MAR/MBR stage the address and word either way.
    ///
    /// # Returns
    ///
    /// The physical address on a double miss, or the (already translated,
    /// cached) logical address on a hit.
    pub fn issue_access(&mut self, address: u64, word: u32, process: ProcessId) -> u64 {
        self.registers.write(Register::Mar, address as u16);
        self.registers.write(Register::Mbr, word as u16);

        if self.l1.read(address).is_some() {
            return address;
        }
        if self.l2.read(address).is_some() {
            self.l1.write(address, word);
            return address;
        }

        let physical = self.mmu.translate(address, process);
        self.l2.write(address, word);
        self.l1.write(address, word);
        physical
    }

    /// Halts the processor, keeping registers and statistics intact.
    pub fn halt(&mut self) {
        self.state = CpuState::Halted;
    }

    /// Instructions executed so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Current execution state.
    pub fn state(&self) -> CpuState {
        self.state
    }

    /// Read-only snapshot for the presentation layer. No side effects.
    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            registers: self.registers.snapshot(),
            state: self.state,
            cycles: self.cycles,
            program: self.current_program.clone(),
        }
    }

    fn general_purpose(code: u8) -> Option<Register> {
        match code {
            operand::AX => Some(Register::Ax),
            operand::BX => Some(Register::Bx),
            _ => None,
        }
    }
}
