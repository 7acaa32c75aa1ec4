//! Simulation session.
//!
//! One [`Simulation`] owns every piece of mutable engine state: the
//! processor, the memory subsystem, and the process table. There are no
//! globals; resetting discards and reconstructs the whole engine, and
//! snapshots taken before a reset stay valid because they are plain values.
//!
//! The session is single-threaded by design. An external driver calls
//! [`Simulation::step`] as fast or as slowly as it likes; pause is simply not
//! calling it.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::Config;
use crate::constants::{LOOKAHEAD_WINDOW, WORD_BYTES};
use crate::cpu::Processor;
use crate::isa::Instruction;
use crate::mem::{AccessKind, AccessOutcome, MemorySubsystem, PageKey};
use crate::process::{Process, ProcessId, ProcessState};

/// Result of one driver-initiated step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No program is loaded.
    Idle,
    /// One instruction was fetched and executed.
    Executed {
        /// Process that ran.
        process: ProcessId,
        /// The executed instruction.
        instruction: Instruction,
        /// What the memory subsystem reported for the fetch.
        memory: AccessOutcome,
    },
    /// The loaded program exhausted its stream; its memory was released.
    Finished {
        /// Process that terminated.
        process: ProcessId,
    },
}

/// The complete simulation state behind one explicit lifecycle.
#[derive(Debug)]
pub struct Simulation {
    config: Config,
    cpu: Processor,
    memory: MemorySubsystem,
    processes: BTreeMap<ProcessId, Process>,
    next_pid: u32,
    current: Option<ProcessId>,
}

impl Simulation {
    /// Builds a fresh session from configuration.
    pub fn new(config: Config) -> Self {
        let cpu = Processor::new(&config.cache);
        let memory = MemorySubsystem::new(&config);
        Self {
            config,
            cpu,
            memory,
            processes: BTreeMap::new(),
            next_pid: 1,
            current: None,
        }
    }

    /// Creates a process and allocates its memory.
    ///
    /// The process starts in the `New` state and does not run until
    /// [`Simulation::load`] binds it to the processor.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        size_kb: u64,
        instructions: Vec<Instruction>,
    ) -> ProcessId {
        let id = ProcessId(self.next_pid);
        self.next_pid += 1;

        let process = Process::new(id, name, size_kb, instructions);
        let _ = self.memory.allocate(id, size_kb);
        debug!(%id, size_kb, "spawned");
        let _ = self.processes.insert(id, process);
        id
    }

    /// Binds a process to the processor.
    ///
    /// # Returns
    ///
    /// `false` when the process does not exist or has terminated.
    pub fn load(&mut self, process: ProcessId) -> bool {
        let Some(entry) = self.processes.get_mut(&process) else {
            return false;
        };
        if entry.state == ProcessState::Terminated {
            return false;
        }
        entry.state = ProcessState::Ready;
        self.cpu.load_program(entry);
        self.current = Some(process);
        true
    }

    /// Retires a process: releases its memory and removes it from the table.
    /// Unknown ids are a no-op.
    pub fn kill(&mut self, process: ProcessId) {
        self.memory.release(process);
        let _ = self.processes.remove(&process);
        if self.current == Some(process) {
            self.current = None;
            self.cpu.halt();
        }
    }

    /// Advances the simulation by exactly one instruction.
    ///
    /// Fetches the current process's next instruction, refreshes the Optimal
    /// lookahead window, issues the fetch address to the memory subsystem
    /// (which may run the fault protocol), walks the CPU cache/MMU path, and
    /// executes. When the stream is exhausted the process terminates and its
    /// memory is released.
    pub fn step(&mut self) -> StepOutcome {
        let Some(pid) = self.current else {
            return StepOutcome::Idle;
        };

        let finished = match self.processes.get(&pid) {
            Some(process) => process.is_finished(),
            None => {
                self.current = None;
                return StepOutcome::Idle;
            }
        };
        if finished {
            if let Some(process) = self.processes.get_mut(&pid) {
                process.state = ProcessState::Terminated;
            }
            self.memory.release(pid);
            self.cpu.halt();
            self.current = None;
            debug!(%pid, "terminated");
            return StepOutcome::Finished { process: pid };
        }

        let lookahead = self.collect_lookahead();
        self.memory.set_lookahead(lookahead);

        let Some(process) = self.processes.get_mut(&pid) else {
            return StepOutcome::Idle;
        };
        process.state = ProcessState::Running;
        let address =
            process.start_address + process.program_counter as u64 * WORD_BYTES;
        let Some(instruction) = process.next_instruction() else {
            return StepOutcome::Idle;
        };

        let memory = self.memory.access(address, pid, AccessKind::Read);
        let _ = self.cpu.issue_access(address, instruction.word(), pid);
        self.cpu.execute(instruction);

        StepOutcome::Executed {
            process: pid,
            instruction,
            memory,
        }
    }

    /// Discards and reconstructs the processor and memory subsystem
    /// wholesale; all processes are dropped.
    pub fn reset(&mut self) {
        self.cpu = Processor::new(&self.config.cache);
        self.memory = MemorySubsystem::new(&self.config);
        self.processes.clear();
        self.next_pid = 1;
        self.current = None;
    }

    /// The processor (read-only).
    pub fn cpu(&self) -> &Processor {
        &self.cpu
    }

    /// The memory subsystem (read-only).
    pub fn memory(&self) -> &MemorySubsystem {
        &self.memory
    }

    /// Looks up a process.
    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.processes.get(&id)
    }

    /// Ids of all live processes, in creation order.
    pub fn process_ids(&self) -> Vec<ProcessId> {
        self.processes.keys().copied().collect()
    }

    /// The id bound to the processor, if any.
    pub fn current(&self) -> Option<ProcessId> {
        self.current
    }

    /// The configuration the session was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Future instruction-fetch page references: the current process's
    /// remaining stream first, then the other live processes in id order,
    /// truncated to the lookahead window.
    fn collect_lookahead(&self) -> Vec<PageKey> {
        let page_bytes = self.memory.paging().page_bytes();
        let mut references = Vec::with_capacity(LOOKAHEAD_WINDOW);

        let mut order: Vec<ProcessId> = Vec::with_capacity(self.processes.len());
        if let Some(current) = self.current {
            order.push(current);
        }
        order.extend(
            self.processes
                .keys()
                .copied()
                .filter(|id| Some(*id) != self.current),
        );

        for id in order {
            let Some(process) = self.processes.get(&id) else {
                continue;
            };
            for index in process.program_counter..process.instructions.len() {
                if references.len() >= LOOKAHEAD_WINDOW {
                    return references;
                }
                let address = process.start_address + index as u64 * WORD_BYTES;
                references.push((id, address / page_bytes));
            }
        }
        references
    }
}
