//! End-to-End Session Tests.
//!
//! Drives full simulations through the public `Simulation` API: spawn, load,
//! step to termination, reset, and the snapshot surface the presentation
//! layer polls.

use memsim_core::config::Config;
use memsim_core::cpu::Register;
use memsim_core::isa::{operand, Instruction, ProgramGenerator};
use memsim_core::process::ProcessState;
use memsim_core::sim::{Simulation, StepOutcome};
use memsim_core::stats::{CpuState, MemoryState};
use pretty_assertions::assert_eq;

fn arithmetic_program() -> Vec<Instruction> {
    vec![
        Instruction::mov(operand::AX, 100),
        Instruction::add(operand::AX, 50),
        Instruction::sub(operand::AX, 30),
    ]
}

/// A 10 KiB process on 4 KiB pages takes 3 pages and 12 KiB of memory.
#[test]
fn spawn_allocates_rounded_pages() {
    let mut simulation = Simulation::new(Config::default());

    let pid = simulation.spawn("worker", 10, arithmetic_program());

    assert_eq!(simulation.memory().statistics().used_kb, 12);
    let MemoryState::Paging { resident_pages, .. } = simulation.memory().memory_state() else {
        panic!("expected paging shape");
    };
    assert_eq!(resident_pages, 3);
    assert_eq!(simulation.process(pid).unwrap().state, ProcessState::New);
}

#[test]
fn spawn_assigns_increasing_ids() {
    let mut simulation = Simulation::new(Config::default());

    let first = simulation.spawn("a", 4, Vec::new());
    let second = simulation.spawn("b", 4, Vec::new());

    assert!(first < second);
}

#[test]
fn step_without_a_program_is_idle() {
    let mut simulation = Simulation::new(Config::default());

    assert_eq!(simulation.step(), StepOutcome::Idle);
}

#[test]
fn arithmetic_program_runs_to_completion() {
    let mut simulation = Simulation::new(Config::default());
    let pid = simulation.spawn("calc", 10, arithmetic_program());
    assert!(simulation.load(pid));

    for _ in 0..3 {
        assert!(matches!(
            simulation.step(),
            StepOutcome::Executed { memory: _, .. }
        ));
    }
    assert_eq!(simulation.cpu().registers.read(Register::Ax), 120);

    // The fourth step retires the process and releases its memory.
    assert_eq!(simulation.step(), StepOutcome::Finished { process: pid });
    assert_eq!(simulation.process(pid).unwrap().state, ProcessState::Terminated);
    assert_eq!(simulation.memory().statistics().used_kb, 0);
    assert_eq!(simulation.cpu().state(), CpuState::Halted);
    assert_eq!(simulation.current(), None);
}

#[test]
fn every_step_touches_the_memory_subsystem() {
    let mut simulation = Simulation::new(Config::default());
    let pid = simulation.spawn("calc", 10, arithmetic_program());
    assert!(simulation.load(pid));

    let _ = simulation.step();
    let _ = simulation.step();

    assert_eq!(simulation.memory().statistics().accesses, 2);
}

/// Fetch addresses fall in the process's first page, so no faults occur for
/// a small resident program.
#[test]
fn resident_fetches_do_not_fault() {
    let mut simulation = Simulation::new(Config::default());
    let pid = simulation.spawn("calc", 10, arithmetic_program());
    assert!(simulation.load(pid));

    while !matches!(simulation.step(), StepOutcome::Finished { .. }) {}

    assert_eq!(simulation.memory().statistics().faults, 0);
}

#[test]
fn load_rejects_unknown_and_terminated_processes() {
    let mut simulation = Simulation::new(Config::default());
    let pid = simulation.spawn("calc", 4, vec![Instruction::mov(operand::AX, 1)]);
    assert!(simulation.load(pid));

    let _ = simulation.step();
    let _ = simulation.step(); // terminates

    assert!(!simulation.load(pid));
    assert!(!simulation.load(memsim_core::process::ProcessId(99)));
}

#[test]
fn kill_releases_memory_and_halts_if_current() {
    let mut simulation = Simulation::new(Config::default());
    let pid = simulation.spawn("calc", 10, arithmetic_program());
    assert!(simulation.load(pid));

    simulation.kill(pid);

    assert_eq!(simulation.memory().statistics().used_kb, 0);
    assert_eq!(simulation.current(), None);
    assert!(simulation.process(pid).is_none());
    assert_eq!(simulation.cpu().state(), CpuState::Halted);
}

#[test]
fn reset_reconstructs_everything() {
    let mut simulation = Simulation::new(Config::default());
    let pid = simulation.spawn("calc", 10, arithmetic_program());
    assert!(simulation.load(pid));
    let _ = simulation.step();

    simulation.reset();

    assert_eq!(simulation.cpu().cycles(), 0);
    assert_eq!(simulation.memory().statistics().accesses, 0);
    assert_eq!(simulation.memory().statistics().used_kb, 0);
    assert!(simulation.process_ids().is_empty());
    // Ids restart as well: the session is indistinguishable from a fresh one.
    assert_eq!(simulation.spawn("again", 4, Vec::new()), pid);
}

/// Two generated programs run back to back, sharing the engine.
#[test]
fn batch_of_generated_programs_runs() {
    let mut simulation = Simulation::new(Config::default());
    let mut generator = ProgramGenerator::new(7);

    let first = simulation.spawn("demo-0", 16, generator.generate(16));
    let second = simulation.spawn("demo-1", 16, generator.generate(16));

    assert!(simulation.load(first));
    while !matches!(simulation.step(), StepOutcome::Finished { .. }) {}

    assert!(simulation.load(second));
    while !matches!(simulation.step(), StepOutcome::Finished { .. }) {}

    assert!(simulation.cpu().cycles() >= 8);
    assert_eq!(simulation.memory().statistics().used_kb, 0);
}

/// Identical seeds produce identical programs.
#[test]
fn program_generation_is_deterministic() {
    let mut first = ProgramGenerator::new(42);
    let mut second = ProgramGenerator::new(42);

    assert_eq!(first.generate(16), second.generate(16));
}
