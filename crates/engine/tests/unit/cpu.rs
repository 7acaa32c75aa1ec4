//! Processor Tests.
//!
//! Verifies decode/dispatch for MOV/ADD/SUB/JMP, the no-op behavior of
//! unaddressable operands, 16-bit wrapping, PC bookkeeping, and the cache/MMU
//! access path.

use memsim_core::config::CacheConfig;
use memsim_core::cpu::{Processor, Register};
use memsim_core::isa::{operand, Instruction};
use memsim_core::process::{Process, ProcessId};
use memsim_core::stats::CpuState;
use pretty_assertions::assert_eq;

fn processor() -> Processor {
    Processor::new(&CacheConfig::default())
}

#[test]
fn mov_add_sub_sequence() {
    let mut cpu = processor();

    cpu.execute(Instruction::mov(operand::AX, 100));
    assert_eq!(cpu.registers.read(Register::Ax), 100);

    cpu.execute(Instruction::add(operand::AX, 50));
    assert_eq!(cpu.registers.read(Register::Ax), 150);

    cpu.execute(Instruction::sub(operand::AX, 30));
    assert_eq!(cpu.registers.read(Register::Ax), 120);
}

#[test]
fn bx_is_addressable() {
    let mut cpu = processor();

    cpu.execute(Instruction::mov(operand::BX, 9));
    cpu.execute(Instruction::add(operand::BX, 1));

    assert_eq!(cpu.registers.read(Register::Bx), 10);
    assert_eq!(cpu.registers.read(Register::Ax), 0);
}

/// Operand codes outside AX/BX are defined no-ops, not errors.
#[test]
fn unknown_operand_is_noop() {
    let mut cpu = processor();

    cpu.execute(Instruction::mov(0x07, 42));

    assert_eq!(cpu.registers.read(Register::Ax), 0);
    assert_eq!(cpu.registers.read(Register::Bx), 0);
    assert_eq!(cpu.cycles(), 1);
    assert_eq!(cpu.registers.read(Register::Pc), 1);
}

/// An unknown opcode still costs a cycle and advances PC.
#[test]
fn unknown_opcode_is_noop() {
    let mut cpu = processor();

    cpu.execute(Instruction(0xFF00_0000));

    assert_eq!(cpu.cycles(), 1);
    assert_eq!(cpu.registers.read(Register::Pc), 1);
}

#[test]
fn subtraction_wraps_at_sixteen_bits() {
    let mut cpu = processor();

    cpu.execute(Instruction::sub(operand::AX, 1));

    assert_eq!(cpu.registers.read(Register::Ax), u16::MAX);
}

#[test]
fn addition_wraps_at_sixteen_bits() {
    let mut cpu = processor();

    cpu.registers.write(Register::Ax, u16::MAX);
    cpu.execute(Instruction::add(operand::AX, 1));

    assert_eq!(cpu.registers.read(Register::Ax), 0);
}

/// JMP loads PC with its target exactly; the trailing increment of the other
/// opcodes is suppressed.
#[test]
fn jmp_sets_pc_without_off_by_one() {
    let mut cpu = processor();

    cpu.execute(Instruction::jmp(7));

    assert_eq!(cpu.registers.read(Register::Pc), 7);
}

#[test]
fn pc_advances_once_per_plain_instruction() {
    let mut cpu = processor();

    cpu.execute(Instruction::mov(operand::AX, 1));
    cpu.execute(Instruction::add(operand::AX, 1));

    assert_eq!(cpu.registers.read(Register::Pc), 2);
}

#[test]
fn ir_stages_the_truncated_word() {
    let mut cpu = processor();
    let instruction = Instruction::mov(operand::AX, 100);

    cpu.execute(instruction);

    assert_eq!(
        cpu.registers.read(Register::Ir),
        instruction.word() as u16
    );
}

#[test]
fn load_program_binds_and_readies() {
    let mut cpu = processor();
    let process = Process::new(ProcessId(1), "demo", 8, vec![Instruction::mov(1, 1)]);

    cpu.load_program(&process);

    let snapshot = cpu.snapshot();
    assert_eq!(snapshot.state, CpuState::Ready);
    assert_eq!(snapshot.program.as_deref(), Some("demo"));
    assert_eq!(cpu.registers.read(Register::Pc), 0);
}

#[test]
fn execute_marks_running_and_counts_cycles() {
    let mut cpu = processor();

    cpu.execute(Instruction::mov(operand::AX, 1));
    cpu.execute(Instruction::mov(operand::AX, 2));

    let snapshot = cpu.snapshot();
    assert_eq!(snapshot.state, CpuState::Running);
    assert_eq!(snapshot.cycles, 2);
    assert_eq!(snapshot.registers[&Register::Ax], 2);
}

/// Snapshots are copies; taking one has no side effects.
#[test]
fn snapshot_is_read_only() {
    let mut cpu = processor();
    cpu.execute(Instruction::mov(operand::AX, 5));

    let first = cpu.snapshot();
    let second = cpu.snapshot();

    assert_eq!(first, second);
}

/// First access misses both caches and translates; the repeat hits L1.
#[test]
fn issue_access_fills_cache_hierarchy() {
    let mut cpu = processor();
    let pid = ProcessId(1);

    let physical = cpu.issue_access(0x40, 0xABCD, pid);
    assert_eq!(physical, 0x40); // page 0 maps to frame 0
    assert_eq!(cpu.mmu.translations(), 1);

    let _ = cpu.issue_access(0x40, 0xABCD, pid);
    assert_eq!(cpu.mmu.translations(), 1); // L1 hit, no translation
    assert_eq!(cpu.l1.stats().hits, 1);
}

/// MAR/MBR stage the address and word of the last access.
#[test]
fn mar_mbr_stage_last_access() {
    let mut cpu = processor();

    let _ = cpu.issue_access(0x1234, 0xBEEF, ProcessId(1));

    assert_eq!(cpu.registers.read(Register::Mar), 0x1234);
    assert_eq!(cpu.registers.read(Register::Mbr), 0xBEEF);
}
