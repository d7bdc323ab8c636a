//! Conditional jump, move and set instructions.
//!
//! Condition booleans arrive pre-evaluated from the decoder (built from the
//! [`crate::flags::Flags`] predicates). Conditional jumps report whether the
//! branch was taken so an external consumer (branch statistics, block
//! chaining) can observe the outcome.

use crate::exception::Exception;
use crate::mem::CpuBus;
use crate::state::{CpuState, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
    Taken,
    NotTaken,
}

/// Relative jump within the 16-bit code offset space: the offset wraps at
/// 64 KiB regardless of where CS is based.
pub fn jmp_rel16(cpu: &mut CpuState, rel: u16) {
    let cs = cpu.seg_base(Segment::CS);
    let offset = cpu.eip.wrapping_sub(cs).wrapping_add(rel as u32) & 0xFFFF;
    cpu.eip = cs.wrapping_add(offset);
}

pub fn jmpcc8(cpu: &mut CpuState, condition: bool, imm: i8) -> BranchOutcome {
    if condition {
        cpu.eip = cpu.eip.wrapping_add(imm as u32);
        BranchOutcome::Taken
    } else {
        BranchOutcome::NotTaken
    }
}

pub fn jmpcc16(cpu: &mut CpuState, condition: bool, imm: u16) -> BranchOutcome {
    if condition {
        jmp_rel16(cpu, imm);
        BranchOutcome::Taken
    } else {
        BranchOutcome::NotTaken
    }
}

pub fn jmpcc32(cpu: &mut CpuState, condition: bool, imm: i32) -> BranchOutcome {
    if condition {
        cpu.eip = cpu.eip.wrapping_add(imm as u32);
        BranchOutcome::Taken
    } else {
        BranchOutcome::NotTaken
    }
}

pub fn cmovcc16(cpu: &mut CpuState, condition: bool, value: u16, r: usize) {
    if condition {
        cpu.write_reg16(r, value);
    }
}

pub fn cmovcc32(cpu: &mut CpuState, condition: bool, value: u32, r: usize) {
    if condition {
        cpu.write_reg32(r, value);
    }
}

pub fn setcc_reg(cpu: &mut CpuState, condition: bool, r: usize) {
    cpu.write_reg8(r, condition as u8);
}

pub fn setcc_mem<B: CpuBus>(bus: &mut B, condition: bool, addr: u32) -> Result<(), Exception> {
    bus.write_u8(addr, condition as u8)
}
