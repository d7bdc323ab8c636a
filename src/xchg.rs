//! Register-exchange instructions.
//!
//! The `xchgN` forms return the register's prior value; when the other
//! operand is in memory the caller writes the returned value back to its own
//! operand location. The `xchgNr` accumulator forms swap in place and are
//! self-inverse.

use crate::state::{CpuState, EAX};

pub fn xchg8(cpu: &mut CpuState, data: u8, r: usize) -> u8 {
    let tmp = cpu.read_reg8(r);
    cpu.write_reg8(r, data);
    tmp
}

pub fn xchg16(cpu: &mut CpuState, data: u16, r: usize) -> u16 {
    let tmp = cpu.read_reg16(r);
    cpu.write_reg16(r, data);
    tmp
}

pub fn xchg32(cpu: &mut CpuState, data: u32, r: usize) -> u32 {
    let tmp = cpu.read_reg32(r);
    cpu.write_reg32(r, data);
    tmp
}

/// XCHG AX, r16.
pub fn xchg16r(cpu: &mut CpuState, r: usize) {
    let tmp = cpu.read_reg16(EAX);
    let other = cpu.read_reg16(r);
    cpu.write_reg16(EAX, other);
    cpu.write_reg16(r, tmp);
}

/// XCHG EAX, r32.
pub fn xchg32r(cpu: &mut CpuState, r: usize) {
    let tmp = cpu.read_reg32(EAX);
    let other = cpu.read_reg32(r);
    cpu.write_reg32(EAX, other);
    cpu.write_reg32(r, tmp);
}
