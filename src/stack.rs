//! Stack push/pop under 16/32-bit stack-pointer arithmetic.
//!
//! In 16-bit stack mode the pointer-plus-offset sum wraps at 16 bits before
//! the SS base is applied, so a push at SP=0 lands at SS:0xFFFE. In 32-bit
//! mode the full ESP value is used. The high half of ESP is untouched by
//! 16-bit adjustments.

use crate::exception::Exception;
use crate::mem::CpuBus;
use crate::state::{CpuState, Segment, EAX, EBP, EBX, ECX, EDI, EDX, ESI, ESP};

/// Linear address of the stack slot at `offset` from the current pointer.
pub fn stack_linear(cpu: &CpuState, offset: i32) -> u32 {
    let ss = cpu.seg_base(Segment::SS);
    if cpu.stack_size_32 {
        ss.wrapping_add(cpu.read_reg32(ESP))
            .wrapping_add(offset as u32)
    } else {
        ss.wrapping_add((cpu.read_reg16(ESP) as u32).wrapping_add(offset as u32) & 0xFFFF)
    }
}

/// Adjust the stack pointer register in place, honoring the stack-size mode.
pub fn adjust_stack_reg(cpu: &mut CpuState, adjustment: i32) {
    if cpu.stack_size_32 {
        let esp = cpu.read_reg32(ESP);
        cpu.write_reg32(ESP, esp.wrapping_add(adjustment as u32));
    } else {
        let sp = cpu.read_reg16(ESP);
        cpu.write_reg16(ESP, sp.wrapping_add(adjustment as u16));
    }
}

/// Pre-decrement push: the pointer is committed only after the write
/// succeeds, so a fault leaves the stack pointer unchanged.
pub fn push16<B: CpuBus>(cpu: &mut CpuState, bus: &mut B, value: u16) -> Result<(), Exception> {
    let sp = stack_linear(cpu, -2);
    bus.write_u16(sp, value)?;
    adjust_stack_reg(cpu, -2);
    Ok(())
}

pub fn push32<B: CpuBus>(cpu: &mut CpuState, bus: &mut B, value: u32) -> Result<(), Exception> {
    let sp = stack_linear(cpu, -4);
    bus.write_u32(sp, value)?;
    adjust_stack_reg(cpu, -4);
    Ok(())
}

/// Post-increment pop.
pub fn pop16<B: CpuBus>(cpu: &mut CpuState, bus: &mut B) -> Result<u16, Exception> {
    let sp = stack_linear(cpu, 0);
    let value = bus.read_u16(sp)?;
    adjust_stack_reg(cpu, 2);
    Ok(value)
}

pub fn pop32<B: CpuBus>(cpu: &mut CpuState, bus: &mut B) -> Result<u32, Exception> {
    let sp = stack_linear(cpu, 0);
    let value = bus.read_u32(sp)?;
    adjust_stack_reg(cpu, 4);
    Ok(value)
}

/// PUSHA: pushes AX, CX, DX, BX, the original SP, BP, SI, DI.
///
/// The whole 16-byte block is validated up front so we don't fault after
/// having pushed several registers already.
pub fn pusha16<B: CpuBus>(cpu: &mut CpuState, bus: &mut B) -> Result<(), Exception> {
    let temp = cpu.read_reg16(ESP);

    bus.check_writable(stack_linear(cpu, -16), 16)?;

    for r in [EAX, ECX, EDX, EBX] {
        let value = cpu.read_reg16(r);
        push16(cpu, bus, value)?;
    }
    push16(cpu, bus, temp)?;
    for r in [EBP, ESI, EDI] {
        let value = cpu.read_reg16(r);
        push16(cpu, bus, value)?;
    }
    Ok(())
}

pub fn pusha32<B: CpuBus>(cpu: &mut CpuState, bus: &mut B) -> Result<(), Exception> {
    let temp = cpu.read_reg32(ESP);

    bus.check_writable(stack_linear(cpu, -32), 32)?;

    for r in [EAX, ECX, EDX, EBX] {
        let value = cpu.read_reg32(r);
        push32(cpu, bus, value)?;
    }
    push32(cpu, bus, temp)?;
    for r in [EBP, ESI, EDI] {
        let value = cpu.read_reg32(r);
        push32(cpu, bus, value)?;
    }
    Ok(())
}
