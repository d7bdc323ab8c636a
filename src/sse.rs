//! SSE2 packed move and logical-shift instructions.
//!
//! Every operation checks SIMD availability first (CR0.EM/TS, CR4.OSFXSR)
//! and faults before touching any state.

use crate::exception::Exception;
use crate::mem::CpuBus;
use crate::state::CpuState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmmReg {
    Xmm0,
    Xmm1,
    Xmm2,
    Xmm3,
    Xmm4,
    Xmm5,
    Xmm6,
    Xmm7,
}

impl XmmReg {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        use XmmReg::*;
        Some(match i {
            0 => Xmm0,
            1 => Xmm1,
            2 => Xmm2,
            3 => Xmm3,
            4 => Xmm4,
            5 => Xmm5,
            6 => Xmm6,
            7 => Xmm7,
            _ => return None,
        })
    }
}

fn u128_to_u32x4(v: u128) -> [u32; 4] {
    let bytes = v.to_le_bytes();
    let mut out = [0u32; 4];
    for (i, chunk) in bytes.chunks_exact(4).enumerate() {
        out[i] = u32::from_le_bytes(chunk.try_into().unwrap());
    }
    out
}

fn u32x4_to_u128(v: [u32; 4]) -> u128 {
    let mut bytes = [0u8; 16];
    for (i, lane) in v.iter().copied().enumerate() {
        bytes[i * 4..i * 4 + 4].copy_from_slice(&lane.to_le_bytes());
    }
    u128::from_le_bytes(bytes)
}

fn u128_to_u64x2(v: u128) -> [u64; 2] {
    [v as u64, (v >> 64) as u64]
}

fn u64x2_to_u128(v: [u64; 2]) -> u128 {
    (v[0] as u128) | ((v[1] as u128) << 64)
}

/// MOVQ/MOVLPS-style store: low 64 bits of an XMM register to memory.
pub fn mov_r_m64<B: CpuBus>(
    cpu: &mut CpuState,
    bus: &mut B,
    addr: u32,
    r: XmmReg,
) -> Result<(), Exception> {
    cpu.ensure_simd_available()?;
    let lanes = u128_to_u64x2(cpu.sse.xmm[r.index()]);
    bus.write_u64(addr, lanes[0])
}

/// Full 128-bit register-to-register copy.
pub fn mov_r_r128(cpu: &mut CpuState, dst: XmmReg, src: XmmReg) -> Result<(), Exception> {
    cpu.ensure_simd_available()?;
    cpu.sse.xmm[dst.index()] = cpu.sse.xmm[src.index()];
    Ok(())
}

/// Write a 128-bit value (register- or memory-sourced by the caller) into an
/// XMM register.
pub fn mov_rm_r128(cpu: &mut CpuState, source: u128, r: XmmReg) -> Result<(), Exception> {
    cpu.ensure_simd_available()?;
    cpu.sse.xmm[r.index()] = source;
    Ok(())
}

/// Full 128-bit store to memory.
pub fn mov_r_m128<B: CpuBus>(
    cpu: &mut CpuState,
    bus: &mut B,
    addr: u32,
    r: XmmReg,
) -> Result<(), Exception> {
    cpu.ensure_simd_available()?;
    bus.write_u128(addr, cpu.sse.xmm[r.index()])
}

/// MOVHPS-style load: 64 bits from memory into the high half of an XMM
/// register, preserving the low half.
pub fn mov_m64_r128<B: CpuBus>(
    cpu: &mut CpuState,
    bus: &mut B,
    addr: u32,
    r: XmmReg,
) -> Result<(), Exception> {
    cpu.ensure_simd_available()?;
    let data = bus.read_u64(addr)?;
    let lanes = u128_to_u64x2(cpu.sse.xmm[r.index()]);
    cpu.sse.xmm[r.index()] = u64x2_to_u128([lanes[0], data]);
    Ok(())
}

/// MOVHPS-style store: the high 64 bits of an XMM register to memory.
pub fn mov_r128_m64<B: CpuBus>(
    cpu: &mut CpuState,
    bus: &mut B,
    addr: u32,
    r: XmmReg,
) -> Result<(), Exception> {
    cpu.ensure_simd_available()?;
    let lanes = u128_to_u64x2(cpu.sse.xmm[r.index()]);
    bus.write_u64(addr, lanes[1])
}

/// PSRLQ xmm, imm: logical right shift of each 64-bit lane, computed over
/// 32-bit words as the hardware formula does.
pub fn psrlq_r128(cpu: &mut CpuState, r: XmmReg, shift: u32) -> Result<(), Exception> {
    cpu.ensure_simd_available()?;

    if shift == 0 {
        return Ok(());
    }

    let d = u128_to_u32x4(cpu.sse.xmm[r.index()]);
    let mut result = [0u32; 4];

    if shift <= 31 {
        result[0] = d[0] >> shift | d[1] << (32 - shift);
        result[1] = d[1] >> shift;

        result[2] = d[2] >> shift | d[3] << (32 - shift);
        result[3] = d[3] >> shift;
    } else if shift <= 63 {
        result[0] = d[1] >> (shift - 32);
        result[2] = d[3] >> (shift - 32);
    }

    cpu.sse.xmm[r.index()] = u32x4_to_u128(result);
    Ok(())
}
