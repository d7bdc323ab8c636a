//! FXSAVE/FXRSTOR: the 512-byte extended FPU+SSE state image.
//!
//! Byte layout (offsets are architectural and byte-for-byte compatible with
//! real hardware):
//!
//! | offset  | size | field                                          |
//! |---------|------|------------------------------------------------|
//! | 0       | 2    | FPU control word                               |
//! | 2       | 2    | FPU status word (TOP composed in)              |
//! | 4       | 1    | tag byte (inverse of the stack-empty bitmap)   |
//! | 6       | 2    | last opcode                                    |
//! | 8       | 4    | last instruction pointer                       |
//! | 12      | 2    | last instruction pointer selector              |
//! | 16      | 4    | last data pointer                              |
//! | 20      | 2    | last data pointer selector                     |
//! | 24      | 4    | MXCSR                                          |
//! | 28      | 4    | MXCSR capability mask                          |
//! | 32-159  | 16*8 | ST0-ST7, stack-relative, 80 bits per 16-byte slot |
//! | 160-415 | 16*8 | XMM0-XMM7                                      |
//!
//! Both directions validate the whole 512-byte range before mutating
//! anything, so a paging fault never leaves a partial image or partial
//! register state.

use tracing::debug;

use crate::exception::Exception;
use crate::fpu::ST80_MASK;
use crate::mem::CpuBus;
use crate::sse_state::MXCSR_MASK;
use crate::state::CpuState;
use crate::FXSAVE_AREA_SIZE;

const ST_OFFSET: usize = 32;
const XMM_OFFSET: usize = 160;

pub fn fxsave<B: CpuBus>(cpu: &mut CpuState, bus: &mut B, addr: u32) -> Result<(), Exception> {
    bus.check_writable(addr, FXSAVE_AREA_SIZE as u32)?;

    let image = encode(cpu);
    for (i, chunk) in image.chunks_exact(16).enumerate() {
        let chunk: [u8; 16] = chunk.try_into().unwrap();
        bus.write_u128(addr.wrapping_add((i * 16) as u32), u128::from_le_bytes(chunk))?;
    }
    Ok(())
}

pub fn fxrstor<B: CpuBus>(cpu: &mut CpuState, bus: &mut B, addr: u32) -> Result<(), Exception> {
    bus.check_readable(addr, FXSAVE_AREA_SIZE as u32)?;

    let mut image = [0u8; FXSAVE_AREA_SIZE];
    for i in 0..FXSAVE_AREA_SIZE / 16 {
        let start = i * 16;
        let v = bus.read_u128(addr.wrapping_add(start as u32))?;
        image[start..start + 16].copy_from_slice(&v.to_le_bytes());
    }

    let new_mxcsr = read_u32(&image, 24);
    if new_mxcsr & !MXCSR_MASK != 0 {
        debug!(mxcsr = new_mxcsr, "fxrstor: reserved MXCSR bits set, #GP");
        return Err(Exception::gp0());
    }

    apply(cpu, &image, new_mxcsr);
    Ok(())
}

fn encode(cpu: &CpuState) -> [u8; FXSAVE_AREA_SIZE] {
    let mut image = [0u8; FXSAVE_AREA_SIZE];
    let fpu = &cpu.fpu;

    image[0..2].copy_from_slice(&fpu.control_word.to_le_bytes());
    image[2..4].copy_from_slice(&fpu.load_status_word().to_le_bytes());
    image[4] = !fpu.stack_empty;
    image[6..8].copy_from_slice(&fpu.opcode.to_le_bytes());
    image[8..12].copy_from_slice(&fpu.ip.to_le_bytes());
    image[12..14].copy_from_slice(&fpu.ip_selector.to_le_bytes());
    image[16..20].copy_from_slice(&fpu.dp.to_le_bytes());
    image[20..22].copy_from_slice(&fpu.dp_selector.to_le_bytes());

    image[24..28].copy_from_slice(&cpu.sse.mxcsr.to_le_bytes());
    image[28..32].copy_from_slice(&MXCSR_MASK.to_le_bytes());

    for i in 0..8 {
        let start = ST_OFFSET + i * 16;
        let value = (fpu.st[fpu.physical_slot(i)] & ST80_MASK).to_le_bytes();
        image[start..start + 10].copy_from_slice(&value[..10]);
    }

    for i in 0..8 {
        let start = XMM_OFFSET + i * 16;
        image[start..start + 16].copy_from_slice(&cpu.sse.xmm[i].to_le_bytes());
    }

    image
}

fn apply(cpu: &mut CpuState, image: &[u8; FXSAVE_AREA_SIZE], mxcsr: u32) {
    let fpu = &mut cpu.fpu;

    fpu.control_word = read_u16(image, 0);
    fpu.set_status_word(read_u16(image, 2));
    fpu.stack_empty = !image[4];
    fpu.opcode = read_u16(image, 6);
    fpu.ip = read_u32(image, 8);
    fpu.ip_selector = read_u16(image, 12);
    fpu.dp = read_u32(image, 16);
    fpu.dp_selector = read_u16(image, 20);

    for i in 0..8 {
        let start = ST_OFFSET + i * 16;
        let slot = fpu.physical_slot(i);
        // Bytes 10-15 of each slot are non-architectural and ignored.
        fpu.st[slot] = read_u128(image, start) & ST80_MASK;
    }

    cpu.sse.mxcsr = mxcsr;

    for i in 0..8 {
        cpu.sse.xmm[i] = read_u128(image, XMM_OFFSET + i * 16);
    }
}

fn read_u16(image: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(image[offset..offset + 2].try_into().unwrap())
}

fn read_u32(image: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(image[offset..offset + 4].try_into().unwrap())
}

fn read_u128(image: &[u8], offset: usize) -> u128 {
    u128::from_le_bytes(image[offset..offset + 16].try_into().unwrap())
}
