use crate::exception::Exception;
use crate::flags::Flags;
use crate::fpu::FpuState;
use crate::sse_state::SseState;

pub const CR0_EM: u32 = 1 << 2;
pub const CR0_TS: u32 = 1 << 3;
pub const CR4_OSFXSR: u32 = 1 << 9;

/// 32-bit general-purpose register indices (also the 16-bit view: AX shares
/// index 0 with EAX, and so on).
pub const EAX: usize = 0;
pub const ECX: usize = 1;
pub const EDX: usize = 2;
pub const EBX: usize = 3;
pub const ESP: usize = 4;
pub const EBP: usize = 5;
pub const ESI: usize = 6;
pub const EDI: usize = 7;

/// 8-bit register indices, in ModRM byte-register numbering: 0-3 are the low
/// bytes of EAX..EBX, 4-7 are the high bytes (AH, CH, DH, BH).
pub const AL: usize = 0;
pub const CL: usize = 1;
pub const DL: usize = 2;
pub const BL: usize = 3;
pub const AH: usize = 4;
pub const CH: usize = 5;
pub const DH: usize = 6;
pub const BH: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    ES = 0,
    CS = 1,
    SS = 2,
    DS = 3,
    FS = 4,
    GS = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlRegs {
    pub cr0: u32,
    pub cr4: u32,
}

/// Architectural state of one CPU instance.
///
/// Every operation in this crate takes `&mut CpuState` explicitly; there is
/// no process-wide state, so multiple independent instances can coexist.
#[derive(Debug, Clone)]
pub struct CpuState {
    gpr: [u32; 8],
    seg_base: [u32; 6],
    /// Linear instruction pointer (CS base already applied).
    pub eip: u32,
    /// Whether stack-pointer arithmetic uses the full 32-bit ESP or the low
    /// 16 bits of SP (with 16-bit wraparound).
    pub stack_size_32: bool,
    pub control: ControlRegs,
    pub flags: Flags,
    pub fpu: FpuState,
    pub sse: SseState,
}

impl Default for CpuState {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuState {
    pub fn new() -> Self {
        Self {
            gpr: [0; 8],
            seg_base: [0; 6],
            eip: 0,
            stack_size_32: false,
            control: ControlRegs::default(),
            flags: Flags::default(),
            fpu: FpuState::default(),
            sse: SseState::default(),
        }
    }

    pub fn seg_base(&self, seg: Segment) -> u32 {
        self.seg_base[seg as usize]
    }

    pub fn set_seg_base(&mut self, seg: Segment, base: u32) {
        self.seg_base[seg as usize] = base;
    }

    /// The register file is one canonical set of 32-bit slots; the 8- and
    /// 16-bit views are extracted/inserted with shift and mask rather than
    /// aliased storage.
    pub fn read_reg32(&self, r: usize) -> u32 {
        self.gpr[r]
    }

    pub fn write_reg32(&mut self, r: usize, val: u32) {
        self.gpr[r] = val;
    }

    pub fn read_reg16(&self, r: usize) -> u16 {
        self.gpr[r] as u16
    }

    pub fn write_reg16(&mut self, r: usize, val: u16) {
        self.gpr[r] = (self.gpr[r] & !0xFFFF) | val as u32;
    }

    pub fn read_reg8(&self, r: usize) -> u8 {
        let full = self.gpr[r & 3];
        if r < 4 {
            full as u8
        } else {
            (full >> 8) as u8
        }
    }

    pub fn write_reg8(&mut self, r: usize, val: u8) {
        let slot = &mut self.gpr[r & 3];
        if r < 4 {
            *slot = (*slot & !0xFF) | val as u32;
        } else {
            *slot = (*slot & !0xFF00) | ((val as u32) << 8);
        }
    }

    /// Gate for SSE/MMX state access.
    ///
    /// #UD takes priority over #NM: if the ISA is disabled entirely, we do
    /// not report it as a lazy-FPU trap.
    pub fn ensure_simd_available(&self) -> Result<(), Exception> {
        let cr0 = self.control.cr0;
        if (cr0 & CR0_EM) != 0 {
            return Err(Exception::InvalidOpcode);
        }
        if (self.control.cr4 & CR4_OSFXSR) == 0 {
            return Err(Exception::InvalidOpcode);
        }
        if (cr0 & CR0_TS) != 0 {
            return Err(Exception::DeviceNotAvailable);
        }
        Ok(())
    }
}
