//! x87 register-file state as seen by the extended-state codec.
//!
//! Arithmetic on the ST stack lives outside this crate; what matters here is
//! the exact state FXSAVE/FXRSTOR serializes. ST values are kept as raw
//! 80-bit extended-precision bit patterns in `u128` slots, addressed relative
//! to the top-of-stack index.

/// TOP field of the FPU status word.
pub const FSW_TOP_SHIFT: u32 = 11;
pub const FSW_TOP_MASK: u16 = 0b111 << FSW_TOP_SHIFT;

/// All meaningful bits of an 80-bit extended-precision value.
pub const ST80_MASK: u128 = (1 << 80) - 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FpuState {
    pub control_word: u16,
    /// Status word without the TOP field; TOP lives in `stack_ptr`.
    pub status_word: u16,
    /// Top-of-stack index, 0-7.
    pub stack_ptr: u8,
    /// One bit per physical ST slot, set while the slot is empty. The FXSAVE
    /// tag byte is the bitwise inverse of this bitmap.
    pub stack_empty: u8,
    pub opcode: u16,
    pub ip: u32,
    pub ip_selector: u16,
    pub dp: u32,
    pub dp_selector: u16,
    /// Physical ST slots; logical ST(i) is `st[(stack_ptr + i) & 7]`.
    pub st: [u128; 8],
}

impl Default for FpuState {
    fn default() -> Self {
        Self {
            control_word: 0x37F,
            status_word: 0,
            stack_ptr: 0,
            stack_empty: 0xFF,
            opcode: 0,
            ip: 0,
            ip_selector: 0,
            dp: 0,
            dp_selector: 0,
            st: [0; 8],
        }
    }
}

impl FpuState {
    /// Physical slot backing logical ST(i).
    pub fn physical_slot(&self, i: usize) -> usize {
        (self.stack_ptr as usize + i) & 7
    }

    /// Compose the architectural status word from its stored components.
    pub fn load_status_word(&self) -> u16 {
        (self.status_word & !FSW_TOP_MASK) | ((self.stack_ptr as u16) << FSW_TOP_SHIFT)
    }

    /// Split an architectural status word back into components.
    pub fn set_status_word(&mut self, value: u16) {
        self.status_word = value & !FSW_TOP_MASK;
        self.stack_ptr = ((value >> FSW_TOP_SHIFT) & 7) as u8;
    }
}
