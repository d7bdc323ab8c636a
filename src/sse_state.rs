/// Bits of MXCSR this implementation supports; anything outside is reserved
/// and rejected on load. Advertised at offset 28 of the FXSAVE image.
pub const MXCSR_MASK: u32 = 0xFFFF;

/// Architectural MXCSR reset value (all exceptions masked).
pub const MXCSR_DEFAULT: u32 = 0x1F80;

use crate::FxStateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SseState {
    pub xmm: [u128; 8],
    pub mxcsr: u32,
}

impl Default for SseState {
    fn default() -> Self {
        Self {
            xmm: [0; 8],
            mxcsr: MXCSR_DEFAULT,
        }
    }
}

impl SseState {
    /// Load MXCSR, rejecting reserved bits before any state changes.
    pub fn set_mxcsr(&mut self, value: u32) -> Result<(), FxStateError> {
        if value & !MXCSR_MASK != 0 {
            return Err(FxStateError::MxcsrReservedBits {
                value,
                mask: MXCSR_MASK,
            });
        }
        self.mxcsr = value;
        Ok(())
    }
}
