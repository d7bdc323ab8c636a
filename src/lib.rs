#![forbid(unsafe_code)]

//! Instruction-execution semantics for a 32-bit x86 CPU core.
//!
//! The crate API is intentionally centered around [`state::CpuState`], which
//! holds the architectural state (register file, lazy flags, FPU/SSE state)
//! shared by every operation. Each public function implements the semantics of
//! one instruction once its operands are already decoded:
//! - lazy status-flag evaluation ([`flags`])
//! - stack push/pop under 16/32-bit stack-pointer arithmetic ([`stack`])
//! - conditional jump/move/set ([`branch`])
//! - register exchange ([`xchg`])
//! - SSE2 moves and logical shifts ([`sse`])
//! - FXSAVE/FXRSTOR extended-state serialization ([`fxsave`])
//!
//! Instruction decode, segment-descriptor resolution and address translation
//! live outside this crate; memory is reached through the [`mem::CpuBus`]
//! trait.

mod exception;

pub mod branch;
pub mod flags;
pub mod fpu;
pub mod fxsave;
pub mod mem;
pub mod sse;
pub mod sse_state;
pub mod stack;
pub mod state;
pub mod xchg;

pub use exception::Exception;
pub use mem::CpuBus;
pub use state::CpuState;

/// The architectural size of the FXSAVE/FXRSTOR memory image.
pub const FXSAVE_AREA_SIZE: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FxStateError {
    /// Attempted to load an MXCSR value with reserved bits set.
    ///
    /// On real hardware this would raise a #GP(0).
    MxcsrReservedBits { value: u32, mask: u32 },
}

impl From<FxStateError> for Exception {
    fn from(_value: FxStateError) -> Self {
        // FXRSTOR raises #GP(0) when MXCSR has reserved bits set.
        Exception::gp0()
    }
}
