use thiserror::Error;

/// A fault raised while executing an instruction.
///
/// Faults are non-local control transfers on real hardware; here they are the
/// `Err` arm of every fallible operation and abort the in-progress
/// instruction. Delivery to the guest (IDT lookup, stack frame construction)
/// is the enclosing emulator's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Exception {
    #[error("#GP({0}) general protection fault")]
    GeneralProtection(u16),
    #[error("#PF page fault at {addr:#010x} (write={write})")]
    PageFault { addr: u32, write: bool },
    #[error("#UD invalid opcode")]
    InvalidOpcode,
    #[error("#NM device not available")]
    DeviceNotAvailable,
}

impl Exception {
    #[inline]
    pub const fn gp0() -> Self {
        Exception::GeneralProtection(0)
    }
}
