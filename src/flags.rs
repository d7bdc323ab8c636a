//! Lazy status-flag evaluation.
//!
//! Flag-affecting instructions do not compute CF/PF/AF/ZF/SF/OF eagerly; they
//! record the last operation (operands, result, full-precision add result,
//! operand size) and mark the six flags dirty. Each getter recomputes its flag
//! from that snapshot only while its dirty bit is set; once the dirty bit is
//! clear, the stored `flags` bit is authoritative and the snapshot is ignored.

pub const FLAG_CF: u32 = 1 << 0;
pub const FLAG_PF: u32 = 1 << 2;
pub const FLAG_AF: u32 = 1 << 4;
pub const FLAG_ZF: u32 = 1 << 6;
pub const FLAG_SF: u32 = 1 << 7;
pub const FLAG_OF: u32 = 1 << 11;

pub const FLAGS_ARITH: u32 = FLAG_CF | FLAG_PF | FLAG_AF | FLAG_ZF | FLAG_SF | FLAG_OF;

/// `last_op_size` values: the sign-bit index of the operand width. All the
/// formulas below locate the carry/sign/overflow bit by shifting right by
/// this amount.
pub const OPSIZE_8: u32 = 7;
pub const OPSIZE_16: u32 = 15;
pub const OPSIZE_32: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    /// Stored flag bits, authoritative for flags whose dirty bit is clear.
    pub flags: u32,
    /// Dirty bitmask: one bit per flag, set while the flag must be
    /// recomputed from the snapshot below.
    pub flags_changed: u32,
    pub last_op1: u32,
    pub last_op2: u32,
    pub last_result: u32,
    pub last_add_result: u32,
    pub last_op_size: u32,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            // Bit 1 of EFLAGS is always set.
            flags: 0x2,
            flags_changed: 0,
            last_op1: 0,
            last_op2: 0,
            last_result: 0,
            last_add_result: 0,
            last_op_size: OPSIZE_32,
        }
    }
}

impl Flags {
    /// Record an arithmetic operation and mark all six status flags dirty.
    ///
    /// `add_result` is the full-precision sum the operation reduces to (for a
    /// subtraction `a - b` the convention is `op1 = result`, `op2 = b`,
    /// `add_result = a`, so the same carry/overflow formulas apply).
    pub fn set_lazy_arith(
        &mut self,
        op1: u32,
        op2: u32,
        result: u32,
        add_result: u32,
        op_size: u32,
    ) {
        self.last_op1 = op1;
        self.last_op2 = op2;
        self.last_result = result;
        self.last_add_result = add_result;
        self.last_op_size = op_size;
        self.flags_changed = FLAGS_ARITH;
    }

    /// Store a flag bit directly; the stored value becomes authoritative.
    pub fn set_flag(&mut self, mask: u32, val: bool) {
        if val {
            self.flags |= mask;
        } else {
            self.flags &= !mask;
        }
        self.flags_changed &= !mask;
    }

    pub fn cf(&self) -> bool {
        if self.flags_changed & FLAG_CF != 0 {
            let (op1, op2, add) = (self.last_op1, self.last_op2, self.last_add_result);
            (op1 ^ ((op1 ^ op2) & (op2 ^ add))) >> self.last_op_size & 1 != 0
        } else {
            self.flags & FLAG_CF != 0
        }
    }

    pub fn pf(&self) -> bool {
        if self.flags_changed & FLAG_PF != 0 {
            // Inverted parity lookup table over the folded low byte.
            let r = self.last_result;
            (0x9669u32 << 2 >> ((r ^ (r >> 4)) & 0xF)) & FLAG_PF != 0
        } else {
            self.flags & FLAG_PF != 0
        }
    }

    pub fn af(&self) -> bool {
        if self.flags_changed & FLAG_AF != 0 {
            (self.last_op1 ^ self.last_op2 ^ self.last_add_result) & FLAG_AF != 0
        } else {
            self.flags & FLAG_AF != 0
        }
    }

    pub fn zf(&self) -> bool {
        if self.flags_changed & FLAG_ZF != 0 {
            let r = self.last_result;
            (!r & r.wrapping_sub(1)) >> self.last_op_size & 1 != 0
        } else {
            self.flags & FLAG_ZF != 0
        }
    }

    pub fn sf(&self) -> bool {
        if self.flags_changed & FLAG_SF != 0 {
            self.last_result >> self.last_op_size & 1 != 0
        } else {
            self.flags & FLAG_SF != 0
        }
    }

    pub fn of(&self) -> bool {
        if self.flags_changed & FLAG_OF != 0 {
            let (op1, op2, add) = (self.last_op1, self.last_op2, self.last_add_result);
            ((op1 ^ add) & (op2 ^ add)) >> self.last_op_size & 1 != 0
        } else {
            self.flags & FLAG_OF != 0
        }
    }

    // Condition-code predicates in Jcc encoding order. Callers build the
    // negated forms (JNO, JAE, ...) by inverting the result.

    pub fn test_o(&self) -> bool {
        self.of()
    }

    pub fn test_b(&self) -> bool {
        self.cf()
    }

    pub fn test_z(&self) -> bool {
        self.zf()
    }

    pub fn test_s(&self) -> bool {
        self.sf()
    }

    pub fn test_p(&self) -> bool {
        self.pf()
    }

    pub fn test_be(&self) -> bool {
        self.cf() || self.zf()
    }

    pub fn test_l(&self) -> bool {
        self.sf() != self.of()
    }

    pub fn test_le(&self) -> bool {
        self.zf() || (self.sf() != self.of())
    }
}
