use lumen_cpu_core::flags::{
    Flags, FLAG_AF, FLAG_CF, FLAG_OF, FLAG_PF, FLAG_SF, FLAG_ZF, FLAGS_ARITH, OPSIZE_16, OPSIZE_32,
    OPSIZE_8,
};
use proptest::prelude::*;

/// Reference flag computation for `a + b` at the given width.
struct AddReference {
    cf: bool,
    pf: bool,
    af: bool,
    zf: bool,
    sf: bool,
    of: bool,
}

fn add_reference(a: u32, b: u32, bits: u32) -> AddReference {
    let mask = if bits == 32 { u32::MAX } else { (1 << bits) - 1 };
    let sign = 1u32 << (bits - 1);
    let full = (a as u64) + (b as u64);
    let result = (full as u32) & mask;
    AddReference {
        cf: full > mask as u64,
        pf: (result as u8).count_ones() % 2 == 0,
        af: ((a & 0xF) + (b & 0xF)) > 0xF,
        zf: result == 0,
        sf: result & sign != 0,
        of: ((a ^ result) & (b ^ result)) & sign != 0,
    }
}

/// Populate the snapshot the way an ALU recording `a + b` would: the result
/// is kept at full precision, the flag formulas mask internally.
fn flags_after_add(a: u32, b: u32, bits: u32, op_size: u32) -> Flags {
    let add_result = if bits == 32 { a.wrapping_add(b) } else { a + b };
    let mut flags = Flags::default();
    flags.set_lazy_arith(a, b, add_result, add_result, op_size);
    flags
}

proptest! {
    #[test]
    fn add8_lazy_flags_match_reference(a in any::<u8>(), b in any::<u8>()) {
        let f = flags_after_add(a as u32, b as u32, 8, OPSIZE_8);
        let r = add_reference(a as u32, b as u32, 8);
        prop_assert_eq!(f.cf(), r.cf);
        prop_assert_eq!(f.pf(), r.pf);
        prop_assert_eq!(f.af(), r.af);
        prop_assert_eq!(f.zf(), r.zf);
        prop_assert_eq!(f.sf(), r.sf);
        prop_assert_eq!(f.of(), r.of);
    }

    #[test]
    fn add16_lazy_flags_match_reference(a in any::<u16>(), b in any::<u16>()) {
        let f = flags_after_add(a as u32, b as u32, 16, OPSIZE_16);
        let r = add_reference(a as u32, b as u32, 16);
        prop_assert_eq!(f.cf(), r.cf);
        prop_assert_eq!(f.pf(), r.pf);
        prop_assert_eq!(f.af(), r.af);
        prop_assert_eq!(f.zf(), r.zf);
        prop_assert_eq!(f.sf(), r.sf);
        prop_assert_eq!(f.of(), r.of);
    }

    #[test]
    fn add32_lazy_flags_match_reference(a in any::<u32>(), b in any::<u32>()) {
        let f = flags_after_add(a, b, 32, OPSIZE_32);
        let r = add_reference(a, b, 32);
        prop_assert_eq!(f.cf(), r.cf);
        prop_assert_eq!(f.pf(), r.pf);
        prop_assert_eq!(f.af(), r.af);
        prop_assert_eq!(f.zf(), r.zf);
        prop_assert_eq!(f.sf(), r.sf);
        prop_assert_eq!(f.of(), r.of);
    }
}

#[test]
fn stored_bits_are_authoritative_when_clean() {
    let masks = [FLAG_CF, FLAG_PF, FLAG_AF, FLAG_ZF, FLAG_SF, FLAG_OF];

    // Walk every combination of the six stored flags with nothing dirty; the
    // snapshot is filled with garbage that must be ignored.
    for combo in 0u32..64 {
        let mut flags = Flags::default();
        flags.set_lazy_arith(0xDEAD_BEEF, 0x1234_5678, 0xFFFF_FFFF, 0, OPSIZE_32);
        for (i, &mask) in masks.iter().enumerate() {
            flags.set_flag(mask, combo & (1 << i) != 0);
        }
        assert_eq!(flags.flags_changed & FLAGS_ARITH, 0);

        assert_eq!(flags.cf(), combo & 1 != 0);
        assert_eq!(flags.pf(), combo & 2 != 0);
        assert_eq!(flags.af(), combo & 4 != 0);
        assert_eq!(flags.zf(), combo & 8 != 0);
        assert_eq!(flags.sf(), combo & 16 != 0);
        assert_eq!(flags.of(), combo & 32 != 0);
    }
}

#[test]
fn mixed_dirty_state_reads_each_flag_from_its_own_source() {
    // ZF dirty (recomputed: result nonzero -> false), SF clean (stored: true).
    let mut flags = Flags::default();
    flags.set_lazy_arith(1, 1, 2, 2, OPSIZE_8);
    flags.set_flag(FLAG_SF, true);

    assert!(!flags.zf());
    assert!(flags.sf());

    // Storing ZF afterwards makes the stored value win over the snapshot.
    flags.set_flag(FLAG_ZF, true);
    assert!(flags.zf());
}

#[test]
fn condition_predicates_compose_from_flag_getters() {
    let masks = [FLAG_CF, FLAG_PF, FLAG_AF, FLAG_ZF, FLAG_SF, FLAG_OF];

    for combo in 0u32..64 {
        let mut flags = Flags::default();
        for (i, &mask) in masks.iter().enumerate() {
            flags.set_flag(mask, combo & (1 << i) != 0);
        }

        assert_eq!(flags.test_o(), flags.of());
        assert_eq!(flags.test_b(), flags.cf());
        assert_eq!(flags.test_z(), flags.zf());
        assert_eq!(flags.test_s(), flags.sf());
        assert_eq!(flags.test_p(), flags.pf());
        assert_eq!(flags.test_be(), flags.cf() || flags.zf());
        assert_eq!(flags.test_l(), flags.sf() != flags.of());
        assert_eq!(flags.test_le(), flags.zf() || (flags.sf() != flags.of()));
    }
}

#[test]
fn zero_flag_formula_handles_boundary_results() {
    let mut flags = Flags::default();

    // Result 0 at every width.
    for &op_size in &[OPSIZE_8, OPSIZE_16, OPSIZE_32] {
        flags.set_lazy_arith(0, 0, 0, 0, op_size);
        assert!(flags.zf(), "zero result must set ZF at op_size {op_size}");
    }

    // Sign-bit-only results are nonzero.
    flags.set_lazy_arith(0x80, 0, 0x80, 0x80, OPSIZE_8);
    assert!(!flags.zf());
    assert!(flags.sf());

    flags.set_lazy_arith(0x8000_0000, 0, 0x8000_0000, 0x8000_0000, OPSIZE_32);
    assert!(!flags.zf());
    assert!(flags.sf());
}
