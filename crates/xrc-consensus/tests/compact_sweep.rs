use num_bigint::BigUint;
use proptest::prelude::*;
use xrc_consensus::{bits_to_target, target_to_bits, Target};

/// Bitcoin `SetCompact`: value plus the negative and overflow flags.
fn set_compact(bits: u32) -> (BigUint, bool, bool) {
    let size = bits >> 24;
    let mut word = bits & 0x007f_ffff;
    let value = if size <= 3 {
        word >>= 8 * (3 - size);
        BigUint::from(word)
    } else {
        BigUint::from(word) << (8 * (size - 3))
    };
    let negative = word != 0 && bits & 0x0080_0000 != 0;
    let overflow = word != 0
        && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));
    (value, negative, overflow)
}

fn any_bits() -> impl Strategy<Value = u32> {
    prop_oneof![
        any::<u32>(),
        // Exponents that can decode, where the interesting edges are.
        (0u32..=0x22, 0u32..0x0100_0000).prop_map(|(exp, mant)| (exp << 24) | mant),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4096))]

    #[test]
    fn decode_agrees_with_set_compact(bits in any_bits()) {
        let (value, negative, overflow) = set_compact(bits);
        let valid = !negative && !overflow && value != BigUint::from(0u32);

        match bits_to_target(bits) {
            Ok(target) => {
                prop_assert!(valid, "accepted 0x{bits:08x}");
                prop_assert_eq!(target, value);
            }
            Err(_) => prop_assert!(!valid, "rejected 0x{bits:08x}"),
        }
    }

    #[test]
    fn canonical_form_round_trips(bits in any_bits()) {
        if let Ok(target) = Target::from_compact(bits) {
            let canonical = target.to_compact();
            let again = Target::from_compact(canonical).unwrap();
            prop_assert_eq!(&again, &target);
            prop_assert_eq!(again.to_compact(), canonical);
        }
    }

    #[test]
    fn encoding_truncates_downwards(bytes in prop::array::uniform32(any::<u8>())) {
        let value = BigUint::from_bytes_be(&bytes);
        prop_assume!(value != BigUint::from(0u32));

        let bits = target_to_bits(&value);
        let decoded = bits_to_target(bits).unwrap();
        prop_assert!(decoded <= value);
        prop_assert_eq!(target_to_bits(&decoded), bits);
        prop_assert_eq!(Target::from_be_bytes(&bytes).to_compact(), bits);
    }
}
