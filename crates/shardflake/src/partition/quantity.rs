use crate::entity::FieldValue;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a.
pub const fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Selects one of `table_count` buckets for `key`.
///
/// Integer keys hash their little-endian bytes and text keys their UTF-8
/// bytes with FNV-1a, so the result is stable across processes, platforms
/// and releases. The hash then goes through MurmurHash3's 64-bit finalizer
/// before the modulo, since FNV's low bits only depend on the low bits of
/// each input byte. Snowflake IDs are hashed rather than reduced directly because
/// their low bits are the sequence, which is usually zero at low traffic.
///
/// Returns `None` when `table_count` is zero.
///
/// ```
/// use shardflake::{FieldValue, quantity_bucket};
///
/// let bucket = quantity_bucket(FieldValue::Text("ada@example.com"), 16).unwrap();
/// assert!(bucket < 16);
/// assert_eq!(quantity_bucket(FieldValue::Int(42), 0), None);
/// ```
pub fn quantity_bucket(key: FieldValue<'_>, table_count: u32) -> Option<u32> {
    if table_count == 0 {
        return None;
    }
    let hash = match key {
        FieldValue::Int(value) => fnv1a64(&value.to_le_bytes()),
        FieldValue::Text(value) => fnv1a64(value.as_bytes()),
    };
    u32::try_from(fmix64(hash) % u64::from(table_count)).ok()
}

const fn fmix64(mut hash: u64) -> u64 {
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51_afd7_ed55_8ccd);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    hash ^= hash >> 33;
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fnv_reference_vectors() {
        assert_eq!(fnv1a64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a64(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a64(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn buckets_are_deterministic_and_in_range() {
        for count in [1_u32, 2, 7, 64] {
            for key in 0..500_i64 {
                let bucket = quantity_bucket(FieldValue::Int(key), count).unwrap();
                assert!(bucket < count);
                assert_eq!(quantity_bucket(FieldValue::Int(key), count), Some(bucket));
            }
        }
    }

    #[test]
    fn consecutive_ids_spread_across_buckets() {
        // IDs from one millisecond differ only in their low sequence bits.
        let base = 1_710_496_800_000_i64 << 17;
        let used: HashSet<u32> = (0..64)
            .map(|seq| quantity_bucket(FieldValue::Int(base | seq), 8).unwrap())
            .collect();
        assert_eq!(used.len(), 8);
    }

    #[test]
    fn text_and_int_keys_hash_their_bytes() {
        assert_eq!(quantity_bucket(FieldValue::Text("a"), 1000), Some(315));
        assert_eq!(quantity_bucket(FieldValue::Int(1), 1000), Some(702));
        assert_eq!(quantity_bucket(FieldValue::Text("ada@example.com"), 16), Some(11));
    }

    #[test]
    fn high_bits_of_bytes_affect_power_of_two_buckets() {
        // 'a' (0x61) and 'i' (0x69) share their low three bits.
        let buckets: HashSet<u32> = ["a", "i", "q", "y"]
            .into_iter()
            .map(|key| quantity_bucket(FieldValue::Text(key), 8).unwrap())
            .collect();
        assert!(buckets.len() > 1);
    }
}
