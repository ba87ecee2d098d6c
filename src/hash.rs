use crate::constants::hash::{FNV1A64_OFFSET, FNV1A64_PRIME};

/// FNV-1a over the seed bytes followed by `value`.
///
/// Stable across platforms and toolchains, unlike `DefaultHasher`, so derived
/// seeds reproduce the same draws from one build to the next.
pub fn stable_hash_str(seed: u64, value: &str) -> u64 {
    seed.to_le_bytes()
        .iter()
        .chain(value.as_bytes())
        .fold(FNV1A64_OFFSET, |hash, byte| {
            (hash ^ u64::from(*byte)).wrapping_mul(FNV1A64_PRIME)
        })
}
