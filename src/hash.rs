//! Seeded 64-bit hash family.
//!
//! The core engine treats hashing as an external collaborator (spec.md §1):
//! it only needs a function `(key, seed: u16) -> u64` that mixes well and is
//! deterministic for a given seed. `siphasher` already appears in this
//! crate's dependency tree, so it is the natural choice instead of pulling in
//! a second hashing crate.

use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

use crate::packed::FingerprintBits;

/// Hashes `key` under the given 16-bit bucket seed.
///
/// Seed `0` is the table's default hash; nonzero seeds are produced by
/// `HashTable::rehash_bucket` bumping a bucket's seed counter. The seed is
/// folded into the SipHash key material rather than the input stream, so
/// distinct seeds behave like distinct hash functions rather than like
/// hashing `(key, seed)` as a pair.
pub fn seeded_hash<K: Hash>(key: &K, seed: u16) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0x5bd1_e995_u64, u64::from(seed));
    key.hash(&mut hasher);
    hasher.finish()
}

/// The 64-bit murmur2 constant used to derive the alternate bucket index.
/// Matches `original_source/cuckoohashtable/cuckoohashtable.hh::alt_index`.
pub const ALT_INDEX_CONST: u64 = 0xc6a4_a793_5bd1_e995;

/// `nonzero_trunc_b(hash(key, seed))` (spec.md §4.3): truncates the seeded
/// hash to `bits` bits and coerces a zero result to one, since zero is the
/// empty-slot sentinel.
pub fn fingerprint<K: Hash>(key: &K, seed: u16, bits: FingerprintBits) -> u32 {
    let h = seeded_hash(key, seed);
    let fp = (h as u32) & bits.mask();
    if fp == 0 {
        1
    } else {
        fp
    }
}
