//! The exact cuckoo hash table: ground truth for the paired filter.
//!
//! Grounded on `original_source/cuckoohashtable/cuckoohashtable.hh`. That
//! file's `run_cuckoo` is an empty stub; the random-walk-with-kickout loop
//! implemented in `insert` below is this crate's completion of it, per the
//! coherent design spec.md describes.

use std::hash::Hash;

use crate::bucket::BucketContainer;
use crate::error::InsertStatus;
use crate::hash::{self, ALT_INDEX_CONST};
use crate::packed::FingerprintBits;
use crate::rng::CuckooRng;

pub const SLOTS_PER_BUCKET: usize = crate::packed::SLOTS_PER_BUCKET;
/// Default `max_kicks` (spec.md §6); `FilterPairConfig` may override this
/// per instance.
pub const MAX_KICKS: u32 = 500;

struct Victim<K> {
    bucket: usize,
    key: K,
}

/// Holds full keys in a `BucketContainer<K, 4>` plus the per-bucket seed
/// vector that drives adaptive rehashing.
pub struct HashTable<K> {
    buckets: BucketContainer<K, SLOTS_PER_BUCKET>,
    seeds: Vec<u16>,
    bits: FingerprintBits,
    num_items: usize,
    victim: Option<Victim<K>>,
    max_kicks: u32,
}

impl<K: Copy + Default + Eq + Hash> HashTable<K> {
    pub fn with_hashpower(hashpower: u32, bits: FingerprintBits, max_kicks: u32) -> Self {
        let buckets = BucketContainer::with_hashpower(hashpower);
        let seeds = vec![0u16; buckets.size()];
        Self {
            buckets,
            seeds,
            bits,
            num_items: 0,
            victim: None,
            max_kicks,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.size()
    }

    pub fn hashpower(&self) -> u32 {
        self.buckets.hashpower()
    }

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    pub fn seeds(&self) -> &[u16] {
        &self.seeds
    }

    pub fn has_victim(&self) -> bool {
        self.victim.is_some()
    }

    /// The bucket the walk was displacing out of when `max_kicks` was
    /// exhausted, if a victim is currently held.
    pub fn victim_bucket(&self) -> Option<usize> {
        self.victim.as_ref().map(|v| v.bucket)
    }

    pub fn bits_per_fp(&self) -> FingerprintBits {
        self.bits
    }

    fn mask(&self) -> usize {
        self.buckets.size() - 1
    }

    fn fingerprint(&self, key: &K, seed: u16) -> u32 {
        hash::fingerprint(key, seed, self.bits)
    }

    fn index_hash(&self, h: u64) -> usize {
        (h as usize) & self.mask()
    }

    /// `alt(i, fp) = i ⊕ (fp · C) mod N` (spec.md I2); an involution since
    /// the XOR operand is re-derived identically from the same `fp`.
    pub fn alt_index(&self, i: usize, fp: u32) -> usize {
        let term = (u64::from(fp).wrapping_mul(ALT_INDEX_CONST)) as usize & self.mask();
        i ^ term
    }

    /// Primary and alternate buckets for `key`, from the seed-0 hash.
    pub fn primary_alt(&self, key: &K) -> (usize, usize) {
        let h0 = hash::seeded_hash(key, 0);
        let i1 = self.index_hash(h0);
        let fp0 = self.fingerprint(key, 0);
        let i2 = self.alt_index(i1, fp0);
        (i1, i2)
    }

    /// Exact key match restricted to one bucket, used by `FilterPair::lookup`
    /// to distinguish a true hit from a false positive once the Filter has
    /// reported `fp` present at bucket `i`.
    pub fn find_in_bucket(&self, i: usize, key: &K) -> Option<usize> {
        self.buckets
            .occupied_slots(i)
            .find(|(_, k)| k == *key)
            .map(|(j, _)| j)
    }

    /// Pure table lookup: exact key match only (spec.md §4.3's `find`).
    pub fn find(&self, key: &K) -> Option<(usize, usize)> {
        let (i1, i2) = self.primary_alt(key);
        if let Some(j) = self.find_in_bucket(i1, key) {
            return Some((i1, j));
        }
        if i2 != i1 {
            if let Some(j) = self.find_in_bucket(i2, key) {
                return Some((i2, j));
            }
        }
        None
    }

    pub fn is_occupied(&self, i: usize, j: usize) -> bool {
        self.buckets.is_occupied(i, j)
    }

    pub fn key_at(&self, i: usize, j: usize) -> Option<K> {
        self.buckets.get(i, j)
    }

    /// Random-walk-with-kickout cuckoo insert (spec.md §4.3).
    pub fn insert(&mut self, key: K, rng: &mut CuckooRng) -> (InsertStatus, Option<(usize, usize)>) {
        if self.victim.is_some() {
            return (InsertStatus::TableFull, None);
        }

        if let Some(pos) = self.find(&key) {
            return (InsertStatus::KeyDuplicated, Some(pos));
        }

        let h0 = hash::seeded_hash(&key, 0);
        let mut cur_i = self.index_hash(h0);
        let mut cur_key = key;
        let mut cur_fp = self.fingerprint(&cur_key, 0);
        let mut kicks = 0u32;

        loop {
            if let Some(j) = self.buckets.first_empty_slot(cur_i) {
                self.buckets.set(cur_i, j, cur_key);
                self.num_items += 1;
                return (InsertStatus::Ok, Some((cur_i, j)));
            }

            if kicks == 0 {
                // i1 is never evicted from; move to i2 with the original key
                // untouched (cuckoofilter.h's AddImpl: kickout = count > 0).
                cur_i = self.alt_index(cur_i, cur_fp);
            } else {
                let r = rng.random_slot(SLOTS_PER_BUCKET);
                let displaced = self
                    .buckets
                    .get(cur_i, r)
                    .expect("bucket reported full but slot r is empty");
                self.buckets.overwrite(cur_i, r, cur_key);
                cur_key = displaced;
                cur_fp = self.fingerprint(&cur_key, 0);
                cur_i = self.alt_index(cur_i, cur_fp);
            }

            kicks += 1;
            if kicks >= self.max_kicks {
                break;
            }
        }

        self.victim = Some(Victim {
            bucket: cur_i,
            key: cur_key,
        });
        (InsertStatus::TableFull, None)
    }

    /// Removes `key` if present, returning its former coordinates.
    pub fn erase(&mut self, key: &K) -> Option<(usize, usize)> {
        let pos = self.find(key)?;
        self.buckets.erase(pos.0, pos.1);
        self.num_items -= 1;
        Some(pos)
    }

    /// Bumps `seeds[i]` and recomputes every occupied slot's fingerprint
    /// under the new seed. Returns `(slot, fingerprint)` pairs for the
    /// caller (`FilterPair`) to write into the `Filter`; the `HashTable`
    /// itself has no knowledge of the `Filter`'s existence, mirroring how
    /// the `Filter` knows nothing about keys or seeds (spec.md §4.4).
    pub fn rehash_bucket(&mut self, i: usize) -> Vec<(usize, u32)> {
        self.seeds[i] = self.seeds[i].wrapping_add(1);
        let seed = self.seeds[i];
        self.buckets
            .occupied_slots(i)
            .map(|(j, key)| (j, self.fingerprint(&key, seed)))
            .collect()
    }

    /// Re-derives the current fingerprint for every occupied slot in bucket
    /// `i` under its present seed, without bumping it. Used by
    /// `export_snapshot`.
    pub fn snapshot_bucket(&self, i: usize) -> Vec<(usize, u32)> {
        let seed = self.seeds[i];
        self.buckets
            .occupied_slots(i)
            .map(|(j, key)| (j, self.fingerprint(&key, seed)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(hashpower: u32) -> HashTable<u64> {
        HashTable::with_hashpower(hashpower, FingerprintBits::B12, MAX_KICKS)
    }

    #[test]
    fn alt_index_is_an_involution() {
        let t = table(4);
        for fp in [1u32, 42, 4095] {
            for i in 0..t.bucket_count() {
                let i2 = t.alt_index(i, fp);
                assert_eq!(t.alt_index(i2, fp), i);
            }
        }
    }

    #[test]
    fn insert_then_find_roundtrips() {
        let mut t = table(4);
        let mut rng = CuckooRng::seed_from_u64(1);
        let (status, pos) = t.insert(123u64, &mut rng);
        assert_eq!(status, InsertStatus::Ok);
        assert!(pos.is_some());
        assert_eq!(t.find(&123u64), pos);
        assert_eq!(t.num_items(), 1);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut t = table(4);
        let mut rng = CuckooRng::seed_from_u64(1);
        t.insert(7u64, &mut rng);
        let (status, pos) = t.insert(7u64, &mut rng);
        assert_eq!(status, InsertStatus::KeyDuplicated);
        assert!(pos.is_some());
        assert_eq!(t.num_items(), 1);
    }

    #[test]
    fn erase_then_find_misses() {
        let mut t = table(4);
        let mut rng = CuckooRng::seed_from_u64(1);
        t.insert(99u64, &mut rng);
        assert!(t.erase(&99u64).is_some());
        assert_eq!(t.find(&99u64), None);
        assert_eq!(t.num_items(), 0);
    }

    #[test]
    fn rehash_bucket_bumps_seed_and_recomputes_fingerprints() {
        let mut t = table(3);
        let mut rng = CuckooRng::seed_from_u64(1);
        for k in 0..10u64 {
            t.insert(k, &mut rng);
        }
        let (i, _) = t.primary_alt(&0u64);
        let before = t.seeds()[i];
        let rewrites = t.rehash_bucket(i);
        assert_eq!(t.seeds()[i], before.wrapping_add(1));
        for (_, fp) in &rewrites {
            assert_ne!(*fp, 0);
        }
    }

    #[test]
    fn fills_to_capacity_without_panicking() {
        let mut t = table(5); // 32 buckets * 4 slots = 128 slots
        let mut rng = CuckooRng::seed_from_u64(1);
        let mut duplicates = 0;
        for k in 0..100u64 {
            let (status, _) = t.insert(k, &mut rng);
            if status == InsertStatus::KeyDuplicated {
                duplicates += 1;
            }
        }
        assert_eq!(duplicates, 0);
        assert_eq!(t.num_items(), 100);
    }
}
