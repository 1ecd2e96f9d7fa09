//! The compact cuckoo filter: stores fingerprints only, at coordinates the
//! `HashTable` prescribes.
//!
//! Grounded on `original_source/cuckoofilter/src/singletable.h` (storage,
//! via `crate::packed`) and `cuckoopair.hh` (the filter's role as a pure
//! mirror once paired with a table).

use crate::packed::{FingerprintBits, PackedFilterTable, SLOTS_PER_BUCKET};

/// Single-element overflow slot used only in standalone (filter-only) mode,
/// where there is no `HashTable` to arbitrate displacement. In paired mode
/// the `HashTable`'s cuckoo walk is authoritative and placement is always
/// prescribed, so this cache is never consulted (spec.md §4.4).
#[derive(Debug, Clone, Copy)]
struct VictimTag {
    bucket: usize,
    fingerprint: u32,
}

pub struct Filter {
    table: PackedFilterTable,
    victim: Option<VictimTag>,
}

impl Filter {
    pub fn with_hashpower(hashpower: u32, bits: FingerprintBits) -> Self {
        let num_buckets = 1usize << hashpower;
        Self {
            table: PackedFilterTable::new(num_buckets, bits),
            victim: None,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.table.num_buckets()
    }

    /// Writes `fp` at `(i, j)`. The coordinate is prescribed by the
    /// `HashTable`; this never performs its own displacement.
    pub fn set(&mut self, i: usize, j: usize, fp: u32) {
        self.table.insert_tag_at(i, j, fp);
    }

    pub fn clear(&mut self, i: usize, j: usize) {
        self.table.insert_tag_at(i, j, 0);
    }

    pub fn clear_bucket(&mut self, i: usize) {
        self.table.clear_bucket(i);
    }

    pub fn contains_in_bucket(&self, i: usize, fp: u32) -> Option<usize> {
        self.table.find_tag_in_bucket(i, fp)
    }

    pub fn contains(&self, i1: usize, i2: usize, fp: u32) -> Option<usize> {
        self.table.find_tag_in_two_buckets(i1, i2, fp)
    }

    /// Reads every bucket's raw slots for `export_snapshot` (spec.md §4.5).
    pub fn export_all(&self) -> Vec<[u32; SLOTS_PER_BUCKET]> {
        (0..self.table.num_buckets())
            .map(|i| {
                let mut row = [0u32; SLOTS_PER_BUCKET];
                for (j, slot) in row.iter_mut().enumerate() {
                    *slot = self.table.read_tag(i, j);
                }
                row
            })
            .collect()
    }

    /// Rebuilds a `Filter` from exported bucket rows, bypassing the cuckoo
    /// path entirely since placement is already prescribed (spec.md §4.5).
    pub fn from_rows(bits: FingerprintBits, rows: &[[u32; SLOTS_PER_BUCKET]]) -> Self {
        let mut table = PackedFilterTable::new(rows.len(), bits);
        for (i, row) in rows.iter().enumerate() {
            for (j, &fp) in row.iter().enumerate() {
                if fp != 0 {
                    table.insert_tag_at(i, j, fp);
                }
            }
        }
        Self {
            table,
            victim: None,
        }
    }

    /// Standalone-mode insert with cuckoo kickout, kept for parity with the
    /// original `SingleTable`/`CuckooFilter` but unused by `FilterPair`,
    /// which always calls `set` with a coordinate the `HashTable` already
    /// resolved.
    #[allow(dead_code)]
    pub fn insert_standalone(
        &mut self,
        i: usize,
        fp: u32,
        random_slot: impl FnOnce(usize) -> usize,
    ) -> bool {
        if self.victim.is_some() {
            return false;
        }
        let (ok, evicted) = self.table.insert_tag_to_bucket(i, fp, true, random_slot);
        if !ok {
            if let Some(evicted_fp) = evicted {
                self.victim = Some(VictimTag {
                    bucket: i,
                    fingerprint: evicted_fp,
                });
            }
        }
        ok
    }
}
