//! `FilterPair`: orchestrates the `HashTable` and `Filter` and owns the
//! adaptive rehashing protocol.
//!
//! Grounded on `original_source/cuckoopair.hh`/`cuckoopair.cc`, which wires
//! an exact table together with a compact filter the same way; this crate
//! replaces its static fingerprinting with the seed-bumping rehash loop
//! spec.md §4.5 describes.

use std::collections::HashSet;
use std::hash::Hash;

use crate::config::FilterPairConfig;
use crate::error::{FindError, InsertStatus, LookupResult};
use crate::filter::Filter;
use crate::hash;
use crate::rng::CuckooRng;
use crate::snapshot::Snapshot;
use crate::table::HashTable;

/// spec.md §4.5's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    Empty,
    Loading,
    Probing,
    Converged,
    Full,
}

pub struct FilterPair<K> {
    table: HashTable<K>,
    filter: Filter,
    rng: CuckooRng,
    bits_per_fp: u32,
    dirty: HashSet<usize>,
    num_rehashes: usize,
    round_false_positives: usize,
    state: PairState,
}

impl<K: Copy + Default + Eq + Hash> FilterPair<K> {
    /// Builds a pair with a non-reproducible RNG; prefer `with_rng` in
    /// tests and the CLI driver, which need a fixed seed.
    pub fn new(config: FilterPairConfig) -> Self {
        Self::with_rng(config, CuckooRng::default())
    }

    pub fn with_rng(config: FilterPairConfig, rng: CuckooRng) -> Self {
        let hashpower = config.hashpower();
        Self {
            table: HashTable::with_hashpower(hashpower, config.bits_per_fp, config.max_kicks),
            filter: Filter::with_hashpower(hashpower, config.bits_per_fp),
            rng,
            bits_per_fp: config.bits_per_fp.bits(),
            dirty: HashSet::new(),
            num_rehashes: 0,
            round_false_positives: 0,
            state: PairState::Empty,
        }
    }

    pub fn state(&self) -> PairState {
        self.state
    }

    pub fn size(&self) -> usize {
        self.table.num_items()
    }

    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    pub fn hashpower(&self) -> u32 {
        self.table.hashpower()
    }

    pub fn load_factor(&self) -> f64 {
        self.table.num_items() as f64 / (self.table.bucket_count() * 4) as f64
    }

    pub fn seeds(&self) -> &[u16] {
        self.table.seeds()
    }

    pub fn num_rehashes(&self) -> usize {
        self.num_rehashes
    }

    pub fn round_false_positives(&self) -> usize {
        self.round_false_positives
    }

    fn bits(&self) -> crate::packed::FingerprintBits {
        self.table.bits_per_fp()
    }

    /// Delegates to `HashTable::insert`, then writes the new fingerprint
    /// into `Filter` at the coordinate the table resolved (spec.md §4.5).
    pub fn insert(&mut self, key: K) -> InsertStatus {
        if self.state == PairState::Full {
            return InsertStatus::TableFull;
        }

        let (status, pos) = self.table.insert(key, &mut self.rng);
        match status {
            InsertStatus::Ok => {
                let (i, j) = pos.expect("Ok status always carries a coordinate");
                let seed = self.table.seeds()[i];
                let fp = hash::fingerprint(&key, seed, self.bits());
                self.filter.set(i, j, fp);
                if matches!(self.state, PairState::Empty | PairState::Loading) {
                    self.state = PairState::Loading;
                }
            }
            InsertStatus::KeyDuplicated => {}
            InsertStatus::TableFull => {
                self.state = PairState::Full;
            }
        }
        status
    }

    /// Table-only exact match (spec.md §6's `find`).
    pub fn find(&self, key: &K) -> Option<(usize, usize)> {
        self.table.find(key)
    }

    /// Strict variant of `find`: `Err(OutOfRange)` on a miss (spec.md §7).
    pub fn find_strict(&self, key: &K) -> Result<(usize, usize), FindError> {
        self.find(key).ok_or(FindError::OutOfRange)
    }

    /// Removes `key` from both structures, symmetric with `insert`.
    pub fn delete(&mut self, key: &K) -> bool {
        match self.table.erase(key) {
            Some((i, j)) => {
                self.filter.clear(i, j);
                true
            }
            None => false,
        }
    }

    fn filter_hit(&self, i: usize, key: &K) -> bool {
        let seed = self.table.seeds()[i];
        let fp = hash::fingerprint(key, seed, self.bits());
        self.filter.contains_in_bucket(i, fp).is_some()
    }

    /// Filter-first membership query; table-confirmed hits become `Found`,
    /// unconfirmed filter hits become `FalsePositive` and dirty the bucket
    /// (spec.md §4.5).
    pub fn lookup(&mut self, key: &K) -> LookupResult {
        let (i1, i2) = self.table.primary_alt(key);
        let hit = if self.filter_hit(i1, key) {
            Some(i1)
        } else if i2 != i1 && self.filter_hit(i2, key) {
            Some(i2)
        } else {
            None
        };

        match hit {
            None => LookupResult::NotFound,
            Some(i) => match self.table.find_in_bucket(i, key) {
                Some(j) => LookupResult::Found { bucket: i, slot: j },
                None => {
                    self.dirty.insert(i);
                    self.round_false_positives += 1;
                    LookupResult::FalsePositive { bucket: i }
                }
            },
        }
    }

    /// Clears the dirty set and per-round counters ahead of a lookup sweep.
    pub fn start_lookup(&mut self) {
        self.dirty.clear();
        self.round_false_positives = 0;
        self.state = PairState::Probing;
    }

    /// Rehashes every dirty bucket, mirroring the recomputed fingerprints
    /// into `Filter`. Returns total slots rewritten.
    pub fn rehash_buckets(&mut self) -> usize {
        if self.dirty.is_empty() {
            self.state = PairState::Converged;
            return 0;
        }

        let dirty: Vec<usize> = self.dirty.drain().collect();
        let mut rewrites = 0;
        for i in dirty {
            let updates = self.table.rehash_bucket(i);
            rewrites += updates.len();
            for (j, fp) in updates {
                self.filter.set(i, j, fp);
            }
        }
        self.num_rehashes += 1;
        self.state = PairState::Probing;
        rewrites
    }

    /// Raw per-bucket fingerprint rows, exposed for property tests that
    /// check table/filter coordinate isomorphism (spec.md P4).
    pub fn filter_rows(&self) -> Vec<[u32; crate::packed::SLOTS_PER_BUCKET]> {
        self.filter.export_all()
    }

    pub fn table_is_occupied(&self, i: usize, j: usize) -> bool {
        self.table.is_occupied(i, j)
    }

    pub fn alt_index(&self, i: usize, fp: u32) -> usize {
        self.table.alt_index(i, fp)
    }

    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot::from_filter(&self.filter, self.bits_per_fp, self.table.seeds().to_vec())
    }

    pub fn info(&self) -> String {
        format!(
            "state={:?} items={} buckets={} hashpower={} load_factor={:.4} rehashes={}",
            self.state,
            self.size(),
            self.bucket_count(),
            self.hashpower(),
            self.load_factor(),
            self.num_rehashes,
        )
    }
}
