//! In-memory export/rebuild shape for the filter side (spec.md §4.5).
//!
//! No disk I/O — persistence stays a Non-goal. `serde` derives the shape so
//! a caller (or a test) can round-trip it through any format it likes; this
//! crate exercises `bincode` once, purely to demonstrate the shape is
//! serializable, not to persist anything.

use serde::{Deserialize, Serialize};

use crate::filter::Filter;
use crate::packed::{FingerprintBits, SLOTS_PER_BUCKET};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub bits_per_fp: u32,
    pub buckets: Vec<[u32; SLOTS_PER_BUCKET]>,
    pub seeds: Vec<u16>,
}

impl Snapshot {
    pub fn from_filter(filter: &Filter, bits_per_fp: u32, seeds: Vec<u16>) -> Self {
        Self {
            bits_per_fp,
            buckets: filter.export_all(),
            seeds,
        }
    }

    /// Rebuilds a `Filter` from this snapshot. Only `buckets` feeds the
    /// filter; `seeds` travels along for a caller reconstructing a full
    /// `FilterPair` (a `HashTable` reconstruction is out of scope here since
    /// persistence of keys themselves is a Non-goal).
    pub fn rebuild_filter(&self) -> Result<Filter, &'static str> {
        let bits = FingerprintBits::try_from(self.bits_per_fp)?;
        Ok(Filter::from_rows(bits, &self.buckets))
    }
}
