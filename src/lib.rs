//! An adaptive cuckoo filter pair: an exact cuckoo hash table paired with a
//! compact bit-packed cuckoo filter at identical bucket/slot coordinates.
//! The filter answers membership in O(1); the table lets the pair detect
//! and repair false positives by rehashing buckets with fresh per-bucket
//! seeds, driving the false-positive rate toward zero for a fixed lookup
//! set.

pub mod bucket;
pub mod config;
pub mod error;
pub mod filter;
pub mod hash;
pub mod packed;
pub mod pair;
pub mod rng;
pub mod snapshot;
pub mod table;

pub use config::FilterPairConfig;
pub use error::{FindError, InsertStatus, LookupResult};
pub use pair::{FilterPair, PairState};
pub use packed::FingerprintBits;
pub use rng::CuckooRng;
pub use snapshot::Snapshot;
