//! Status and error types for the filter pair's public surface.
//!
//! These follow the plain-enum convention the teacher crate already uses for
//! `filter::cuckoo::InsertResult` (`Success` / `Duplicate` / `Rejected`)
//! rather than introducing a dedicated error-handling crate: `KeyDuplicated`
//! and `NotFound` are routine outcomes, not failures, so they are reported
//! locally via these enums exactly as spec.md §7 requires. `anyhow::Error` is
//! reserved for the CLI binary's `main`, matching how the teacher crate keeps
//! `anyhow` confined to its `src/bin/*.rs` drivers.

use std::fmt;

/// Outcome of `HashTable::insert` / `FilterPair::insert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertStatus {
    /// The key was placed at a fresh (bucket, slot).
    Ok,
    /// The key was already present; neither structure was mutated.
    KeyDuplicated,
    /// The cuckoo walk exhausted `MAX_KICKS` and the victim slot was already
    /// occupied. The caller should rebuild with a larger capacity.
    TableFull,
}

impl fmt::Display for InsertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertStatus::Ok => f.write_str("ok"),
            InsertStatus::KeyDuplicated => f.write_str("key already present"),
            InsertStatus::TableFull => f.write_str("table full, rebuild with larger capacity"),
        }
    }
}

impl std::error::Error for InsertStatus {}

/// Outcome of `FilterPair::lookup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult {
    /// Filter reported absence; the key is (with overwhelming probability)
    /// not stored.
    NotFound,
    /// The filter reported presence and the table confirmed a real key.
    Found { bucket: usize, slot: usize },
    /// The filter reported presence for `bucket` but the table holds no
    /// matching key there — an observed false positive. `bucket` has been
    /// added to the dirty set.
    FalsePositive { bucket: usize },
}

impl LookupResult {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found { .. })
    }
}

/// `find`'s strict variant: `OutOfRange` when the key cannot be located by an
/// exact-match table scan (spec.md §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindError {
    OutOfRange,
}

impl fmt::Display for FindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key not present in table")
    }
}

impl std::error::Error for FindError {}
