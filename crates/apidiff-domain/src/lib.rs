//! Pure API surface diffing (no IO).
//!
//! Input: two module models constructed elsewhere, plus an exclusion set.
//! Output: an annotated diff + verdict.

#![forbid(unsafe_code)]

pub mod compare;
pub mod exclusions;
pub mod model;
pub mod signature;
pub mod verdict;
pub mod version;

mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use compare::{ComparisonResult, MemberEntry, compare};
pub use engine::{DomainReport, evaluate};
pub use exclusions::{ExclusionEntry, ExclusionSet};
pub use fingerprint::fingerprint_for_entry;
pub use model::ModelError;
pub use verdict::annotate;
pub use version::{Version, VersionPredicate};
