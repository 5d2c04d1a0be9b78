//! Fuzz target for exclusion specifications and version predicates.
//!
//! Parsing, resolving and building the lookup set must never panic, whatever the record
//! contents or baseline version.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_exclusions
//! ```

#![no_main]

use apidiff_domain::version::VersionPredicate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // First line doubles as a baseline version and a predicate expression.
    let first = text.lines().next().unwrap_or_default();
    let _ = VersionPredicate::parse(first);

    let _ = apidiff_settings::load_exclusions(Some(text), first);
});
