//! Annotation of a raw comparison with the exclusion set, and the gating verdict.

use crate::compare::{ComparisonResult, MemberEntry};
use crate::exclusions::ExclusionSet;
use crate::fingerprint::fingerprint_for_entry;
use apidiff_types::{AnnotatedDiff, ChangeKind, DiffEntry, ElementKind, Verdict};

const MEMBER_KINDS: [ElementKind; 4] = [
    ElementKind::Method,
    ElementKind::Field,
    ElementKind::Property,
    ElementKind::Event,
];

/// Tag every entry `ignored` or active and fold the verdict.
///
/// The verdict is [`Verdict::Fail`] iff at least one entry in any category is active.
pub fn annotate(
    result: &ComparisonResult<'_>,
    exclusions: &ExclusionSet,
) -> (AnnotatedDiff, Verdict) {
    let mut diff = AnnotatedDiff::default();

    for ty in &result.missing_types {
        let signature = ty.full_name();
        diff.types.push(entry(
            ElementKind::Type,
            signature.clone(),
            signature,
            ChangeKind::Missing,
            exclusions,
        ));
    }

    for kind in MEMBER_KINDS {
        let annotated: Vec<DiffEntry> = result
            .members(kind)
            .iter()
            .map(|m| member_entry(kind, m, exclusions))
            .collect();
        *diff.category_mut(kind) = annotated;
    }

    let verdict = if diff.entries().any(|e| !e.ignored) {
        Verdict::Fail
    } else {
        Verdict::Pass
    };

    (diff, verdict)
}

fn member_entry(kind: ElementKind, m: &MemberEntry<'_>, exclusions: &ExclusionSet) -> DiffEntry {
    entry(kind, m.owner.full_name(), m.signature(), m.change, exclusions)
}

fn entry(
    kind: ElementKind,
    owner: String,
    signature: String,
    change: ChangeKind,
    exclusions: &ExclusionSet,
) -> DiffEntry {
    DiffEntry {
        kind,
        ignored: exclusions.contains(kind, &signature),
        fingerprint: fingerprint_for_entry(kind, &signature),
        owner,
        signature,
        change,
    }
}
