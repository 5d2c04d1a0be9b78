//! Version-scoped allow-list of accepted breaks.

use crate::version::{Version, VersionPredicate};
use apidiff_types::ElementKind;
use std::collections::HashSet;
use tracing::{debug, warn};

/// One accepted break as authored in an exclusion specification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExclusionEntry {
    pub kind: ElementKind,
    pub signature: String,
    pub applies: VersionPredicate,
    pub reason: Option<String>,
}

impl ExclusionEntry {
    pub fn new(kind: ElementKind, signature: impl Into<String>) -> Self {
        Self {
            kind,
            signature: signature.into(),
            applies: VersionPredicate::Always,
            reason: None,
        }
    }

    pub fn applies(mut self, predicate: VersionPredicate) -> Self {
        self.applies = predicate;
        self
    }
}

/// Entries whose predicate held for the baseline version, indexed per category.
#[derive(Clone, Debug, Default)]
pub struct ExclusionSet {
    types: HashSet<String>,
    methods: HashSet<String>,
    fields: HashSet<String>,
    properties: HashSet<String>,
    events: HashSet<String>,
}

impl ExclusionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Keep the entries that apply to `baseline_version`.
    ///
    /// An unparseable baseline version only admits entries that apply to every version.
    pub fn from_entries<I>(entries: I, baseline_version: &str) -> Self
    where
        I: IntoIterator<Item = ExclusionEntry>,
    {
        let version = match Version::parse(baseline_version) {
            Ok(v) => Some(v),
            Err(err) => {
                warn!(
                    baseline_version,
                    error = %err,
                    "baseline version is not parseable; only unconditional exclusions apply"
                );
                None
            }
        };

        let mut set = Self::default();
        let mut dropped = 0usize;
        for entry in entries {
            if entry.applies.matches(version.as_ref()) {
                set.category_mut(entry.kind).insert(entry.signature);
            } else {
                debug!(
                    kind = %entry.kind,
                    signature = %entry.signature,
                    predicate = %entry.applies,
                    baseline_version,
                    "exclusion does not apply to baseline version"
                );
                dropped += 1;
            }
        }

        debug!(kept = set.len(), dropped, "exclusion set loaded");
        set
    }

    pub fn contains(&self, kind: ElementKind, signature: &str) -> bool {
        self.category(kind).contains(signature)
    }

    pub fn len(&self) -> usize {
        ElementKind::ALL
            .into_iter()
            .map(|k| self.category(k).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn category(&self, kind: ElementKind) -> &HashSet<String> {
        match kind {
            ElementKind::Type => &self.types,
            ElementKind::Method => &self.methods,
            ElementKind::Field => &self.fields,
            ElementKind::Property => &self.properties,
            ElementKind::Event => &self.events,
        }
    }

    fn category_mut(&mut self, kind: ElementKind) -> &mut HashSet<String> {
        match kind {
            ElementKind::Type => &mut self.types,
            ElementKind::Method => &mut self.methods,
            ElementKind::Field => &mut self.fields,
            ElementKind::Property => &mut self.properties,
            ElementKind::Event => &mut self.events,
        }
    }
}
