use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five element categories a surface diff is split into.
///
/// The same token is used as the `kind` of an exclusion record, so it must stay stable.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Type,
    Method,
    Field,
    Property,
    Event,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Type,
        ElementKind::Method,
        ElementKind::Field,
        ElementKind::Property,
        ElementKind::Event,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Type => "type",
            ElementKind::Method => "method",
            ElementKind::Field => "field",
            ElementKind::Property => "property",
            ElementKind::Event => "event",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown element kind: {} (expected type|method|field|property|event)",
            self.0
        )
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for ElementKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "type" => Ok(ElementKind::Type),
            "method" => Ok(ElementKind::Method),
            "field" => Ok(ElementKind::Field),
            "property" => Ok(ElementKind::Property),
            "event" => Ok(ElementKind::Event),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// How a baseline element fails to carry over to the candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// No element with the same canonical signature exists in the candidate.
    Missing,
    /// Same canonical signature, incompatible shape (return type, declared type, static flag).
    Changed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiffEntry {
    pub kind: ElementKind,
    /// Canonical signature of the owning baseline type. For type entries this is the type itself.
    pub owner: String,
    pub signature: String,
    pub change: ChangeKind,
    /// True when an exclusion entry pre-approves this break.
    pub ignored: bool,
    /// Stable SHA-256 of `kind|signature`, intended for dedup and trending.
    pub fingerprint: String,
}

/// Diff entries split per category, each in baseline declaration order grouped by owner.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotatedDiff {
    #[serde(default)]
    pub types: Vec<DiffEntry>,
    #[serde(default)]
    pub methods: Vec<DiffEntry>,
    #[serde(default)]
    pub fields: Vec<DiffEntry>,
    #[serde(default)]
    pub properties: Vec<DiffEntry>,
    #[serde(default)]
    pub events: Vec<DiffEntry>,
}

impl AnnotatedDiff {
    pub fn category(&self, kind: ElementKind) -> &[DiffEntry] {
        match kind {
            ElementKind::Type => &self.types,
            ElementKind::Method => &self.methods,
            ElementKind::Field => &self.fields,
            ElementKind::Property => &self.properties,
            ElementKind::Event => &self.events,
        }
    }

    pub fn category_mut(&mut self, kind: ElementKind) -> &mut Vec<DiffEntry> {
        match kind {
            ElementKind::Type => &mut self.types,
            ElementKind::Method => &mut self.methods,
            ElementKind::Field => &mut self.fields,
            ElementKind::Property => &mut self.properties,
            ElementKind::Event => &mut self.events,
        }
    }

    /// All entries, category by category in `ElementKind::ALL` order.
    pub fn entries(&self) -> impl Iterator<Item = &DiffEntry> {
        ElementKind::ALL
            .into_iter()
            .flat_map(move |kind| self.category(kind).iter())
    }

    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    pub fn active_count(&self) -> usize {
        self.entries().filter(|e| !e.ignored).count()
    }

    pub fn ignored_count(&self) -> usize {
        self.entries().filter(|e| e.ignored).count()
    }
}
