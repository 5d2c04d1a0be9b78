//! Package versions and the predicates exclusion entries are scoped with.
//!
//! Versions are NuGet-shaped: one to four numeric components, an optional `-prerelease` and an
//! optional `+build` suffix. Build metadata never affects ordering. Prerelease identifiers are
//! compared case-insensitively.

use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("empty version")]
    Empty,
    #[error("invalid version component '{component}' in '{input}'")]
    InvalidComponent { input: String, component: String },
    #[error("too many version components in '{0}' (at most 4)")]
    TooManyComponents(String),
    #[error("empty prerelease identifier in '{0}'")]
    EmptyPrerelease(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error("empty clause in version expression '{0}'")]
    EmptyClause(String),
    #[error("invalid version in clause '{clause}': {source}")]
    Version {
        clause: String,
        #[source]
        source: VersionError,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Identifier {
    Numeric(u64),
    Alpha(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{n}"),
            Identifier::Alpha(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Version {
    numbers: [u64; 4],
    prerelease: Vec<Identifier>,
    text: String,
}

impl Version {
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(VersionError::Empty);
        }

        let without_build = text.split_once('+').map_or(text, |(v, _)| v);
        let (core, pre) = match without_build.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (without_build, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 4 {
            return Err(VersionError::TooManyComponents(text.to_string()));
        }

        let mut numbers = [0u64; 4];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            let valid = !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
            *slot = part
                .parse::<u64>()
                .ok()
                .filter(|_| valid)
                .ok_or_else(|| VersionError::InvalidComponent {
                    input: text.to_string(),
                    component: part.to_string(),
                })?;
        }

        let mut prerelease = Vec::new();
        if let Some(pre) = pre {
            for ident in pre.split('.') {
                if ident.is_empty() {
                    return Err(VersionError::EmptyPrerelease(text.to_string()));
                }
                prerelease.push(parse_identifier(ident));
            }
        }

        Ok(Self {
            numbers,
            prerelease,
            text: text.to_string(),
        })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }
}

fn parse_identifier(ident: &str) -> Identifier {
    if ident.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = ident.parse::<u64>() {
            return Identifier::Numeric(n);
        }
    }
    Identifier::Alpha(ident.to_ascii_lowercase())
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numbers.cmp(&other.numbers).then_with(|| {
            match (self.prerelease.is_empty(), other.prerelease.is_empty()) {
                (true, true) => Ordering::Equal,
                // A release sorts above any of its prereleases.
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.prerelease.cmp(&other.prerelease),
            }
        })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Exact,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Op::Exact => "=",
            Op::Less => "<",
            Op::LessEq => "<=",
            Op::Greater => ">",
            Op::GreaterEq => ">=",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
    pub op: Op,
    pub version: Version,
}

impl Clause {
    fn matches(&self, v: &Version) -> bool {
        match self.op {
            Op::Exact => v == &self.version,
            Op::Less => v < &self.version,
            Op::LessEq => v <= &self.version,
            Op::Greater => v > &self.version,
            Op::GreaterEq => v >= &self.version,
        }
    }
}

/// Which baseline versions an exclusion entry applies to.
///
/// Grammar: `*` (or empty) for always, otherwise comma-separated clauses that must all hold,
/// each an optional operator (`=`, `<`, `<=`, `>`, `>=`; bare means `=`) followed by a version.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum VersionPredicate {
    #[default]
    Always,
    All(Vec<Clause>),
}

impl VersionPredicate {
    pub fn parse(input: &str) -> Result<Self, PredicateError> {
        let text = input.trim();
        if text.is_empty() || text == "*" {
            return Ok(VersionPredicate::Always);
        }

        let mut clauses = Vec::new();
        for raw in text.split(',') {
            let clause = raw.trim();
            if clause.is_empty() {
                return Err(PredicateError::EmptyClause(text.to_string()));
            }

            let (op, rest) = if let Some(rest) = clause.strip_prefix("<=") {
                (Op::LessEq, rest)
            } else if let Some(rest) = clause.strip_prefix(">=") {
                (Op::GreaterEq, rest)
            } else if let Some(rest) = clause.strip_prefix("==") {
                (Op::Exact, rest)
            } else if let Some(rest) = clause.strip_prefix('<') {
                (Op::Less, rest)
            } else if let Some(rest) = clause.strip_prefix('>') {
                (Op::Greater, rest)
            } else if let Some(rest) = clause.strip_prefix('=') {
                (Op::Exact, rest)
            } else {
                (Op::Exact, clause)
            };

            let version = Version::parse(rest).map_err(|source| PredicateError::Version {
                clause: clause.to_string(),
                source,
            })?;
            clauses.push(Clause { op, version });
        }

        Ok(VersionPredicate::All(clauses))
    }

    /// `version` is `None` when the baseline version could not be parsed; only
    /// [`VersionPredicate::Always`] holds then.
    pub fn matches(&self, version: Option<&Version>) -> bool {
        match self {
            VersionPredicate::Always => true,
            VersionPredicate::All(clauses) => {
                version.is_some_and(|v| clauses.iter().all(|c| c.matches(v)))
            }
        }
    }
}

impl fmt::Display for VersionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionPredicate::Always => f.write_str("*"),
            VersionPredicate::All(clauses) => {
                for (i, c) in clauses.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}{}", c.op.symbol(), c.version)?;
                }
                Ok(())
            }
        }
    }
}
