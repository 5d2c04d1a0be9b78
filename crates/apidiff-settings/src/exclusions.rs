use crate::model::ExclusionSpecV1;
use anyhow::Context;
use apidiff_domain::signature::SIGNATURE_FORMAT;
use apidiff_domain::{ExclusionEntry, ExclusionSet, VersionPredicate};
use apidiff_types::{ElementKind, ids};
use tracing::warn;

/// Parse an exclusion specification into its typed model, checking the header fields.
pub fn parse_exclusions_toml(input: &str) -> anyhow::Result<ExclusionSpecV1> {
    let spec: ExclusionSpecV1 = toml::from_str(input)?;

    if let Some(schema) = spec.schema.as_deref() {
        if schema != ids::SCHEMA_EXCLUSIONS_V1 {
            anyhow::bail!(
                "unsupported exclusion schema: {schema} (expected {})",
                ids::SCHEMA_EXCLUSIONS_V1
            );
        }
    }
    if let Some(format) = spec.signature_format {
        if format != SIGNATURE_FORMAT {
            anyhow::bail!(
                "exclusions were authored for signature format {format}, \
                 this build produces format {SIGNATURE_FORMAT}"
            );
        }
    }

    Ok(spec)
}

/// Convert every record into a domain entry. Any invalid record fails the whole specification.
pub fn resolve_entries(spec: &ExclusionSpecV1) -> anyhow::Result<Vec<ExclusionEntry>> {
    spec.exclusions
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let kind: ElementKind = record
                .kind
                .parse()
                .with_context(|| format!("exclusions[{i}]: invalid kind"))?;

            if record.signature.trim().is_empty() {
                anyhow::bail!("exclusions[{i}]: empty signature");
            }

            let applies = match record.version.as_deref() {
                Some(expr) => VersionPredicate::parse(expr)
                    .with_context(|| format!("exclusions[{i}]: invalid version expression"))?,
                None => VersionPredicate::Always,
            };

            Ok(ExclusionEntry {
                kind,
                signature: record.signature.clone(),
                applies,
                reason: record.reason.clone(),
            })
        })
        .collect()
}

/// Build the exclusion set for `baseline_version` from specification text.
///
/// `None` (no specification) and any parse failure yield an empty set; failures are logged.
pub fn load_exclusions(input: Option<&str>, baseline_version: &str) -> ExclusionSet {
    let Some(text) = input else {
        return ExclusionSet::empty();
    };

    let entries = parse_exclusions_toml(text).and_then(|spec| resolve_entries(&spec));
    match entries {
        Ok(entries) => ExclusionSet::from_entries(entries, baseline_version),
        Err(err) => {
            let error = format!("{err:#}");
            warn!(
                error = %error,
                "ignoring unparseable exclusion specification; no exclusions apply"
            );
            ExclusionSet::empty()
        }
    }
}
