use crate::compare::compare;
use crate::exclusions::ExclusionSet;
use crate::model::{ModelError, ModuleModel};
use crate::verdict::annotate;
use apidiff_types::{AnnotatedDiff, Verdict};

/// Outcome of one baseline/candidate module pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub diff: AnnotatedDiff,
}

pub fn evaluate(
    baseline: &ModuleModel,
    candidate: &ModuleModel,
    exclusions: &ExclusionSet,
) -> Result<DomainReport, ModelError> {
    let result = compare(baseline, candidate)?;
    let (diff, verdict) = annotate(&result, exclusions);
    Ok(DomainReport { verdict, diff })
}
