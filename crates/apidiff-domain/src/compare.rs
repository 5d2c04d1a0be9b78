//! Baseline-driven surface comparison.
//!
//! Every baseline type is looked up in the candidate by canonical signature. Missing types are
//! recorded without descending into their members; present types have each member looked up in
//! the candidate type's per-category index. Additions are never reported.

use crate::model::{MemberDescriptor, ModelError, ModuleModel, TypeDescriptor, TypeRef};
use crate::signature::{member_signature, type_ref_signature};
use apidiff_types::{ChangeKind, ElementKind};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// A baseline member that did not carry over, attributed to its baseline owner.
#[derive(Clone, Copy, Debug)]
pub struct MemberEntry<'a> {
    pub owner: &'a TypeDescriptor,
    pub member: &'a MemberDescriptor,
    pub change: ChangeKind,
}

impl MemberEntry<'_> {
    pub fn signature(&self) -> String {
        member_signature(&self.owner.type_name, self.member)
    }
}

/// Raw diff: per-category sequences in baseline declaration order, grouped by owning type.
#[derive(Clone, Debug, Default)]
pub struct ComparisonResult<'a> {
    pub missing_types: Vec<&'a TypeDescriptor>,
    pub methods: Vec<MemberEntry<'a>>,
    pub fields: Vec<MemberEntry<'a>>,
    pub properties: Vec<MemberEntry<'a>>,
    pub events: Vec<MemberEntry<'a>>,
}

impl<'a> ComparisonResult<'a> {
    /// Member entries for one category. `ElementKind::Type` has no member entries.
    pub fn members(&self, kind: ElementKind) -> &[MemberEntry<'a>] {
        match kind {
            ElementKind::Type => &[],
            ElementKind::Method => &self.methods,
            ElementKind::Field => &self.fields,
            ElementKind::Property => &self.properties,
            ElementKind::Event => &self.events,
        }
    }

    pub fn len(&self) -> usize {
        self.missing_types.len()
            + self.methods.len()
            + self.fields.len()
            + self.properties.len()
            + self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push_member(&mut self, entry: MemberEntry<'a>) {
        match entry.member.kind() {
            ElementKind::Method => self.methods.push(entry),
            ElementKind::Field => self.fields.push(entry),
            ElementKind::Property => self.properties.push(entry),
            ElementKind::Event => self.events.push(entry),
            ElementKind::Type => unreachable!("members never have the type kind"),
        }
    }
}

/// Compare `baseline` against `candidate`.
///
/// Fails only when either module violates the reader contract (see [`ModuleModel::validate`]).
pub fn compare<'a>(
    baseline: &'a ModuleModel,
    candidate: &ModuleModel,
) -> Result<ComparisonResult<'a>, ModelError> {
    baseline.validate()?;
    candidate.validate()?;

    let candidate_types: HashMap<String, &TypeDescriptor> = candidate
        .types
        .iter()
        .map(|t| (t.full_name(), t))
        .collect();

    debug!(
        module = %baseline.name,
        baseline_types = baseline.types.len(),
        candidate_types = candidate_types.len(),
        "comparing module surface"
    );

    // Indexed parallel iterators collect in input order, so merging below is deterministic.
    let outcomes: Vec<TypeOutcome<'a>> = baseline
        .types
        .par_iter()
        .map(|ty| match candidate_types.get(&ty.full_name()) {
            None => TypeOutcome::Missing(ty),
            Some(other) => TypeOutcome::Present(compare_members(ty, other)),
        })
        .collect();

    let mut result = ComparisonResult::default();
    for outcome in outcomes {
        match outcome {
            TypeOutcome::Missing(ty) => result.missing_types.push(ty),
            TypeOutcome::Present(entries) => {
                for entry in entries {
                    result.push_member(entry);
                }
            }
        }
    }

    debug!(
        module = %baseline.name,
        missing_types = result.missing_types.len(),
        invalid_members = result.len() - result.missing_types.len(),
        "module comparison finished"
    );

    Ok(result)
}

enum TypeOutcome<'a> {
    Missing(&'a TypeDescriptor),
    Present(Vec<MemberEntry<'a>>),
}

/// Candidate members of one type, indexed per category by canonical signature.
#[derive(Default)]
struct MemberIndex<'c> {
    methods: HashMap<String, &'c MemberDescriptor>,
    fields: HashMap<String, &'c MemberDescriptor>,
    properties: HashMap<String, &'c MemberDescriptor>,
    events: HashMap<String, &'c MemberDescriptor>,
}

impl<'c> MemberIndex<'c> {
    fn build(ty: &'c TypeDescriptor) -> Self {
        let mut index = MemberIndex::default();
        for member in &ty.members {
            let signature = member_signature(&ty.type_name, member);
            index.category_mut(member.kind()).insert(signature, member);
        }
        index
    }

    fn category_mut(&mut self, kind: ElementKind) -> &mut HashMap<String, &'c MemberDescriptor> {
        match kind {
            ElementKind::Method => &mut self.methods,
            ElementKind::Field => &mut self.fields,
            ElementKind::Property => &mut self.properties,
            ElementKind::Event => &mut self.events,
            ElementKind::Type => unreachable!("members never have the type kind"),
        }
    }

    fn get(&self, kind: ElementKind, signature: &str) -> Option<&'c MemberDescriptor> {
        let category = match kind {
            ElementKind::Method => &self.methods,
            ElementKind::Field => &self.fields,
            ElementKind::Property => &self.properties,
            ElementKind::Event => &self.events,
            ElementKind::Type => return None,
        };
        category.get(signature).copied()
    }
}

fn compare_members<'a>(
    baseline: &'a TypeDescriptor,
    candidate: &TypeDescriptor,
) -> Vec<MemberEntry<'a>> {
    if baseline.members.is_empty() {
        return Vec::new();
    }

    let index = MemberIndex::build(candidate);
    let mut out = Vec::new();

    for member in &baseline.members {
        let signature = member_signature(&baseline.type_name, member);
        let change = match index.get(member.kind(), &signature) {
            None => Some(ChangeKind::Missing),
            Some(other) if !is_compatible(member, other) => Some(ChangeKind::Changed),
            Some(_) => None,
        };

        if let Some(change) = change {
            out.push(MemberEntry {
                owner: baseline,
                member,
                change,
            });
        }
    }

    out
}

/// Shape check for members that share a canonical signature.
///
/// Type references are compared by canonical text so assembly scope never matters.
fn is_compatible(baseline: &MemberDescriptor, candidate: &MemberDescriptor) -> bool {
    match (baseline, candidate) {
        (MemberDescriptor::Method(a), MemberDescriptor::Method(b)) => {
            a.is_static == b.is_static && same(&a.return_type, &b.return_type)
        }
        (MemberDescriptor::Field(a), MemberDescriptor::Field(b)) => {
            same(&a.field_type, &b.field_type)
        }
        (MemberDescriptor::Property(a), MemberDescriptor::Property(b)) => {
            same(&a.property_type, &b.property_type)
        }
        (MemberDescriptor::Event(a), MemberDescriptor::Event(b)) => {
            same(&a.handler_type, &b.handler_type)
        }
        _ => false,
    }
}

fn same(a: &TypeRef, b: &TypeRef) -> bool {
    type_ref_signature(a) == type_ref_signature(b)
}
