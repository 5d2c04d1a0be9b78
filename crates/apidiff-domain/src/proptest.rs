//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Canonical signatures (determinism, member-order independence)
//! - Comparison identity and missing-type short-circuiting
//! - Exclusion monotonicity
//! - Version ordering

use crate::compare::compare;
use crate::engine::evaluate;
use crate::exclusions::{ExclusionEntry, ExclusionSet};
use crate::model::{MemberDescriptor, ModuleModel, Primitive, TypeDescriptor, TypeName, TypeRef};
use crate::signature::member_signature;
use crate::test_support::{event, field, method, method_returning, property};
use crate::version::Version;
use apidiff_types::{ElementKind, Verdict};
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Strategies
// ============================================================================

fn arb_primitive() -> impl Strategy<Value = Primitive> {
    prop_oneof![
        Just(Primitive::Bool),
        Just(Primitive::Int32),
        Just(Primitive::Int64),
        Just(Primitive::Float64),
        Just(Primitive::String),
        Just(Primitive::Object),
    ]
}

fn arb_type_ref() -> impl Strategy<Value = TypeRef> {
    let leaf = prop_oneof![
        arb_primitive().prop_map(TypeRef::primitive),
        "[A-Z][a-z]{1,6}".prop_map(|n| TypeRef::named("Acme", &n)),
    ];
    leaf.prop_recursive(2, 6, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(TypeRef::array),
            inner.clone().prop_map(TypeRef::by_ref),
            prop::collection::vec(inner, 1..3).prop_map(|arguments| TypeRef::GenericInstance {
                definition: TypeName::generic("Acme", "Box", arguments.len() as u32),
                arguments,
            }),
        ]
    })
}

fn arb_member() -> impl Strategy<Value = MemberDescriptor> {
    let name = "[A-Z][a-z]{0,5}";
    prop_oneof![
        (name, prop::collection::vec(arb_type_ref(), 0..3))
            .prop_map(|(n, params)| method(&n, params)),
        (name, arb_type_ref()).prop_map(|(n, t)| field(&n, t)),
        (name, arb_type_ref()).prop_map(|(n, t)| property(&n, t)),
        (name, arb_type_ref()).prop_map(|(n, t)| event(&n, t)),
    ]
}

fn renamed(member: MemberDescriptor, name: String) -> MemberDescriptor {
    match member {
        MemberDescriptor::Method(mut m) => {
            m.name = name;
            MemberDescriptor::Method(m)
        }
        MemberDescriptor::Field(mut f) => {
            f.name = name;
            MemberDescriptor::Field(f)
        }
        MemberDescriptor::Property(mut p) => {
            p.name = name;
            MemberDescriptor::Property(p)
        }
        MemberDescriptor::Event(mut e) => {
            e.name = name;
            MemberDescriptor::Event(e)
        }
    }
}

/// A type whose member names are unique, so no two members share a signature.
fn arb_members() -> impl Strategy<Value = Vec<MemberDescriptor>> {
    prop::collection::btree_map("[A-Z][a-z]{0,5}", arb_member(), 0..6)
        .prop_map(|members| members.into_iter().map(|(n, m)| renamed(m, n)).collect())
}

/// A module whose type identities are unique (keyed by name before building).
fn arb_module() -> impl Strategy<Value = ModuleModel> {
    prop::collection::btree_map("[A-Z][a-z]{1,6}", arb_members(), 0..6).prop_map(
        |types: BTreeMap<String, Vec<MemberDescriptor>>| ModuleModel {
            name: "Prop.dll".to_string(),
            types: types
                .into_iter()
                .map(|(name, members)| TypeDescriptor {
                    type_name: TypeName::new("Acme", &name),
                    members,
                })
                .collect(),
        },
    )
}

fn arb_version() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u64..20, 0u64..20, 0u64..20).prop_map(|(a, b, c)| format!("{a}.{b}.{c}")),
        (0u64..20, 0u64..20).prop_map(|(a, b)| format!("{a}.{b}")),
        (0u64..20, 0u64..20, 0u64..20, "(alpha|beta|rc)", 0u64..5)
            .prop_map(|(a, b, c, tag, n)| format!("{a}.{b}.{c}-{tag}.{n}")),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn member_signatures_are_deterministic(member in arb_member()) {
        let owner = TypeName::new("Acme", "Widget");
        let cloned = member.clone();
        prop_assert_eq!(member_signature(&owner, &member), member_signature(&owner, &cloned));
    }

    #[test]
    fn identical_modules_never_produce_entries(m in arb_module()) {
        let result = compare(&m, &m).expect("generated modules are valid");
        prop_assert!(result.is_empty());
    }

    #[test]
    fn member_order_does_not_change_the_diff(baseline in arb_module(), candidate in arb_module()) {
        let mut reversed = candidate.clone();
        for ty in &mut reversed.types {
            ty.members.reverse();
        }
        reversed.types.reverse();

        let a = evaluate(&baseline, &candidate, &ExclusionSet::empty()).expect("valid");
        let b = evaluate(&baseline, &reversed, &ExclusionSet::empty()).expect("valid");
        prop_assert_eq!(a, b);
    }

    #[test]
    fn return_type_never_affects_method_identity(
        name in "[A-Z][a-z]{0,5}",
        params in prop::collection::vec(arb_type_ref(), 0..3),
        a in arb_type_ref(),
        b in arb_type_ref(),
    ) {
        let owner = TypeName::new("Acme", "Widget");
        let left = method_returning(&name, params.clone(), a);
        let right = method_returning(&name, params, b);
        prop_assert_eq!(member_signature(&owner, &left), member_signature(&owner, &right));
    }

    #[test]
    fn missing_types_have_no_member_entries(m in arb_module()) {
        let empty = ModuleModel::empty(&m.name);
        let result = compare(&m, &empty).expect("valid");
        prop_assert_eq!(result.missing_types.len(), m.types.len());
        prop_assert_eq!(result.len(), m.types.len());
    }

    #[test]
    fn adding_an_exclusion_never_turns_pass_into_fail(
        baseline in arb_module(),
        candidate in arb_module(),
        pick in any::<prop::sample::Index>(),
    ) {
        let without = evaluate(&baseline, &candidate, &ExclusionSet::empty()).expect("valid");
        let entries: Vec<_> = without.diff.entries().cloned().collect();
        prop_assume!(!entries.is_empty());

        let chosen = pick.get(&entries);
        let set = ExclusionSet::from_entries(
            vec![ExclusionEntry::new(chosen.kind, chosen.signature.clone())],
            "1.0.0",
        );
        let with = evaluate(&baseline, &candidate, &set).expect("valid");

        prop_assert_eq!(with.diff.len(), without.diff.len());
        prop_assert!(with.diff.active_count() < without.diff.active_count());
        if without.verdict == Verdict::Pass {
            prop_assert_eq!(with.verdict, Verdict::Pass);
        }
        for (before, after) in without.diff.entries().zip(with.diff.entries()) {
            prop_assert!(!before.ignored || after.ignored);
        }
    }

    #[test]
    fn version_ordering_is_total_and_consistent(a in arb_version(), b in arb_version()) {
        let va = Version::parse(&a).expect("generated version");
        let vb = Version::parse(&b).expect("generated version");
        prop_assert_eq!(va.cmp(&vb), vb.cmp(&va).reverse());
        prop_assert_eq!(va == vb, va.cmp(&vb).is_eq());
    }

    #[test]
    fn release_sorts_above_its_prereleases(
        a in 0u64..20, b in 0u64..20, c in 0u64..20, n in 0u64..5,
    ) {
        let release = Version::parse(&format!("{a}.{b}.{c}")).expect("version");
        let pre = Version::parse(&format!("{a}.{b}.{c}-rc.{n}")).expect("version");
        prop_assert!(pre < release);
    }
}

#[test]
fn exclusion_kind_mismatch_keeps_entry_active() {
    let baseline = ModuleModel {
        name: "Prop.dll".to_string(),
        types: vec![TypeDescriptor::new(TypeName::new("Acme", "Widget"))
            .with_member(field("Size", TypeRef::primitive(Primitive::Int32)))],
    };
    let candidate = ModuleModel {
        name: "Prop.dll".to_string(),
        types: vec![TypeDescriptor::new(TypeName::new("Acme", "Widget"))],
    };
    let set = ExclusionSet::from_entries(
        vec![ExclusionEntry::new(ElementKind::Method, "Acme.Widget::Size")],
        "1.0.0",
    );
    let report = evaluate(&baseline, &candidate, &set).expect("valid");
    assert_eq!(report.verdict, Verdict::Fail);
}
