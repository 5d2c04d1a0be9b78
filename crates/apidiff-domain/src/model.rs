//! Immutable description of a module's public surface, as produced by a module reader.

use apidiff_types::ElementKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Input-contract violations. The reader is expected to hand over fully resolved,
/// well-formed descriptors; anything else stops the run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("module {module}: type {signature} is declared more than once")]
    DuplicateType { module: String, signature: String },
    #[error("module {module}: type with empty name in namespace '{namespace}'")]
    UnnamedType { module: String, namespace: String },
    #[error("module {module}: {kind} with empty name in {owner}")]
    UnnamedMember {
        module: String,
        owner: String,
        kind: ElementKind,
    },
    #[error("module {module}: {kind} {signature} is declared more than once")]
    DuplicateMember {
        module: String,
        kind: ElementKind,
        signature: String,
    },
    #[error("module {module}: array of rank 0 in {owner}")]
    ZeroRankArray { module: String, owner: String },
}

/// Name of a type definition or reference.
///
/// `scope` is the defining assembly as reported by the reader. It is informational and never part
/// of the type's identity, so a type that moves between assemblies still matches.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    #[serde(default)]
    pub namespace: String,
    /// Simple name; nested types are written `Outer/Inner`.
    pub name: String,
    #[serde(default)]
    pub arity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TypeName {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            arity: 0,
            scope: None,
        }
    }

    pub fn generic(namespace: &str, name: &str, arity: u32) -> Self {
        Self {
            arity,
            ..Self::new(namespace, name)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Void,
    Bool,
    Char,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
    String,
    Object,
    NativeInt,
    NativeUint,
    Typedref,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericOwner {
    Type,
    Method,
}

/// A reference to a type as it appears in a signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Primitive {
        name: Primitive,
    },
    Named(TypeName),
    GenericInstance {
        definition: TypeName,
        arguments: Vec<TypeRef>,
    },
    Array {
        element: Box<TypeRef>,
        #[serde(default = "default_rank")]
        rank: u32,
    },
    ByRef {
        element: Box<TypeRef>,
    },
    Pointer {
        element: Box<TypeRef>,
    },
    GenericParameter {
        owner: GenericOwner,
        position: u32,
    },
}

fn default_rank() -> u32 {
    1
}

impl TypeRef {
    pub fn primitive(name: Primitive) -> Self {
        TypeRef::Primitive { name }
    }

    pub fn void() -> Self {
        Self::primitive(Primitive::Void)
    }

    pub fn named(namespace: &str, name: &str) -> Self {
        TypeRef::Named(TypeName::new(namespace, name))
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    pub fn by_ref(element: TypeRef) -> Self {
        TypeRef::ByRef {
            element: Box::new(element),
        }
    }

    fn has_zero_rank(&self) -> bool {
        match self {
            TypeRef::Array { rank: 0, .. } => true,
            TypeRef::Array { element, .. }
            | TypeRef::ByRef { element }
            | TypeRef::Pointer { element } => element.has_zero_rank(),
            TypeRef::GenericInstance { arguments, .. } => {
                arguments.iter().any(TypeRef::has_zero_rank)
            }
            TypeRef::Primitive { .. } | TypeRef::Named(_) | TypeRef::GenericParameter { .. } => {
                false
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    #[serde(default)]
    pub generic_arity: u32,
    #[serde(default = "TypeRef::void")]
    pub return_type: TypeRef,
    #[serde(default)]
    pub is_static: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: TypeRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub property_type: TypeRef,
    /// Indexer parameters; empty for plain properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<TypeRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub name: String,
    pub handler_type: TypeRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum MemberDescriptor {
    Method(MethodDescriptor),
    Field(FieldDescriptor),
    Property(PropertyDescriptor),
    Event(EventDescriptor),
}

impl MemberDescriptor {
    pub fn kind(&self) -> ElementKind {
        match self {
            MemberDescriptor::Method(_) => ElementKind::Method,
            MemberDescriptor::Field(_) => ElementKind::Field,
            MemberDescriptor::Property(_) => ElementKind::Property,
            MemberDescriptor::Event(_) => ElementKind::Event,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MemberDescriptor::Method(m) => &m.name,
            MemberDescriptor::Field(f) => &f.name,
            MemberDescriptor::Property(p) => &p.name,
            MemberDescriptor::Event(e) => &e.name,
        }
    }

    fn type_refs(&self) -> Vec<&TypeRef> {
        match self {
            MemberDescriptor::Method(m) => m
                .parameters
                .iter()
                .chain(std::iter::once(&m.return_type))
                .collect(),
            MemberDescriptor::Field(f) => vec![&f.field_type],
            MemberDescriptor::Property(p) => p
                .parameters
                .iter()
                .chain(std::iter::once(&p.property_type))
                .collect(),
            MemberDescriptor::Event(e) => vec![&e.handler_type],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    #[serde(flatten)]
    pub type_name: TypeName,
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
}

impl TypeDescriptor {
    pub fn new(type_name: TypeName) -> Self {
        Self {
            type_name,
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    /// Canonical type signature, also used as the grouping key in reports.
    pub fn full_name(&self) -> String {
        crate::signature::type_signature(&self.type_name)
    }
}

/// One module's public surface. Types keep the reader's declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleModel {
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

impl ModuleModel {
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            types: Vec::new(),
        }
    }

    /// Check the reader's contract: named elements, unique type and member identities (per
    /// category within a type), well-formed arrays.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for ty in &self.types {
            if ty.type_name.name.is_empty() {
                return Err(ModelError::UnnamedType {
                    module: self.name.clone(),
                    namespace: ty.type_name.namespace.clone(),
                });
            }

            let signature = ty.full_name();
            let mut members_seen = HashSet::new();
            for member in &ty.members {
                if member.name().is_empty() {
                    return Err(ModelError::UnnamedMember {
                        module: self.name.clone(),
                        owner: signature.clone(),
                        kind: member.kind(),
                    });
                }
                if member.type_refs().into_iter().any(TypeRef::has_zero_rank) {
                    return Err(ModelError::ZeroRankArray {
                        module: self.name.clone(),
                        owner: signature.clone(),
                    });
                }

                let member_signature = crate::signature::member_signature(&ty.type_name, member);
                if !members_seen.insert((member.kind(), member_signature.clone())) {
                    return Err(ModelError::DuplicateMember {
                        module: self.name.clone(),
                        kind: member.kind(),
                        signature: member_signature,
                    });
                }
            }

            if !seen.insert(signature.clone()) {
                return Err(ModelError::DuplicateType {
                    module: self.name.clone(),
                    signature,
                });
            }
        }
        Ok(())
    }
}
