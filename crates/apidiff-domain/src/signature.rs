//! Canonical signatures: the matching key for the comparator and the lookup key for exclusions.
//!
//! Format (version [`SIGNATURE_FORMAT`]):
//! - type: `Namespace.Name` plus `` `N `` when generic; no assembly qualifier
//! - method: `Namespace.Type::Name(P1,P2)` plus ``` ``N ``` when generic
//! - field / event: `Namespace.Type::Name`
//! - property: `Namespace.Type::Name`, plus `(P1,P2)` for indexers
//!
//! Parameter types render as IL keywords for primitives, `T[]` / `T[,]` for arrays, `T&` for
//! by-ref, `T*` for pointers, `Def`N<A1,A2>` for instantiations and `!N` / `!!N` for type and
//! method generic parameters.
//!
//! Exclusion files are authored against this exact text. Any change here must bump
//! [`SIGNATURE_FORMAT`].

use crate::model::{
    GenericOwner, MemberDescriptor, MethodDescriptor, Primitive, TypeName, TypeRef,
};

pub const SIGNATURE_FORMAT: u32 = 1;

pub fn type_signature(name: &TypeName) -> String {
    let mut out = String::new();
    push_type_name(&mut out, name);
    out
}

pub fn type_ref_signature(r: &TypeRef) -> String {
    let mut out = String::new();
    push_type_ref(&mut out, r);
    out
}

/// Canonical signature of `member` declared on `owner`.
pub fn member_signature(owner: &TypeName, member: &MemberDescriptor) -> String {
    let mut out = type_signature(owner);
    out.push_str("::");
    out.push_str(member.name());

    match member {
        MemberDescriptor::Method(m) => {
            push_parameter_list(&mut out, &m.parameters);
            if m.generic_arity > 0 {
                out.push_str("``");
                out.push_str(&m.generic_arity.to_string());
            }
            if is_conversion_operator(m) {
                out.push_str("->");
                push_type_ref(&mut out, &m.return_type);
            }
        }
        MemberDescriptor::Property(p) if !p.parameters.is_empty() => {
            push_parameter_list(&mut out, &p.parameters);
        }
        MemberDescriptor::Property(_) | MemberDescriptor::Field(_) | MemberDescriptor::Event(_) => {}
    }

    out
}

// Conversion operators are the only members the runtime overloads on return type alone.
fn is_conversion_operator(m: &MethodDescriptor) -> bool {
    m.name == "op_Implicit" || m.name == "op_Explicit"
}

fn push_type_name(out: &mut String, name: &TypeName) {
    if !name.namespace.is_empty() {
        out.push_str(&name.namespace);
        out.push('.');
    }
    out.push_str(&name.name);
    if name.arity > 0 {
        out.push('`');
        out.push_str(&name.arity.to_string());
    }
}

fn push_parameter_list(out: &mut String, parameters: &[TypeRef]) {
    out.push('(');
    for (i, p) in parameters.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_type_ref(out, p);
    }
    out.push(')');
}

fn push_type_ref(out: &mut String, r: &TypeRef) {
    match r {
        TypeRef::Primitive { name } => out.push_str(primitive_keyword(*name)),
        TypeRef::Named(name) => push_type_name(out, name),
        TypeRef::GenericInstance {
            definition,
            arguments,
        } => {
            push_type_name(out, definition);
            out.push('<');
            for (i, a) in arguments.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_type_ref(out, a);
            }
            out.push('>');
        }
        TypeRef::Array { element, rank } => {
            push_type_ref(out, element);
            out.push('[');
            for _ in 1..*rank {
                out.push(',');
            }
            out.push(']');
        }
        TypeRef::ByRef { element } => {
            push_type_ref(out, element);
            out.push('&');
        }
        TypeRef::Pointer { element } => {
            push_type_ref(out, element);
            out.push('*');
        }
        TypeRef::GenericParameter { owner, position } => {
            out.push_str(match owner {
                GenericOwner::Type => "!",
                GenericOwner::Method => "!!",
            });
            out.push_str(&position.to_string());
        }
    }
}

fn primitive_keyword(p: Primitive) -> &'static str {
    match p {
        Primitive::Void => "void",
        Primitive::Bool => "bool",
        Primitive::Char => "char",
        Primitive::Int8 => "int8",
        Primitive::Uint8 => "uint8",
        Primitive::Int16 => "int16",
        Primitive::Uint16 => "uint16",
        Primitive::Int32 => "int32",
        Primitive::Uint32 => "uint32",
        Primitive::Int64 => "int64",
        Primitive::Uint64 => "uint64",
        Primitive::Float32 => "float32",
        Primitive::Float64 => "float64",
        Primitive::String => "string",
        Primitive::Object => "object",
        Primitive::NativeInt => "native int",
        Primitive::NativeUint => "native uint",
        Primitive::Typedref => "typedref",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{event, field, indexer, int32, method, prim, property, string};

    fn widget() -> TypeName {
        TypeName::new("Acme", "Widget")
    }

    #[test]
    fn type_signature_omits_assembly_scope_and_adds_arity() {
        let mut name = TypeName::generic("Acme.Collections", "Bag", 2);
        name.scope = Some("Acme.Core, Version=1.0.0.0".to_string());
        assert_eq!(type_signature(&name), "Acme.Collections.Bag`2");
        assert_eq!(type_signature(&TypeName::new("", "Program")), "Program");
        assert_eq!(
            type_signature(&TypeName::new("Acme", "Outer/Inner")),
            "Acme.Outer/Inner"
        );
    }

    #[test]
    fn method_signature_uses_parameter_types_not_return_type() {
        let close = method("Close", vec![int32()]);
        assert_eq!(member_signature(&widget(), &close), "Acme.Widget::Close(int32)");

        let open = method("Open", vec![]);
        assert_eq!(member_signature(&widget(), &open), "Acme.Widget::Open()");

        let returning = MemberDescriptor::Method(MethodDescriptor {
            name: "Close".to_string(),
            parameters: vec![int32()],
            generic_arity: 0,
            return_type: prim(Primitive::Bool),
            is_static: true,
        });
        assert_eq!(
            member_signature(&widget(), &returning),
            member_signature(&widget(), &close)
        );
    }

    #[test]
    fn compound_parameter_types_render_recursively() {
        let list_of_t = TypeRef::GenericInstance {
            definition: TypeName::generic("System.Collections.Generic", "List", 1),
            arguments: vec![TypeRef::GenericParameter {
                owner: GenericOwner::Method,
                position: 0,
            }],
        };
        let matrix = TypeRef::Array {
            element: Box::new(prim(Primitive::Float64)),
            rank: 2,
        };
        let out_int = TypeRef::by_ref(int32());
        let ptr = TypeRef::Pointer {
            element: Box::new(prim(Primitive::NativeInt)),
        };

        let m = MemberDescriptor::Method(MethodDescriptor {
            name: "Fill".to_string(),
            parameters: vec![list_of_t, matrix, out_int, ptr, TypeRef::array(string())],
            generic_arity: 1,
            return_type: TypeRef::void(),
            is_static: false,
        });

        assert_eq!(
            member_signature(&widget(), &m),
            "Acme.Widget::Fill(System.Collections.Generic.List`1<!!0>,float64[,],int32&,native int*,string[])``1"
        );
    }

    #[test]
    fn conversion_operators_keep_return_type_in_identity() {
        let to_int = method_returning_static("op_Explicit", int32());
        let to_string = method_returning_static("op_Explicit", string());
        let a = member_signature(&widget(), &to_int);
        let b = member_signature(&widget(), &to_string);
        assert_eq!(a, "Acme.Widget::op_Explicit(Acme.Widget)->int32");
        assert_ne!(a, b);
    }

    fn method_returning_static(name: &str, ret: TypeRef) -> MemberDescriptor {
        MemberDescriptor::Method(MethodDescriptor {
            name: name.to_string(),
            parameters: vec![TypeRef::named("Acme", "Widget")],
            generic_arity: 0,
            return_type: ret,
            is_static: true,
        })
    }

    #[test]
    fn field_property_event_and_indexer_signatures() {
        assert_eq!(
            member_signature(&widget(), &field("Tag", string())),
            "Acme.Widget::Tag"
        );
        assert_eq!(
            member_signature(&widget(), &property("Size", int32())),
            "Acme.Widget::Size"
        );
        assert_eq!(
            member_signature(&widget(), &indexer("Item", string(), vec![int32(), string()])),
            "Acme.Widget::Item(int32,string)"
        );
        assert_eq!(
            member_signature(&widget(), &event("Opened", TypeRef::named("System", "EventHandler"))),
            "Acme.Widget::Opened"
        );
    }

    #[test]
    fn overloads_produce_distinct_signatures() {
        let a = member_signature(&widget(), &method("F", vec![int32()]));
        let b = member_signature(&widget(), &method("F", vec![string()]));
        let c = member_signature(&widget(), &method("F", vec![int32(), int32()]));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }
}
