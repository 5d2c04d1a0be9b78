use crate::model::{
    EventDescriptor, FieldDescriptor, MemberDescriptor, MethodDescriptor, ModuleModel, Primitive,
    PropertyDescriptor, TypeDescriptor, TypeName, TypeRef,
};

pub fn prim(p: Primitive) -> TypeRef {
    TypeRef::primitive(p)
}

pub fn int32() -> TypeRef {
    prim(Primitive::Int32)
}

pub fn string() -> TypeRef {
    prim(Primitive::String)
}

pub fn method(name: &str, parameters: Vec<TypeRef>) -> MemberDescriptor {
    MemberDescriptor::Method(MethodDescriptor {
        name: name.to_string(),
        parameters,
        generic_arity: 0,
        return_type: TypeRef::void(),
        is_static: false,
    })
}

pub fn method_returning(name: &str, parameters: Vec<TypeRef>, ret: TypeRef) -> MemberDescriptor {
    MemberDescriptor::Method(MethodDescriptor {
        name: name.to_string(),
        parameters,
        generic_arity: 0,
        return_type: ret,
        is_static: false,
    })
}

pub fn field(name: &str, field_type: TypeRef) -> MemberDescriptor {
    MemberDescriptor::Field(FieldDescriptor {
        name: name.to_string(),
        field_type,
    })
}

pub fn property(name: &str, property_type: TypeRef) -> MemberDescriptor {
    MemberDescriptor::Property(PropertyDescriptor {
        name: name.to_string(),
        property_type,
        parameters: Vec::new(),
    })
}

pub fn indexer(name: &str, property_type: TypeRef, parameters: Vec<TypeRef>) -> MemberDescriptor {
    MemberDescriptor::Property(PropertyDescriptor {
        name: name.to_string(),
        property_type,
        parameters,
    })
}

pub fn event(name: &str, handler_type: TypeRef) -> MemberDescriptor {
    MemberDescriptor::Event(EventDescriptor {
        name: name.to_string(),
        handler_type,
    })
}

pub fn ty(namespace: &str, name: &str, members: Vec<MemberDescriptor>) -> TypeDescriptor {
    TypeDescriptor {
        type_name: TypeName::new(namespace, name),
        members,
    }
}

pub fn module(types: Vec<TypeDescriptor>) -> ModuleModel {
    ModuleModel {
        name: "Test.dll".to_string(),
        types,
    }
}
