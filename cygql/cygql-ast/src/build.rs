//! Factory functions for AST fragments.
//!
//! Every builder takes a descriptor whose optional parts default to empty,
//! so generators only spell out what differs from a bare definition.

use thin_vec::ThinVec;

use crate::ast::{
    Argument, Definition, Directive, DirectiveDefinition, DirectiveLocation, Document, EnumType,
    EnumValueDefinition, FieldDefinition, InputObjectType, InputValueDefinition, ObjectType, Type,
    TypeDefinition, TypeKind, Value, Wrappers,
};

pub fn build_document(definitions: impl IntoIterator<Item = Definition>) -> Document {
    Document {
        definitions: definitions.into_iter().collect(),
    }
}

pub fn build_directive(name: &str, arguments: impl IntoIterator<Item = Argument>) -> Directive {
    Directive {
        name: name.to_string(),
        arguments: arguments.into_iter().collect(),
    }
}

pub fn build_directive_argument(name: &str, value: Value) -> Argument {
    Argument {
        name: name.to_string(),
        value,
    }
}

/// Wrap a type name according to `wrappers`.
///
/// Non-null goes around the name first, then the list, then non-null around
/// the list. That produces exactly the six valid shapes:
/// `T`, `T!`, `[T]`, `[T!]`, `[T]!` and `[T!]!`.
pub fn build_named_type(name: &str, wrappers: Wrappers) -> Type {
    let mut ty = Type::Named(name.to_string());

    if wrappers.contains(Wrappers::NON_NULL_NAMED) {
        ty = Type::NonNull(Box::new(ty));
    }

    if wrappers.contains(Wrappers::LIST) {
        ty = Type::List(Box::new(ty));

        if wrappers.contains(Wrappers::NON_NULL_LIST) {
            ty = Type::NonNull(Box::new(ty));
        }
    }

    ty
}

#[derive(Default)]
pub struct ObjectTypeDesc {
    pub name: String,
    pub description: Option<String>,
    pub implements: Vec<String>,
    pub fields: Vec<FieldDefinition>,
    pub directives: ThinVec<Directive>,
    pub extend: bool,
}

pub fn build_object_type(desc: ObjectTypeDesc) -> TypeDefinition {
    TypeDefinition {
        extend: desc.extend,
        description: desc.description,
        name: desc.name,
        directives: desc.directives,
        kind: TypeKind::Object(ObjectType {
            implements: desc.implements,
            fields: desc.fields,
        }),
    }
}

pub struct FieldDesc {
    pub name: String,
    pub ty: Type,
    pub description: Option<String>,
    pub arguments: ThinVec<InputValueDefinition>,
    pub directives: ThinVec<Directive>,
}

impl FieldDesc {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            arguments: ThinVec::new(),
            directives: ThinVec::new(),
        }
    }
}

pub fn build_field(desc: FieldDesc) -> FieldDefinition {
    FieldDefinition {
        description: desc.description,
        name: desc.name,
        arguments: desc.arguments,
        ty: desc.ty,
        directives: desc.directives,
    }
}

pub struct InputValueDesc {
    pub name: String,
    pub ty: Type,
    pub description: Option<String>,
    pub default_value: Option<Value>,
    pub directives: ThinVec<Directive>,
}

impl InputValueDesc {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            default_value: None,
            directives: ThinVec::new(),
        }
    }
}

pub fn build_input_value(desc: InputValueDesc) -> InputValueDefinition {
    InputValueDefinition {
        description: desc.description,
        name: desc.name,
        ty: desc.ty,
        default_value: desc.default_value,
        directives: desc.directives,
    }
}

#[derive(Default)]
pub struct EnumTypeDesc {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValueDefinition>,
    pub directives: ThinVec<Directive>,
}

pub fn build_enum_type(desc: EnumTypeDesc) -> TypeDefinition {
    TypeDefinition {
        extend: false,
        description: desc.description,
        name: desc.name,
        directives: desc.directives,
        kind: TypeKind::Enum(EnumType {
            values: desc.values,
        }),
    }
}

pub fn build_enum_value(name: impl Into<String>) -> EnumValueDefinition {
    EnumValueDefinition {
        description: None,
        name: name.into(),
        directives: ThinVec::new(),
    }
}

#[derive(Default)]
pub struct InputObjectTypeDesc {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<InputValueDefinition>,
    pub directives: ThinVec<Directive>,
}

pub fn build_input_object_type(desc: InputObjectTypeDesc) -> TypeDefinition {
    TypeDefinition {
        extend: false,
        description: desc.description,
        name: desc.name,
        directives: desc.directives,
        kind: TypeKind::InputObject(InputObjectType {
            fields: desc.fields,
        }),
    }
}

#[derive(Default)]
pub struct DirectiveDefinitionDesc {
    pub name: String,
    pub description: Option<String>,
    pub arguments: ThinVec<InputValueDefinition>,
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
}

pub fn build_directive_definition(desc: DirectiveDefinitionDesc) -> DirectiveDefinition {
    DirectiveDefinition {
        description: desc.description,
        name: desc.name,
        arguments: desc.arguments,
        repeatable: desc.repeatable,
        locations: desc.locations,
    }
}

/// Shorthand for a list of strings, as used by scope and label arguments
pub fn string_list_value<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> Value {
    Value::List(
        items
            .into_iter()
            .map(|item| Value::String(item.as_ref().to_string()))
            .collect(),
    )
}
