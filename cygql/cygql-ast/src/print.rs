//! SDL printing through the [graphql_parser] formatter.
//!
//! Nodes are converted to their [graphql_parser::schema] counterparts and
//! printed by its `Display`: two-space indentation, a blank line between
//! definitions and arguments on one line. Single nodes print without the
//! trailing newline.

use std::fmt::{self, Display, Formatter};

use graphql_parser::{Pos, schema as gql};

use crate::ast::{
    Definition, Directive, DirectiveDefinition, Document, EnumValueDefinition, FieldDefinition,
    InputValueDefinition, OperationKind, SchemaDefinition, Type, TypeDefinition, TypeKind, Value,
};

type GqlDocument = gql::Document<'static, String>;

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let document = GqlDocument {
            definitions: self.definitions.iter().map(definition).collect(),
        };
        document.fmt(f)
    }
}

impl Display for TypeDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let document = GqlDocument {
            definitions: vec![type_definition(self)],
        };
        f.write_str(document.to_string().trim_end())
    }
}

impl Display for DirectiveDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let document = GqlDocument {
            definitions: vec![gql::Definition::DirectiveDefinition(directive_definition(
                self,
            ))],
        };
        f.write_str(document.to_string().trim_end())
    }
}

impl Display for FieldDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(field(self).to_string().trim_end())
    }
}

impl Display for InputValueDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(input_value(self).to_string().trim_end())
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        value_type(self).fmt(f)
    }
}

fn definition(definition: &Definition) -> gql::Definition<'static, String> {
    match definition {
        Definition::Schema(schema) => gql::Definition::SchemaDefinition(schema_definition(schema)),
        Definition::Type(type_def) => type_definition(type_def),
        Definition::Directive(directive_def) => {
            gql::Definition::DirectiveDefinition(directive_definition(directive_def))
        }
    }
}

fn schema_definition(schema: &SchemaDefinition) -> gql::SchemaDefinition<'static, String> {
    let type_name = |kind: OperationKind| {
        schema
            .operations
            .iter()
            .find(|operation| operation.kind == kind)
            .map(|operation| operation.type_name.clone())
    };

    gql::SchemaDefinition {
        position: Pos::default(),
        directives: directives(&schema.directives),
        query: type_name(OperationKind::Query),
        mutation: type_name(OperationKind::Mutation),
        subscription: type_name(OperationKind::Subscription),
    }
}

/// A type definition, or a type extension when `extend` is set
fn type_definition(type_def: &TypeDefinition) -> gql::Definition<'static, String> {
    let position = Pos::default();
    let name = type_def.name.clone();
    let directives = directives(&type_def.directives);

    if type_def.extend {
        return gql::Definition::TypeExtension(match &type_def.kind {
            TypeKind::Scalar => gql::TypeExtension::Scalar(gql::ScalarTypeExtension {
                position,
                name,
                directives,
            }),
            TypeKind::Object(object) => gql::TypeExtension::Object(gql::ObjectTypeExtension {
                position,
                name,
                implements_interfaces: object.implements.clone(),
                directives,
                fields: object.fields.iter().map(field).collect(),
            }),
            TypeKind::Interface(object) => {
                gql::TypeExtension::Interface(gql::InterfaceTypeExtension {
                    position,
                    name,
                    implements_interfaces: object.implements.clone(),
                    directives,
                    fields: object.fields.iter().map(field).collect(),
                })
            }
            TypeKind::Union(union) => gql::TypeExtension::Union(gql::UnionTypeExtension {
                position,
                name,
                directives,
                types: union.members.clone(),
            }),
            TypeKind::Enum(enum_type) => gql::TypeExtension::Enum(gql::EnumTypeExtension {
                position,
                name,
                directives,
                values: enum_type.values.iter().map(enum_value).collect(),
            }),
            TypeKind::InputObject(input) => {
                gql::TypeExtension::InputObject(gql::InputObjectTypeExtension {
                    position,
                    name,
                    directives,
                    fields: input.fields.iter().map(input_value).collect(),
                })
            }
        });
    }

    let description = type_def.description.clone();
    gql::Definition::TypeDefinition(match &type_def.kind {
        TypeKind::Scalar => gql::TypeDefinition::Scalar(gql::ScalarType {
            position,
            description,
            name,
            directives,
        }),
        TypeKind::Object(object) => gql::TypeDefinition::Object(gql::ObjectType {
            position,
            description,
            name,
            implements_interfaces: object.implements.clone(),
            directives,
            fields: object.fields.iter().map(field).collect(),
        }),
        TypeKind::Interface(object) => gql::TypeDefinition::Interface(gql::InterfaceType {
            position,
            description,
            name,
            implements_interfaces: object.implements.clone(),
            directives,
            fields: object.fields.iter().map(field).collect(),
        }),
        TypeKind::Union(union) => gql::TypeDefinition::Union(gql::UnionType {
            position,
            description,
            name,
            directives,
            types: union.members.clone(),
        }),
        TypeKind::Enum(enum_type) => gql::TypeDefinition::Enum(gql::EnumType {
            position,
            description,
            name,
            directives,
            values: enum_type.values.iter().map(enum_value).collect(),
        }),
        TypeKind::InputObject(input) => gql::TypeDefinition::InputObject(gql::InputObjectType {
            position,
            description,
            name,
            directives,
            fields: input.fields.iter().map(input_value).collect(),
        }),
    })
}

fn field(field: &FieldDefinition) -> gql::Field<'static, String> {
    gql::Field {
        position: Pos::default(),
        description: field.description.clone(),
        name: field.name.clone(),
        arguments: field.arguments.iter().map(input_value).collect(),
        field_type: value_type(&field.ty),
        directives: directives(&field.directives),
    }
}

fn input_value(input_value: &InputValueDefinition) -> gql::InputValue<'static, String> {
    gql::InputValue {
        position: Pos::default(),
        description: input_value.description.clone(),
        name: input_value.name.clone(),
        value_type: value_type(&input_value.ty),
        default_value: input_value.default_value.as_ref().map(value),
        directives: directives(&input_value.directives),
    }
}

fn enum_value(enum_value: &EnumValueDefinition) -> gql::EnumValue<'static, String> {
    gql::EnumValue {
        position: Pos::default(),
        description: enum_value.description.clone(),
        name: enum_value.name.clone(),
        directives: directives(&enum_value.directives),
    }
}

fn directive_definition(
    directive_def: &DirectiveDefinition,
) -> gql::DirectiveDefinition<'static, String> {
    gql::DirectiveDefinition {
        position: Pos::default(),
        description: directive_def.description.clone(),
        name: directive_def.name.clone(),
        arguments: directive_def.arguments.iter().map(input_value).collect(),
        repeatable: directive_def.repeatable,
        locations: directive_def
            .locations
            .iter()
            .filter_map(|location| location.as_str().parse().ok())
            .collect(),
    }
}

fn directives(directives: &[Directive]) -> Vec<gql::Directive<'static, String>> {
    directives
        .iter()
        .map(|directive| gql::Directive {
            position: Pos::default(),
            name: directive.name.clone(),
            arguments: directive
                .arguments
                .iter()
                .map(|argument| (argument.name.clone(), value(&argument.value)))
                .collect(),
        })
        .collect()
}

fn value_type(ty: &Type) -> gql::Type<'static, String> {
    match ty {
        Type::Named(name) => gql::Type::NamedType(name.clone()),
        Type::List(inner) => gql::Type::ListType(Box::new(value_type(inner))),
        Type::NonNull(inner) => gql::Type::NonNullType(Box::new(value_type(inner))),
    }
}

fn value(value: &Value) -> gql::Value<'static, String> {
    match value {
        Value::Null => gql::Value::Null,
        // the formatter only builds numbers from i32
        Value::Int(int) => match i32::try_from(*int) {
            Ok(int) => gql::Value::Int(int.into()),
            Err(_) => gql::Value::Float(*int as f64),
        },
        Value::Float(float) => gql::Value::Float(*float),
        Value::String(string) => gql::Value::String(string.clone()),
        Value::Boolean(boolean) => gql::Value::Boolean(*boolean),
        Value::Enum(name) => gql::Value::Enum(name.clone()),
        Value::List(items) => gql::Value::List(items.iter().map(self::value).collect()),
        Value::Object(fields) => gql::Value::Object(
            fields
                .iter()
                .map(|(name, field_value)| (name.clone(), self::value(field_value)))
                .collect(),
        ),
    }
}
