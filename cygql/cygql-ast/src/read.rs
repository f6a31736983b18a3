//! Conversion of [graphql_parser::schema] nodes into the document model.

use graphql_parser::schema as gql;
use thin_vec::ThinVec;
use tracing::{trace, trace_span};

use crate::{ast::*, error::ParseError};

/// Type wrapper and constant value nesting accepted in a document
pub const MAX_DEPTH: usize = 64;

pub(crate) fn read_document(document: gql::Document<'_, String>) -> Result<Document, ParseError> {
    let definitions = document
        .definitions
        .into_iter()
        .map(read_definition)
        .collect::<Result<_, _>>()?;

    Ok(Document { definitions })
}

fn read_definition(definition: gql::Definition<'_, String>) -> Result<Definition, ParseError> {
    Ok(match definition {
        gql::Definition::SchemaDefinition(schema) => Definition::Schema(read_schema(schema)?),
        gql::Definition::TypeDefinition(type_def) => {
            Definition::Type(read_type_definition(type_def)?)
        }
        gql::Definition::TypeExtension(extension) => {
            Definition::Type(read_type_extension(extension)?)
        }
        gql::Definition::DirectiveDefinition(directive_def) => {
            Definition::Directive(read_directive_definition(directive_def)?)
        }
    })
}

fn read_schema(schema: gql::SchemaDefinition<'_, String>) -> Result<SchemaDefinition, ParseError> {
    let operations = [
        (OperationKind::Query, schema.query),
        (OperationKind::Mutation, schema.mutation),
        (OperationKind::Subscription, schema.subscription),
    ]
    .into_iter()
    .filter_map(|(kind, type_name)| Some(RootOperation { kind, type_name: type_name? }))
    .collect();

    Ok(SchemaDefinition {
        directives: read_directives(schema.directives)?,
        operations,
    })
}

fn read_type_definition(
    type_def: gql::TypeDefinition<'_, String>,
) -> Result<TypeDefinition, ParseError> {
    let (description, name, directives, kind) = match type_def {
        gql::TypeDefinition::Scalar(scalar) => {
            (scalar.description, scalar.name, scalar.directives, TypeKind::Scalar)
        }
        gql::TypeDefinition::Object(object) => {
            let kind = TypeKind::Object(read_object(object.implements_interfaces, object.fields)?);
            (object.description, object.name, object.directives, kind)
        }
        gql::TypeDefinition::Interface(interface) => {
            let kind =
                TypeKind::Interface(read_object(interface.implements_interfaces, interface.fields)?);
            (interface.description, interface.name, interface.directives, kind)
        }
        gql::TypeDefinition::Union(union) => {
            let kind = TypeKind::Union(UnionType {
                members: union.types,
            });
            (union.description, union.name, union.directives, kind)
        }
        gql::TypeDefinition::Enum(enum_type) => {
            let kind = TypeKind::Enum(read_enum(enum_type.values)?);
            (enum_type.description, enum_type.name, enum_type.directives, kind)
        }
        gql::TypeDefinition::InputObject(input) => {
            let kind = TypeKind::InputObject(InputObjectType {
                fields: read_input_values(input.fields)?.into_iter().collect(),
            });
            (input.description, input.name, input.directives, kind)
        }
    };

    build_type_definition(false, description, name, directives, kind)
}

fn read_type_extension(
    extension: gql::TypeExtension<'_, String>,
) -> Result<TypeDefinition, ParseError> {
    let (name, directives, kind) = match extension {
        gql::TypeExtension::Scalar(scalar) => (scalar.name, scalar.directives, TypeKind::Scalar),
        gql::TypeExtension::Object(object) => {
            let kind = TypeKind::Object(read_object(object.implements_interfaces, object.fields)?);
            (object.name, object.directives, kind)
        }
        gql::TypeExtension::Interface(interface) => {
            let kind =
                TypeKind::Interface(read_object(interface.implements_interfaces, interface.fields)?);
            (interface.name, interface.directives, kind)
        }
        gql::TypeExtension::Union(union) => {
            let kind = TypeKind::Union(UnionType {
                members: union.types,
            });
            (union.name, union.directives, kind)
        }
        gql::TypeExtension::Enum(enum_type) => {
            let kind = TypeKind::Enum(read_enum(enum_type.values)?);
            (enum_type.name, enum_type.directives, kind)
        }
        gql::TypeExtension::InputObject(input) => {
            let kind = TypeKind::InputObject(InputObjectType {
                fields: read_input_values(input.fields)?.into_iter().collect(),
            });
            (input.name, input.directives, kind)
        }
    };

    build_type_definition(true, None, name, directives, kind)
}

fn build_type_definition(
    extend: bool,
    description: Option<String>,
    name: String,
    directives: Vec<gql::Directive<'_, String>>,
    kind: TypeKind,
) -> Result<TypeDefinition, ParseError> {
    let type_def = TypeDefinition {
        extend,
        description,
        name,
        directives: read_directives(directives)?,
        kind,
    };
    trace!(
        "read {}{} `{}`",
        if extend { "extend " } else { "" },
        type_def.keyword(),
        type_def.name
    );

    Ok(type_def)
}

fn read_object(
    implements: Vec<String>,
    fields: Vec<gql::Field<'_, String>>,
) -> Result<ObjectType, ParseError> {
    let fields = fields
        .into_iter()
        .map(|field| {
            let _entered = trace_span!("field", name = %field.name).entered();
            Ok(FieldDefinition {
                description: field.description,
                name: field.name,
                arguments: read_input_values(field.arguments)?,
                ty: read_type(field.field_type, 0)?,
                directives: read_directives(field.directives)?,
            })
        })
        .collect::<Result<_, ParseError>>()?;

    Ok(ObjectType { implements, fields })
}

fn read_enum(values: Vec<gql::EnumValue<'_, String>>) -> Result<EnumType, ParseError> {
    let values = values
        .into_iter()
        .map(|value| {
            Ok(EnumValueDefinition {
                description: value.description,
                name: value.name,
                directives: read_directives(value.directives)?,
            })
        })
        .collect::<Result<_, ParseError>>()?;

    Ok(EnumType { values })
}

fn read_input_values(
    input_values: Vec<gql::InputValue<'_, String>>,
) -> Result<ThinVec<InputValueDefinition>, ParseError> {
    input_values
        .into_iter()
        .map(|input_value| {
            Ok(InputValueDefinition {
                description: input_value.description,
                name: input_value.name,
                ty: read_type(input_value.value_type, 0)?,
                default_value: input_value
                    .default_value
                    .map(|value| read_value(value, 0))
                    .transpose()?,
                directives: read_directives(input_value.directives)?,
            })
        })
        .collect()
}

fn read_directive_definition(
    directive_def: gql::DirectiveDefinition<'_, String>,
) -> Result<DirectiveDefinition, ParseError> {
    trace!("read directive @{}", directive_def.name);

    Ok(DirectiveDefinition {
        description: directive_def.description,
        name: directive_def.name,
        arguments: read_input_values(directive_def.arguments)?,
        repeatable: directive_def.repeatable,
        locations: directive_def
            .locations
            .iter()
            .filter_map(|location| DirectiveLocation::from_name(location.as_str()))
            .collect(),
    })
}

fn read_directives(
    directives: Vec<gql::Directive<'_, String>>,
) -> Result<ThinVec<Directive>, ParseError> {
    directives
        .into_iter()
        .map(|directive| {
            let arguments = directive
                .arguments
                .into_iter()
                .map(|(name, value)| {
                    Ok(Argument {
                        name,
                        value: read_value(value, 0)?,
                    })
                })
                .collect::<Result<_, ParseError>>()?;

            Ok(Directive {
                name: directive.name,
                arguments,
            })
        })
        .collect()
}

fn read_type(ty: gql::Type<'_, String>, depth: usize) -> Result<Type, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::DepthLimitExceeded(MAX_DEPTH));
    }

    Ok(match ty {
        gql::Type::NamedType(name) => Type::Named(name),
        gql::Type::ListType(inner) => Type::List(Box::new(read_type(*inner, depth + 1)?)),
        gql::Type::NonNullType(inner) => Type::NonNull(Box::new(read_type(*inner, depth + 1)?)),
    })
}

fn read_value(value: gql::Value<'_, String>, depth: usize) -> Result<Value, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::DepthLimitExceeded(MAX_DEPTH));
    }

    Ok(match value {
        gql::Value::Null => Value::Null,
        gql::Value::Int(number) => Value::Int(number.as_i64().ok_or(ParseError::IntOutOfRange)?),
        gql::Value::Float(float) => Value::Float(float),
        gql::Value::String(string) => Value::String(string),
        gql::Value::Boolean(boolean) => Value::Boolean(boolean),
        gql::Value::Enum(name) => Value::Enum(name),
        gql::Value::List(items) => Value::List(
            items
                .into_iter()
                .map(|item| read_value(item, depth + 1))
                .collect::<Result<_, _>>()?,
        ),
        gql::Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(name, value)| Ok((name, read_value(value, depth + 1)?)))
                .collect::<Result<_, ParseError>>()?,
        ),
        gql::Value::Variable(name) => return Err(ParseError::Variable(name)),
    })
}
