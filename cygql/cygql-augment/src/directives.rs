//! The directives the augmentation understands.

use cygql_ast::{
    Directive, DirectiveDefinition, DirectiveLocation, FieldDefinition, HasDirectives,
    TypeDefinition, Value, Wrappers,
    build::{
        DirectiveDefinitionDesc, EnumTypeDesc, InputValueDesc, build_directive,
        build_directive_argument, build_directive_definition, build_enum_type, build_enum_value,
        build_input_value, build_named_type, string_list_value,
    },
};
use indexmap::IndexMap;
use tracing::trace;

use crate::{
    config::{AugmentationConfig, AuthFlags},
    error::{ConfigError, SchemaError},
};

pub const CYPHER: &str = "cypher";
pub const RELATION: &str = "relation";
pub const ADDITIONAL_LABELS: &str = "additionalLabels";
pub const MUTATION_META: &str = "MutationMeta";
pub const NEO4J_IGNORE: &str = "neo4j_ignore";
pub const ID: &str = "id";
pub const UNIQUE: &str = "unique";
pub const INDEX: &str = "index";
pub const IS_AUTHENTICATED: &str = "isAuthenticated";
pub const HAS_ROLE: &str = "hasRole";
pub const HAS_SCOPE: &str = "hasScope";

pub const RELATION_DIRECTIONS: &str = "_RelationDirections";
pub const ROLE_ENUM: &str = "Role";

pub fn is_cypher_field(field: &impl HasDirectives) -> bool {
    field.has_directive(CYPHER)
}

pub fn is_ignored_field(field: &impl HasDirectives) -> bool {
    field.has_directive(NEO4J_IGNORE)
}

pub fn is_relation_field(field: &impl HasDirectives) -> bool {
    field.has_directive(RELATION)
}

pub fn is_id_field(field: &impl HasDirectives) -> bool {
    field.has_directive(ID)
}

pub fn is_unique_field(field: &impl HasDirectives) -> bool {
    field.has_directive(UNIQUE)
}

pub fn is_index_field(field: &impl HasDirectives) -> bool {
    field.has_directive(INDEX)
}

/// The statement of a `@cypher` directive
pub fn cypher_statement(field: &impl HasDirectives) -> Option<&str> {
    field
        .directive(CYPHER)
        .and_then(|directive| directive.string_argument("statement"))
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RelationDirection {
    In,
    Out,
}

impl RelationDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }

    /// The declared direction, `None` when absent or unrecognized
    pub fn from_directive(directive: &Directive) -> Option<Self> {
        let direction = directive.argument("direction")?.as_enum()?;
        if direction.eq_ignore_ascii_case("in") {
            Some(Self::In)
        } else if direction.eq_ignore_ascii_case("out") {
            Some(Self::Out)
        } else {
            None
        }
    }
}

/// Check the key directive combinations of all fields of one type.
pub fn validate_field_directives(
    type_name: &str,
    fields: &[&FieldDefinition],
) -> Result<(), SchemaError> {
    let id_fields: Vec<String> = fields
        .iter()
        .filter(|field| is_id_field(**field))
        .map(|field| field.name.clone())
        .collect();

    if id_fields.len() > 1 {
        return Err(SchemaError::MultipleIdFields {
            type_name: type_name.to_string(),
            fields: id_fields,
        });
    }

    for field in fields {
        let markers = [
            (ID, is_id_field(*field)),
            (UNIQUE, is_unique_field(*field)),
            (INDEX, is_index_field(*field)),
        ];

        if is_cypher_field(*field) {
            if let Some((directive, _)) = markers.iter().find(|(_, present)| *present) {
                return Err(SchemaError::ComputedKeyField {
                    type_name: type_name.to_string(),
                    field_name: field.name.clone(),
                    directive: *directive,
                });
            }
        }

        let mut present = markers.iter().filter(|(_, present)| *present);
        if let (Some((first, _)), Some((second, _))) = (present.next(), present.next()) {
            return Err(SchemaError::ConflictingKeyDirectives {
                type_name: type_name.to_string(),
                field_name: field.name.clone(),
                first: *first,
                second: *second,
            });
        }
    }

    Ok(())
}

/// Which auth flag, if any, enables a directive
#[derive(Clone, Copy)]
enum Gate {
    Always,
    IsAuthenticated,
    HasRole,
    HasScope,
}

impl Gate {
    fn is_open(self, flags: AuthFlags) -> bool {
        match self {
            Self::Always => true,
            Self::IsAuthenticated => flags.is_authenticated,
            Self::HasRole => flags.has_role,
            Self::HasScope => flags.has_scope,
        }
    }
}

struct DirectiveDescriptor {
    name: &'static str,
    arguments: &'static [(&'static str, &'static str, Wrappers)],
    locations: &'static [DirectiveLocation],
    gate: Gate,
}

const NONE: Wrappers = Wrappers::empty();
const LIST: Wrappers = Wrappers::LIST;

const FIELD: &[DirectiveLocation] = &[DirectiveLocation::FieldDefinition];
const OBJECT_OR_FIELD: &[DirectiveLocation] = &[
    DirectiveLocation::Object,
    DirectiveLocation::FieldDefinition,
];

const DESCRIPTORS: &[DirectiveDescriptor] = &[
    DirectiveDescriptor {
        name: CYPHER,
        arguments: &[("statement", "String", NONE)],
        locations: &[
            DirectiveLocation::FieldDefinition,
            DirectiveLocation::InputFieldDefinition,
        ],
        gate: Gate::Always,
    },
    DirectiveDescriptor {
        name: RELATION,
        arguments: &[
            ("name", "String", NONE),
            ("direction", RELATION_DIRECTIONS, NONE),
            ("from", "String", NONE),
            ("to", "String", NONE),
        ],
        locations: &[
            DirectiveLocation::FieldDefinition,
            DirectiveLocation::Object,
        ],
        gate: Gate::Always,
    },
    DirectiveDescriptor {
        name: ADDITIONAL_LABELS,
        arguments: &[("labels", "String", LIST)],
        locations: &[DirectiveLocation::Object],
        gate: Gate::Always,
    },
    DirectiveDescriptor {
        name: MUTATION_META,
        arguments: &[
            ("relationship", "String", NONE),
            ("from", "String", NONE),
            ("to", "String", NONE),
        ],
        locations: FIELD,
        gate: Gate::Always,
    },
    DirectiveDescriptor {
        name: NEO4J_IGNORE,
        arguments: &[],
        locations: FIELD,
        gate: Gate::Always,
    },
    DirectiveDescriptor {
        name: ID,
        arguments: &[],
        locations: FIELD,
        gate: Gate::Always,
    },
    DirectiveDescriptor {
        name: UNIQUE,
        arguments: &[],
        locations: FIELD,
        gate: Gate::Always,
    },
    DirectiveDescriptor {
        name: INDEX,
        arguments: &[],
        locations: FIELD,
        gate: Gate::Always,
    },
    DirectiveDescriptor {
        name: IS_AUTHENTICATED,
        arguments: &[],
        locations: OBJECT_OR_FIELD,
        gate: Gate::IsAuthenticated,
    },
    DirectiveDescriptor {
        name: HAS_ROLE,
        arguments: &[("roles", ROLE_ENUM, LIST)],
        locations: OBJECT_OR_FIELD,
        gate: Gate::HasRole,
    },
    DirectiveDescriptor {
        name: HAS_SCOPE,
        arguments: &[("scopes", "String", LIST)],
        locations: OBJECT_OR_FIELD,
        gate: Gate::HasScope,
    },
];

/// Synthesize the definition of every known directive that is not yet defined.
///
/// `has_role_enum` tells whether the schema declares `enum Role`, which
/// `@hasRole` needs when enabled.
pub fn augment_directive_definitions(
    directives: &mut IndexMap<String, DirectiveDefinition>,
    has_role_enum: bool,
    config: &AugmentationConfig,
) -> Result<(), ConfigError> {
    let flags = config.auth.flags();

    if flags.has_role && !has_role_enum {
        return Err(ConfigError::MissingRoleEnum);
    }

    for descriptor in DESCRIPTORS {
        if !descriptor.gate.is_open(flags) || directives.contains_key(descriptor.name) {
            continue;
        }

        trace!("synthesize directive definition @{}", descriptor.name);

        let arguments = descriptor
            .arguments
            .iter()
            .map(|(name, type_name, wrappers)| {
                build_input_value(InputValueDesc::new(
                    *name,
                    build_named_type(type_name, *wrappers),
                ))
            })
            .collect();

        directives.insert(
            descriptor.name.to_string(),
            build_directive_definition(DirectiveDefinitionDesc {
                name: descriptor.name.to_string(),
                arguments,
                locations: descriptor.locations.to_vec(),
                ..Default::default()
            }),
        );
    }

    Ok(())
}

/// `enum _RelationDirections { IN OUT }`
pub fn relation_directions_enum() -> TypeDefinition {
    build_enum_type(EnumTypeDesc {
        name: RELATION_DIRECTIONS.to_string(),
        values: vec![
            build_enum_value(RelationDirection::In.as_str()),
            build_enum_value(RelationDirection::Out.as_str()),
        ],
        ..Default::default()
    })
}

/// `@relation(name: .., direction: ..)` as placed on fields
pub fn field_relation_directive(name: &str, direction: RelationDirection) -> Directive {
    build_directive(
        RELATION,
        [
            build_directive_argument("name", Value::String(name.to_string())),
            build_directive_argument("direction", Value::Enum(direction.as_str().to_string())),
        ],
    )
}

/// `@relation(name: .., from: .., to: ..)` as placed on generated types
pub fn type_relation_directive(name: &str, from: &str, to: &str) -> Directive {
    build_directive(
        RELATION,
        [
            build_directive_argument("name", Value::String(name.to_string())),
            build_directive_argument("from", Value::String(from.to_string())),
            build_directive_argument("to", Value::String(to.to_string())),
        ],
    )
}

pub fn mutation_meta_directive(relationship: &str, from: &str, to: &str) -> Directive {
    build_directive(
        MUTATION_META,
        [
            build_directive_argument("relationship", Value::String(relationship.to_string())),
            build_directive_argument("from", Value::String(from.to_string())),
            build_directive_argument("to", Value::String(to.to_string())),
        ],
    )
}

/// `@hasScope(scopes: ["<Type>: <Action>", ...])`
pub fn scope_directive<'a>(scopes: impl IntoIterator<Item = (&'a str, &'a str)>) -> Directive {
    let scopes: Vec<String> = scopes
        .into_iter()
        .map(|(type_name, action)| format!("{type_name}: {action}"))
        .collect();

    build_directive(
        HAS_SCOPE,
        [build_directive_argument("scopes", string_list_value(scopes))],
    )
}

