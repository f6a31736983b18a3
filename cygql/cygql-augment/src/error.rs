use cygql_ast::error::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("the @hasRole directive requires an enum type named `Role`")]
    MissingRoleEnum,
    #[error("malformed augmentation config: {0}")]
    Malformed(#[source] serde_json::Error),
}

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum SchemaError {
    #[error("type `{type_name}` has more than one @id field: {}", fields.join(", "))]
    MultipleIdFields {
        type_name: String,
        fields: Vec<String>,
    },
    #[error("field `{type_name}.{field_name}` is computed by @cypher and cannot carry @{directive}")]
    ComputedKeyField {
        type_name: String,
        field_name: String,
        directive: &'static str,
    },
    #[error("field `{type_name}.{field_name}` cannot carry both @{first} and @{second}")]
    ConflictingKeyDirectives {
        type_name: String,
        field_name: String,
        first: &'static str,
        second: &'static str,
    },
    #[error("type `{0}` is defined more than once")]
    DuplicateType(String),
}

/// Augmentation is all-or-nothing: any of these aborts the whole call.
#[derive(Debug, Error)]
pub enum AugmentError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
