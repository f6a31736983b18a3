#![forbid(unsafe_code)]

//! Cypher for mutations whose input objects carry their own `@cypher` statements.
//!
//! The root statement of a `@cypher` mutation field is extended with one
//! `CALL { ... }` block per nested `@cypher` input field present in the
//! arguments. Each block unwinds the input items, runs the field's statement
//! with the enclosing variables in scope, and re-exports the item for blocks
//! nested deeper.

pub mod error;
pub mod lexer;
pub mod statement;

mod translate;

pub use error::TranslateError;
pub use translate::{CypherQuery, NestedMutationTranslator};
