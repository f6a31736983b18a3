#![forbid(unsafe_code)]

//! Type-system document model for GraphQL SDL.
//!
//! Documents are parsed with [graphql_parser], assembled with the builders
//! in [build] and printed back through their [std::fmt::Display]
//! implementations.

use error::ParseError;
use tracing::{debug, debug_span};

pub mod ast;
pub mod build;
pub mod error;
mod print;
pub mod read;

pub use ast::*;


/// Parse an SDL document.
///
/// Parsing stops at the first syntax error.
pub fn parse_document(source: &str) -> Result<Document, ParseError> {
    let _entered = debug_span!("parse", len = source.len()).entered();

    let parsed = graphql_parser::schema::parse_schema::<String>(source)?;
    let document = read::read_document(parsed)?;
    debug!("{} definitions", document.definitions.len());

    Ok(document)
}
