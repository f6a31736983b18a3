//! Schema augmentation for graph-backed GraphQL APIs.
//!
//! Given type definitions describing nodes and relationships, the
//! augmentation derives a complete API: root query fields with pagination,
//! ordering and filtering, create/update/delete/merge mutations for nodes,
//! add/remove/update/merge mutations for relations, and the input, payload
//! and property types those fields refer to.

pub mod classify;
pub mod config;
pub mod directives;
pub mod error;
pub mod input_values;
pub mod naming;
pub mod node;
pub mod property_types;

mod augment;
mod relationship;


pub use augment::{AugmentedSchema, augment_document, augment_schema};
pub use config::AugmentationConfig;
pub use error::{AugmentError, ConfigError, SchemaError};
