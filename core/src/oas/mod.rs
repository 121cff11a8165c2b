#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **document**: loading a contract from YAML/JSON.
//! - **shims**: intermediate deserialization layer.
//! - **refs**: local `$ref` resolution.
//! - **models**: parameter and schema IR.
//! - **schema**: schema descriptor construction.
//! - **params**: per-operation parameter extraction.

pub mod document;
pub mod models;
pub mod params;
pub(crate) mod refs;
pub mod schema;
pub mod shims;

pub use document::ApiDocument;
pub use models::{Items, ParamLocation, ParamStyle, Parameter, SchemaDescriptor, TypeTag};
pub use params::extract_params_for_operation;
pub use schema::build_schema_descriptor;
