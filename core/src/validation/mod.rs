#![deny(missing_docs)]

//! # Parameter Validation
//!
//! - **decode**: raw string → scalar / mapping / items.
//! - **checks**: numeric, boolean, enum and array-item checks.
//! - **dispatch**: per-type-tag selection of checks.
//! - **structural**: compiled JSON Schema validation of decoded objects.
//! - **cookie**: the cookie validation pass.

pub mod checks;
pub mod cookie;
pub mod decode;
pub mod dispatch;
pub mod structural;

pub use checks::CheckFailure;
pub use cookie::{validate_cookie_values, ParamValidator};
pub use decode::{construct_map_from_csv, DecodeOnce, DecodedValue};
pub use dispatch::Dispatcher;
pub use structural::{
    compile_descriptor, Compiled, CompiledSchema, JsonSchemaValidator, SchemaDialect,
    StructuralValidator,
};
