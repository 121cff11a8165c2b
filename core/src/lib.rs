#![deny(missing_docs)]

//! # CDD Paramcheck
//!
//! Validates the parameter values an HTTP request carries (cookies) against
//! the parameter schemas of the OpenAPI operation the request targets.
//!
//! ```no_run
//! use cdd_paramcheck::{ApiDocument, ParamValidator, RawRequest};
//!
//! # fn main() -> cdd_paramcheck::AppResult<()> {
//! let doc = ApiDocument::from_path("openapi.yaml")?;
//! let validator = ParamValidator::new(&doc)?;
//! let request = RawRequest::new("GET", "/pets").with_cookie("ids", "1,2,3");
//! let (passed, violations) = validator.validate_cookie_params(&request);
//! # let _ = (passed, violations);
//! # Ok(())
//! # }
//! ```

/// Shared error types.
pub mod error;

/// Validation options.
pub mod config;

/// OpenAPI (OAS) document utilities.
pub mod oas;

/// Path/operation resolution.
pub mod paths;

/// Request abstraction.
pub mod request;

/// Structured violations.
pub mod violation;

/// The validation engine.
pub mod validation;

pub use config::ValidationOptions;
pub use error::{AppError, AppResult};
pub use oas::{ApiDocument, Items, ParamLocation, ParamStyle, Parameter, SchemaDescriptor, TypeTag};
pub use paths::{PathIndex, ResolvedOperation};
pub use request::{parse_cookie_header, RawRequest, RequestView};
pub use validation::{
    Compiled, CompiledSchema, Dispatcher, JsonSchemaValidator, ParamValidator, SchemaDialect,
    StructuralValidator,
};
pub use violation::{SchemaError, ValidationType, Violation, ViolationKind};
