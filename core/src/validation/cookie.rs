#![deny(missing_docs)]

//! # Cookie Parameter Validation
//!
//! Validates the cookies of a request against the cookie parameters of the
//! operation it resolves to.

use crate::config::ValidationOptions;
use crate::error::AppResult;
use crate::oas::document::ApiDocument;
use crate::oas::models::{ParamLocation, Parameter};
use crate::paths::PathIndex;
use crate::request::RequestView;
use crate::validation::dispatch::Dispatcher;
use crate::validation::structural::{JsonSchemaValidator, StructuralValidator};
use crate::violation::Violation;

/// Validates request parameters against an OpenAPI document.
///
/// Construction resolves every operation and compiles every object schema
/// once; validation itself is stateless and may run from many threads at
/// the same time.
pub struct ParamValidator {
    index: PathIndex,
}

impl ParamValidator {
    /// Compiles `doc` with default options.
    pub fn new(doc: &ApiDocument) -> AppResult<Self> {
        Self::with_options(doc, ValidationOptions::default())
    }

    /// Compiles `doc` with the given options and the `jsonschema` backed
    /// structural validator.
    pub fn with_options(doc: &ApiDocument, options: ValidationOptions) -> AppResult<Self> {
        let structural = JsonSchemaValidator::new(options.format_assertions);
        Self::with_structural_validator(doc, options, &structural)
    }

    /// Compiles `doc`, using `structural` to compile object schemas.
    pub fn with_structural_validator(
        doc: &ApiDocument,
        options: ValidationOptions,
        structural: &dyn StructuralValidator,
    ) -> AppResult<Self> {
        Ok(Self {
            index: PathIndex::build(doc, &options, structural)?,
        })
    }

    /// Validates the cookie parameters of `request`.
    ///
    /// Returns `(true, [])` when every cookie bound to a declared cookie
    /// parameter conforms. When the request cannot be resolved to an
    /// operation, returns `(false, resolver violations)`.
    pub fn validate_cookie_params<R>(&self, request: &R) -> (bool, Vec<Violation>)
    where
        R: RequestView + ?Sized,
    {
        let operation = match self.index.resolve(request.method(), request.path()) {
            Ok(operation) => operation,
            Err(violations) => return (false, violations),
        };

        let violations = validate_cookie_values(operation.parameters, &request.cookies());

        if !violations.is_empty() {
            log::debug!(
                "{} {}: {} cookie violation(s)",
                request.method(),
                request.path(),
                violations.len()
            );
        }
        (violations.is_empty(), violations)
    }
}

/// Validates `cookies` against the cookie parameters among `params`.
///
/// Parameters are visited in declaration order; for each, every cookie with
/// exactly the same (case-sensitive) name is validated. Violations are
/// returned in that discovery order.
pub fn validate_cookie_values(params: &[Parameter], cookies: &[(String, String)]) -> Vec<Violation> {
    let dispatcher = Dispatcher::new();
    params
        .iter()
        .filter(|p| p.location == ParamLocation::Cookie)
        .flat_map(|p| {
            cookies
                .iter()
                .filter(move |(name, _)| *name == p.name)
                .flat_map(move |(_, value)| dispatcher.dispatch(p, value))
        })
        .collect()
}
