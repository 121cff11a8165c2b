#![deny(missing_docs)]

//! # Violations
//!
//! Structured records describing why a request failed one specific check.
//!
//! Violations are values, not errors: a validation pass collects every one it
//! finds and never aborts on the first.

use crate::oas::models::{Parameter, SchemaDescriptor};
use serde::Serialize;
use std::fmt;

/// Why a check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationKind {
    /// The value does not parse as a number.
    NotNumber,
    /// The value is not a boolean literal.
    NotBoolean,
    /// The value is not one of the declared enum entries.
    NotInEnum,
    /// An element of a delimited array failed its item schema.
    ArrayItemMismatch,
    /// A delimited object failed structural schema validation.
    ObjectSchemaMismatch,
    /// No path template matches the request path.
    PathNotFound,
    /// The path matches but the method has no operation.
    OperationNotFound,
}

/// Broad category of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationType {
    /// A parameter value failed a check.
    Parameter,
    /// The request could not be matched to an operation.
    Path,
}

/// One error reported by the structural schema validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaError {
    /// JSON Pointer to the failing part of the instance.
    pub instance_path: String,
    /// JSON Pointer to the failing keyword in the schema.
    pub schema_path: String,
    /// Human readable reason.
    pub message: String,
}

/// A single structured validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Failure kind.
    pub kind: ViolationKind,
    /// Broad category.
    pub validation_type: ValidationType,
    /// Sub-category: the parameter location, or `missing` for resolver failures.
    pub validation_sub_type: String,
    /// One-line summary.
    pub message: String,
    /// Detailed explanation.
    pub reason: String,
    /// Suggested remedy.
    pub how_to_fix: String,
    /// The parameter that failed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<Parameter>,
    /// The offending value (or request path for resolver failures).
    pub value: String,
    /// Schema the value was checked against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDescriptor>,
    /// Item schema, for array item failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_schema: Option<SchemaDescriptor>,
    /// Structural errors, for object failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schema_errors: Vec<SchemaError>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Violation {
    fn for_parameter(
        kind: ViolationKind,
        param: &Parameter,
        value: &str,
        schema: &SchemaDescriptor,
        message: String,
        reason: String,
        how_to_fix: String,
    ) -> Self {
        Self {
            kind,
            validation_type: ValidationType::Parameter,
            validation_sub_type: param.location.as_str().to_string(),
            message,
            reason,
            how_to_fix,
            parameter: Some(param.clone()),
            value: value.to_string(),
            schema: Some(schema.clone()),
            item_schema: None,
            schema_errors: Vec::new(),
        }
    }

    /// The value of a numeric parameter is not a number.
    pub fn invalid_number(param: &Parameter, value: &str, schema: &SchemaDescriptor) -> Self {
        let label = param.location.label();
        Self::for_parameter(
            ViolationKind::NotNumber,
            param,
            value,
            schema,
            format!("{} parameter '{}' is not a valid number", label, param.name),
            format!(
                "The {} parameter '{}' is defined as being a number, however the value '{}' is not a valid number",
                param.location, param.name, value
            ),
            format!("Convert the value '{}' into a number", value),
        )
    }

    /// The value of a boolean parameter is not a boolean literal.
    pub fn invalid_boolean(param: &Parameter, value: &str, schema: &SchemaDescriptor) -> Self {
        let label = param.location.label();
        Self::for_parameter(
            ViolationKind::NotBoolean,
            param,
            value,
            schema,
            format!("{} parameter '{}' is not a valid boolean", label, param.name),
            format!(
                "The {} parameter '{}' is defined as being a boolean, however the value '{}' is not a valid boolean",
                param.location, param.name, value
            ),
            format!("Convert the value '{}' into a true/false value", value),
        )
    }

    /// The value is not one of the allowed enum entries.
    pub fn not_in_enum(param: &Parameter, value: &str, schema: &SchemaDescriptor) -> Self {
        let label = param.location.label();
        let allowed = schema
            .enum_values
            .as_deref()
            .map(|values| values.join(", "))
            .unwrap_or_default();
        Self::for_parameter(
            ViolationKind::NotInEnum,
            param,
            value,
            schema,
            format!(
                "{} parameter '{}' does not match allowed values",
                label, param.name
            ),
            format!(
                "The {} parameter '{}' has pre-defined values set via an enum. The value '{}' is not one of those values.",
                param.location, param.name, value
            ),
            format!(
                "Instead of '{}', use one of the allowed values: '{}'",
                value, allowed
            ),
        )
    }

    /// An element of a delimited array failed `expected` in its item schema.
    pub fn array_item_mismatch(
        param: &Parameter,
        item: &str,
        expected: &str,
        schema: &SchemaDescriptor,
        item_schema: &SchemaDescriptor,
    ) -> Self {
        let label = param.location.label();
        let mut violation = Self::for_parameter(
            ViolationKind::ArrayItemMismatch,
            param,
            item,
            schema,
            format!(
                "{} array parameter '{}' is not a valid {}",
                label, param.name, expected
            ),
            format!(
                "The {} parameter (which is an array) '{}' is defined as containing {} items, however the item '{}' is not a valid {}",
                param.location, param.name, expected, item, expected
            ),
            format!("Convert the item '{}' into a valid {}", item, expected),
        );
        violation.item_schema = Some(item_schema.clone());
        violation
    }

    /// A delimited object failed structural validation.
    pub fn object_schema_mismatch(
        param: &Parameter,
        value: &str,
        schema: &SchemaDescriptor,
        errors: Vec<SchemaError>,
    ) -> Self {
        let label = param.location.label();
        let first = errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_default();
        let mut violation = Self::for_parameter(
            ViolationKind::ObjectSchemaMismatch,
            param,
            value,
            schema,
            format!(
                "{} parameter '{}' failed to validate against its schema",
                label, param.name
            ),
            format!(
                "The {} parameter '{}' is defined as an object, however it failed to pass a schema validation: {}",
                param.location, param.name, first
            ),
            "Ensure the object properties and their values match the schema".to_string(),
        );
        violation.schema_errors = errors;
        violation
    }

    /// No path template in the document matches the request path.
    pub fn path_not_found(method: &str, path: &str) -> Self {
        Self {
            kind: ViolationKind::PathNotFound,
            validation_type: ValidationType::Path,
            validation_sub_type: "missing".to_string(),
            message: format!("{} Path '{}' not found", method, path),
            reason: format!(
                "The {} request contains a path of '{}' however that path does not exist in the OpenAPI document",
                method, path
            ),
            how_to_fix: "Check the request path against the paths declared in the OpenAPI document"
                .to_string(),
            parameter: None,
            value: path.to_string(),
            schema: None,
            item_schema: None,
            schema_errors: Vec::new(),
        }
    }

    /// The path matched `template`, which declares no operation for `method`.
    pub fn operation_not_found(method: &str, path: &str, template: &str) -> Self {
        Self {
            kind: ViolationKind::OperationNotFound,
            validation_type: ValidationType::Path,
            validation_sub_type: "missingOperation".to_string(),
            message: format!("{} operation for path '{}' not found", method, path),
            reason: format!(
                "The path '{}' matches '{}' in the OpenAPI document, however no {} operation is defined for it",
                path, template, method
            ),
            how_to_fix: format!("Use a method that '{}' declares", template),
            parameter: None,
            value: path.to_string(),
            schema: None,
            item_schema: None,
            schema_errors: Vec::new(),
        }
    }
}
