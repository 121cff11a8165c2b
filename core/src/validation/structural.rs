#![deny(missing_docs)]

//! # Structural Validation
//!
//! Deep JSON Schema validation for decoded object values.
//!
//! Object schemas are compiled once, when the document is indexed, and the
//! compiled form is attached to the [`SchemaDescriptor`] it belongs to. A
//! schema that does not compile is a contract fault reported as
//! [`AppError::Schema`] at build time, never as a violation.
//!
//! The default implementation is backed by the `jsonschema` crate. OAS 3.0
//! and Swagger 2.0 schemas compile as Draft 4, OAS 3.1+ as Draft 2020-12.

use crate::error::{AppError, AppResult};
use crate::oas::document::ApiDocument;
use crate::oas::models::{Items, Parameter, SchemaDescriptor, TypeTag};
use crate::violation::SchemaError;
use jsonschema::{Draft, Validator};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// JSON Schema dialect a document's schemas are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDialect {
    /// OAS 3.0 and Swagger 2.0 Schema Objects (Draft 4 based).
    Draft4,
    /// OAS 3.1+ Schema Objects (full JSON Schema 2020-12).
    Draft202012,
}

impl SchemaDialect {
    /// The dialect implied by the document's `openapi`/`swagger` version.
    pub fn for_document(doc: &ApiDocument) -> Self {
        if !doc.is_oas3() {
            return Self::Draft4;
        }
        match doc.shim().openapi.as_deref() {
            Some(version) if version.starts_with("3.0") => Self::Draft4,
            _ => Self::Draft202012,
        }
    }
}

/// A schema compiled for repeated validation.
pub trait CompiledSchema: Send + Sync {
    /// Returns every error found; an empty list means the instance is valid.
    fn validate(&self, instance: &Value) -> Vec<SchemaError>;
}

/// Compiles parameter schemas for structural validation.
pub trait StructuralValidator: Send + Sync {
    /// Compiles `schema`. Fails with [`AppError::Schema`] when it is not a
    /// valid schema of `dialect`.
    fn compile(&self, schema: &Value, dialect: SchemaDialect) -> AppResult<Compiled>;
}

/// Shared handle to a [`CompiledSchema`].
#[derive(Clone)]
pub struct Compiled(Arc<dyn CompiledSchema>);

impl Compiled {
    /// Wraps a compiled schema.
    pub fn new(schema: impl CompiledSchema + 'static) -> Self {
        Self(Arc::new(schema))
    }

    /// Validates `instance`.
    pub fn validate(&self, instance: &Value) -> Vec<SchemaError> {
        self.0.validate(instance)
    }
}

impl fmt::Debug for Compiled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Compiled(..)")
    }
}

/// Two handles are equal when they share the same compiled schema.
impl PartialEq for Compiled {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// [`StructuralValidator`] backed by the `jsonschema` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator {
    format_assertions: bool,
}

impl JsonSchemaValidator {
    /// Creates a validator, optionally asserting `format` keywords.
    pub fn new(format_assertions: bool) -> Self {
        Self { format_assertions }
    }
}

impl StructuralValidator for JsonSchemaValidator {
    fn compile(&self, schema: &Value, dialect: SchemaDialect) -> AppResult<Compiled> {
        let mut opts = jsonschema::options();
        opts.with_draft(match dialect {
            SchemaDialect::Draft4 => Draft::Draft4,
            SchemaDialect::Draft202012 => Draft::Draft202012,
        });
        opts.should_validate_formats(self.format_assertions);

        let validator = opts
            .build(schema)
            .map_err(|e| AppError::Schema(format!("Schema could not be compiled: {}", e)))?;
        Ok(Compiled::new(JsonSchemaCompiled(validator)))
    }
}

struct JsonSchemaCompiled(Validator);

impl CompiledSchema for JsonSchemaCompiled {
    fn validate(&self, instance: &Value) -> Vec<SchemaError> {
        self.0
            .iter_errors(instance)
            .map(|e| SchemaError {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect()
    }
}

/// Compiles every object-typed schema in `schema`'s tree, array items included.
pub fn compile_descriptor(
    schema: &mut SchemaDescriptor,
    validator: &dyn StructuralValidator,
    dialect: SchemaDialect,
) -> AppResult<()> {
    if schema.declares(TypeTag::Object) {
        schema.compiled = Some(validator.compile(&schema.raw, dialect)?);
    }
    if let Some(Items::Schema(items)) = schema.items.as_mut() {
        compile_descriptor(items, validator, dialect)?;
    }
    Ok(())
}

/// Compiles the schemas of `params`, naming the parameter on failure.
pub fn compile_parameter_schemas(
    params: &mut [Parameter],
    validator: &dyn StructuralValidator,
    dialect: SchemaDialect,
) -> AppResult<()> {
    for param in params.iter_mut() {
        let Some(schema) = param.schema.as_mut() else {
            continue;
        };
        compile_descriptor(schema, validator, dialect).map_err(|e| match e {
            AppError::Schema(msg) => AppError::Schema(format!(
                "{} parameter '{}': {}",
                param.location.label(),
                param.name,
                msg
            )),
            other => other,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::ParamLocation;
    use crate::oas::schema::descriptor_from_resolved;
    use serde_json::json;

    fn compile(schema: Value, dialect: SchemaDialect) -> Compiled {
        JsonSchemaValidator::default().compile(&schema, dialect).unwrap()
    }

    #[test]
    fn test_valid_instance_has_no_errors() {
        let schema = json!({"type": "object", "properties": {"n": {"type": "integer"}}});
        let compiled = compile(schema, SchemaDialect::Draft202012);
        assert!(compiled.validate(&json!({"n": 1})).is_empty());
    }

    #[test]
    fn test_errors_carry_paths() {
        let schema = json!({
            "type": "object",
            "properties": {"n": {"type": "integer"}},
            "additionalProperties": false
        });
        let errors = compile(schema, SchemaDialect::Draft202012)
            .validate(&json!({"n": "x", "extra": true}));
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.instance_path == "/n"));
    }

    #[test]
    fn test_format_assertions_toggle() {
        let schema = json!({"type": "object", "properties": {"mail": {"type": "string", "format": "email"}}});
        let instance = json!({"mail": "not-an-email"});
        let lenient = JsonSchemaValidator::new(false)
            .compile(&schema, SchemaDialect::Draft202012)
            .unwrap();
        let strict = JsonSchemaValidator::new(true)
            .compile(&schema, SchemaDialect::Draft202012)
            .unwrap();
        assert!(lenient.validate(&instance).is_empty());
        assert_eq!(strict.validate(&instance).len(), 1);
    }

    #[test]
    fn test_uncompilable_schema_is_an_error() {
        let err = JsonSchemaValidator::default()
            .compile(&json!({"type": 12}), SchemaDialect::Draft202012)
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Schema(_)));
        assert!(err.to_string().contains("Schema could not be compiled"));
    }

    #[test]
    fn test_draft4_boolean_exclusive_minimum() {
        let schema = json!({
            "type": "object",
            "properties": {"level": {"type": "integer", "minimum": 0, "exclusiveMinimum": true}}
        });
        assert!(JsonSchemaValidator::default()
            .compile(&schema, SchemaDialect::Draft202012)
            .is_err());

        let compiled = compile(schema, SchemaDialect::Draft4);
        assert!(compiled.validate(&json!({"level": 5})).is_empty());
        assert_eq!(compiled.validate(&json!({"level": 0})).len(), 1);
    }

    #[test]
    fn test_dialect_follows_document_version() {
        let doc = |v: &str| ApiDocument::from_yaml_str(&format!("{}\npaths: {{}}\n", v)).unwrap();
        assert_eq!(
            SchemaDialect::for_document(&doc("openapi: 3.0.3")),
            SchemaDialect::Draft4
        );
        assert_eq!(
            SchemaDialect::for_document(&doc("openapi: 3.1.0")),
            SchemaDialect::Draft202012
        );
        assert_eq!(
            SchemaDialect::for_document(&doc("swagger: '2.0'")),
            SchemaDialect::Draft4
        );
    }

    #[test]
    fn test_compile_descriptor_reaches_object_items() {
        let mut schema = descriptor_from_resolved(json!({
            "type": "array",
            "items": {"type": "object", "required": ["a"]}
        }));
        compile_descriptor(
            &mut schema,
            &JsonSchemaValidator::default(),
            SchemaDialect::Draft202012,
        )
        .unwrap();
        assert!(schema.compiled.is_none());
        assert!(schema.item_schema().unwrap().compiled.is_some());
    }

    #[test]
    fn test_compile_failure_names_parameter() {
        let mut params = vec![Parameter::new("prefs", ParamLocation::Cookie)
            .with_schema(descriptor_from_resolved(json!({"type": "object", "minProperties": "x"})))];
        let err = compile_parameter_schemas(
            &mut params,
            &JsonSchemaValidator::default(),
            SchemaDialect::Draft202012,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Cookie parameter 'prefs'"));
    }
}
