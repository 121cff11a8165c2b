#![deny(missing_docs)]

//! # Schema Descriptors
//!
//! Builds the validation-relevant [`SchemaDescriptor`] view from a raw
//! parameter schema: declared types, enum values and nested `items`.

use crate::error::{AppError, AppResult};
use crate::oas::models::{Items, SchemaDescriptor, TypeTag};
use crate::oas::refs::inline_refs;
use serde_json::Value;

/// Resolves local `$ref`s in `schema` against `root` and builds its descriptor.
///
/// The schema must be a JSON object or a boolean schema.
pub fn build_schema_descriptor(
    schema: &Value,
    root: &Value,
    self_uri: Option<&str>,
) -> AppResult<SchemaDescriptor> {
    if !(schema.is_object() || schema.is_boolean()) {
        return Err(AppError::Schema(format!(
            "Parameter schema must be an object or boolean, found: {}",
            schema
        )));
    }
    let resolved = inline_refs(schema, root, self_uri)?;
    Ok(descriptor_from_resolved(resolved))
}

/// Builds a descriptor from a schema that no longer contains `$ref`s.
pub fn descriptor_from_resolved(resolved: Value) -> SchemaDescriptor {
    let types = declared_types(&resolved);
    let enum_values = resolved
        .get("enum")
        .and_then(Value::as_array)
        .map(|values| values.iter().map(enum_value_to_string).collect());
    let items = match resolved.get("items") {
        Some(Value::Bool(b)) => Some(Items::Bool(*b)),
        Some(nested @ Value::Object(_)) => Some(Items::Schema(Box::new(
            descriptor_from_resolved(nested.clone()),
        ))),
        _ => None,
    };

    SchemaDescriptor {
        types,
        enum_values,
        items,
        raw: resolved,
        compiled: None,
    }
}

fn declared_types(schema: &Value) -> Vec<TypeTag> {
    let mut types: Vec<TypeTag> = match schema.get("type") {
        Some(Value::String(name)) => parse_tag(name).into_iter().collect(),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .filter_map(parse_tag)
            .collect(),
        _ => Vec::new(),
    };

    // OAS 3.0 spelling of `type: [T, "null"]`.
    let nullable = schema
        .get("nullable")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if nullable && !types.is_empty() && !types.contains(&TypeTag::Null) {
        types.push(TypeTag::Null);
    }
    types
}

fn parse_tag(name: &str) -> Option<TypeTag> {
    let tag = TypeTag::parse(name);
    if tag.is_none() {
        log::debug!("Ignoring unknown schema type '{}'", name);
    }
    tag
}

fn enum_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn build(schema: Value) -> SchemaDescriptor {
        build_schema_descriptor(&schema, &json!({}), None).unwrap()
    }

    #[test]
    fn test_single_and_multi_types() {
        assert_eq!(build(json!({"type": "integer"})).types, vec![TypeTag::Integer]);
        assert_eq!(
            build(json!({"type": ["integer", "null"]})).types,
            vec![TypeTag::Integer, TypeTag::Null]
        );
    }

    #[test]
    fn test_nullable_appends_null() {
        let d = build(json!({"type": "string", "nullable": true}));
        assert_eq!(d.types, vec![TypeTag::String, TypeTag::Null]);
    }

    #[test]
    fn test_unknown_types_dropped() {
        let d = build(json!({"type": ["file", "string"]}));
        assert_eq!(d.types, vec![TypeTag::String]);
        assert!(build(json!({})).types.is_empty());
    }

    #[test]
    fn test_enum_values_stringified() {
        let d = build(json!({"type": "string", "enum": ["red", 3, true, null]}));
        assert_eq!(
            d.enum_values,
            Some(vec![
                "red".to_string(),
                "3".to_string(),
                "true".to_string(),
                "null".to_string()
            ])
        );
    }

    #[test]
    fn test_items_schema_and_boolean() {
        let d = build(json!({"type": "array", "items": {"type": "number"}}));
        assert_eq!(d.item_schema().unwrap().types, vec![TypeTag::Number]);

        let b = build(json!({"type": "array", "items": false}));
        assert_eq!(b.items, Some(Items::Bool(false)));
        assert!(b.item_schema().is_none());
    }

    #[test]
    fn test_refs_resolved_from_components() {
        let root = json!({"components": {"schemas": {
            "Color": {"type": "string", "enum": ["red", "green"]}
        }}});
        let schema = json!({"type": "array", "items": {"$ref": "#/components/schemas/Color"}});
        let d = build_schema_descriptor(&schema, &root, None).unwrap();
        let items = d.item_schema().unwrap();
        assert_eq!(items.types, vec![TypeTag::String]);
        assert_eq!(items.enum_values.as_ref().unwrap().len(), 2);
        assert_eq!(d.raw["items"]["enum"][1], "green");
    }

    #[test]
    fn test_non_object_schema_rejected() {
        assert!(build(json!(true)).types.is_empty());
        let err = build_schema_descriptor(&json!("integer"), &json!({}), None).unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }
}
