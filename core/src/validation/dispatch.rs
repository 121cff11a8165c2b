#![deny(missing_docs)]

//! # Type Dispatch
//!
//! For every type a schema declares, in declaration order, decodes the raw
//! value for that type and runs the matching check.
//!
//! | Tag | Check |
//! |---|---|
//! | `integer`, `number` | numeric parse |
//! | `boolean` | boolean literal |
//! | `object` | non-exploded: `key,value` mapping through the compiled object schema |
//! | `array` | non-exploded with an item schema: every item through this dispatcher |
//! | `string` | enum membership, when an enum is declared |
//! | `null` | nothing |
//!
//! Every declared tag is checked; a match on one tag does not skip the others.

use crate::oas::models::{Parameter, SchemaDescriptor, TypeTag};
use crate::validation::checks::{
    check_array_items, check_boolean, check_enum, check_numeric, CheckFailure,
};
use crate::validation::decode::{mapping_to_json, DecodeOnce, DecodedValue};
use crate::violation::Violation;
use indexmap::IndexMap;

/// Runs per-type checks against parameter values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher;

impl Dispatcher {
    /// Creates a dispatcher.
    pub fn new() -> Self {
        Self
    }

    /// Validates one parameter value. A parameter without schema always passes.
    pub fn dispatch(&self, param: &Parameter, raw: &str) -> Vec<Violation> {
        let Some(schema) = param.schema.as_ref() else {
            return Vec::new();
        };
        self.failures(raw, schema, param.is_exploded())
            .into_iter()
            .map(|failure| failure.into_violation(param, raw, schema))
            .collect()
    }

    /// Collects the failures of `raw` against every type `schema` declares.
    pub fn failures<'s>(
        &self,
        raw: &str,
        schema: &'s SchemaDescriptor,
        exploded: bool,
    ) -> Vec<CheckFailure<'s>> {
        let decoded = DecodeOnce::new(raw);
        schema
            .types
            .iter()
            .flat_map(|tag| self.check_tag(*tag, &decoded, schema, exploded))
            .collect()
    }

    fn check_tag<'s>(
        &self,
        tag: TypeTag,
        decoded: &DecodeOnce<'_>,
        schema: &'s SchemaDescriptor,
        exploded: bool,
    ) -> Vec<CheckFailure<'s>> {
        let Some(value) = decoded.decode(tag, exploded) else {
            log::trace!("Exploded {} value not decoded", tag);
            return Vec::new();
        };
        match value {
            DecodedValue::Scalar(raw) => match tag {
                TypeTag::Integer | TypeTag::Number => check_numeric(raw).into_iter().collect(),
                TypeTag::Boolean => check_boolean(raw).into_iter().collect(),
                TypeTag::String => match schema.enum_values.as_deref() {
                    Some(allowed) => check_enum(raw, allowed).into_iter().collect(),
                    None => Vec::new(),
                },
                TypeTag::Null | TypeTag::Object | TypeTag::Array => Vec::new(),
            },
            DecodedValue::Mapping(mapping) => check_object(mapping, schema),
            DecodedValue::Sequence(items) => match schema.item_schema() {
                Some(item_schema) => check_array_items(items, item_schema, self),
                None => Vec::new(),
            },
        }
    }
}

fn check_object<'s>(
    mapping: &IndexMap<String, String>,
    schema: &SchemaDescriptor,
) -> Vec<CheckFailure<'s>> {
    let Some(compiled) = schema.compiled.as_ref() else {
        log::debug!("Object schema was not compiled, structural check skipped");
        return Vec::new();
    };
    let errors = compiled.validate(&mapping_to_json(mapping));
    if errors.is_empty() {
        Vec::new()
    } else {
        vec![CheckFailure::ObjectSchema(errors)]
    }
}
