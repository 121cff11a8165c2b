#![deny(missing_docs)]

//! # Value Decoding
//!
//! Turns a raw parameter string into the shape its declared type expects.
//! Decoding never fails: malformed input only surfaces through the check
//! that consumes the decoded value.

use crate::oas::models::TypeTag;
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use std::cell::OnceCell;

/// Delimiter of non-exploded `form` collections.
pub const DEFAULT_DELIMITER: char = ',';

/// A raw value decoded for one declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedValue<'d> {
    /// Scalar types use the raw string as-is.
    Scalar(&'d str),
    /// A non-exploded object: `key,value,key,value...`.
    Mapping(&'d IndexMap<String, String>),
    /// A non-exploded array: `item,item,...`.
    Sequence(&'d [String]),
}

/// One raw value, decoded on demand for each declared type.
///
/// Collection decodings are memoized, so a schema declaring several types
/// never splits the same value twice.
#[derive(Debug)]
pub struct DecodeOnce<'a> {
    raw: &'a str,
    mapping: OnceCell<IndexMap<String, String>>,
    items: OnceCell<Vec<String>>,
}

impl<'a> DecodeOnce<'a> {
    /// Wraps a raw value.
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            mapping: OnceCell::new(),
            items: OnceCell::new(),
        }
    }

    /// Decodes the value for one declared type.
    ///
    /// Returns `None` for exploded collections: their values arrive as
    /// repeated instances and are not decoded here.
    pub fn decode(&self, tag: TypeTag, exploded: bool) -> Option<DecodedValue<'_>> {
        match tag {
            TypeTag::Object | TypeTag::Array if exploded => None,
            TypeTag::Object => Some(DecodedValue::Mapping(
                self.mapping.get_or_init(|| construct_map_from_csv(self.raw)),
            )),
            TypeTag::Array => Some(DecodedValue::Sequence(
                self.items.get_or_init(|| explode_delimited(self.raw)),
            )),
            _ => Some(DecodedValue::Scalar(self.raw)),
        }
    }
}

/// Decodes a `key,value,key,value` string into an ordered mapping.
///
/// A trailing key without a value is dropped. Duplicate keys keep their first
/// position and take the last value.
pub fn construct_map_from_csv(raw: &str) -> IndexMap<String, String> {
    let parts: Vec<&str> = raw.split(DEFAULT_DELIMITER).collect();
    let mut map = IndexMap::with_capacity(parts.len() / 2);
    for pair in parts.chunks_exact(2) {
        map.insert(pair[0].to_string(), pair[1].to_string());
    }
    map
}

/// Splits a delimited array value into its items.
pub fn explode_delimited(raw: &str) -> Vec<String> {
    raw.split(DEFAULT_DELIMITER).map(str::to_string).collect()
}

/// Converts a decoded mapping into a JSON object for structural validation.
///
/// Values are cast the way a form-encoded value would be read by a typed
/// consumer: integer, then float, then boolean, falling back to string.
pub fn mapping_to_json(map: &IndexMap<String, String>) -> Value {
    let obj: Map<String, Value> = map
        .iter()
        .map(|(k, v)| (k.clone(), cast_scalar(v)))
        .collect();
    Value::Object(obj)
}

/// Casts a single raw scalar to the most specific JSON value it represents.
pub fn cast_scalar(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}
