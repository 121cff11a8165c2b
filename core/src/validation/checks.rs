#![deny(missing_docs)]

//! # Per-Type Checks
//!
//! Pure checks run by the dispatcher. Each returns the failure it found, if
//! any; turning failures into [`Violation`]s is left to the caller so that
//! array items can reuse the very same checks.

use crate::oas::models::{Parameter, SchemaDescriptor};
use crate::validation::dispatch::Dispatcher;
use crate::violation::{SchemaError, Violation};

/// A single failed check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckFailure<'s> {
    /// Not parseable as a number.
    NotNumber,
    /// Not a boolean literal.
    NotBoolean,
    /// Not one of the enum entries.
    NotInEnum,
    /// A delimited array item failed its item schema.
    ArrayItem {
        /// The offending item.
        item: String,
        /// What the item should have been (e.g. `number`).
        expected: &'static str,
        /// The item schema.
        item_schema: &'s SchemaDescriptor,
    },
    /// A delimited object failed structural validation.
    ObjectSchema(Vec<SchemaError>),
}

impl<'s> CheckFailure<'s> {
    /// Short name of the expectation this failure breaks.
    pub fn expected(&self) -> &'static str {
        match self {
            CheckFailure::NotNumber => "number",
            CheckFailure::NotBoolean => "boolean",
            CheckFailure::NotInEnum => "enum value",
            CheckFailure::ArrayItem { .. } => "array",
            CheckFailure::ObjectSchema(_) => "object",
        }
    }

    /// Builds the violation reported for `param`.
    ///
    /// Numeric and boolean failures record the value lower-cased.
    pub fn into_violation(self, param: &Parameter, raw: &str, schema: &SchemaDescriptor) -> Violation {
        match self {
            CheckFailure::NotNumber => Violation::invalid_number(param, &raw.to_lowercase(), schema),
            CheckFailure::NotBoolean => {
                Violation::invalid_boolean(param, &raw.to_lowercase(), schema)
            }
            CheckFailure::NotInEnum => Violation::not_in_enum(param, raw, schema),
            CheckFailure::ArrayItem {
                item,
                expected,
                item_schema,
            } => Violation::array_item_mismatch(param, &item, expected, schema, item_schema),
            CheckFailure::ObjectSchema(errors) => {
                Violation::object_schema_mismatch(param, raw, schema, errors)
            }
        }
    }
}

/// Passes iff `raw` parses as a 64-bit float (integers, decimals, exponents).
pub fn check_numeric(raw: &str) -> Option<CheckFailure<'static>> {
    raw.parse::<f64>().is_err().then_some(CheckFailure::NotNumber)
}

/// Parses a conventional boolean literal.
///
/// Accepted spellings: `1`, `t`, `T`, `TRUE`, `true`, `True` and `0`, `f`,
/// `F`, `FALSE`, `false`, `False`. Mixed case such as `tRuE` is rejected.
pub fn parse_bool_literal(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Passes iff `raw` is a boolean literal.
pub fn check_boolean(raw: &str) -> Option<CheckFailure<'static>> {
    parse_bool_literal(raw)
        .is_none()
        .then_some(CheckFailure::NotBoolean)
}

/// Passes iff `raw`, trimmed, equals one of `allowed` exactly.
pub fn check_enum(raw: &str, allowed: &[String]) -> Option<CheckFailure<'static>> {
    let trimmed = raw.trim();
    (!allowed.iter().any(|v| v == trimmed)).then_some(CheckFailure::NotInEnum)
}

/// Checks every item of a delimited array against `item_schema`.
///
/// Items run through the same dispatcher as top-level values. Each failing
/// item yields exactly one failure.
pub fn check_array_items<'s>(
    items: &[String],
    item_schema: &'s SchemaDescriptor,
    dispatcher: &Dispatcher,
) -> Vec<CheckFailure<'s>> {
    items
        .iter()
        .filter_map(|item| {
            let failures = dispatcher.failures(item, item_schema, false);
            failures.first().map(|first| CheckFailure::ArrayItem {
                item: item.clone(),
                expected: first.expected(),
                item_schema,
            })
        })
        .collect()
}
