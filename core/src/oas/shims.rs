#![deny(missing_docs)]

//! # Document Shims
//!
//! Structures acting as an Intermediate Deserialization Layer.
//! These structs map directly to the OpenAPI YAML objects the validator reads
//! (paths, operations, parameters, servers); everything else is kept as raw
//! JSON so that `$ref`s can be resolved against the whole tree.
//!
//! Note: shims holding `utoipa::RefOr` do not derive `Debug`.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::openapi::RefOr;

/// Schema for the root document.
#[derive(Deserialize, Clone)]
pub struct ShimOpenApi {
    /// OpenAPI version (e.g. "3.1.0").
    pub openapi: Option<String>,

    /// Swagger version (e.g. "2.0") for legacy documents.
    pub swagger: Option<String>,

    /// The `$self` keyword (OAS 3.2+).
    #[serde(rename = "$self")]
    pub self_uri: Option<String>,

    /// Server configuration (OAS 3.x).
    #[serde(default)]
    pub servers: Option<Vec<ShimServer>>,

    /// Base path (Swagger 2.0).
    #[serde(rename = "basePath")]
    pub base_path: Option<String>,

    /// Path items.
    #[serde(default)]
    pub paths: ShimPaths,
}

/// The Paths Object. `x-` keys are not path templates and are dropped.
#[derive(Clone, Default)]
pub struct ShimPaths {
    /// Parsed path items keyed by path template.
    pub items: BTreeMap<String, ShimPathItem>,
}

impl<'de> Deserialize<'de> for ShimPaths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let items = raw
            .into_iter()
            .filter(|(template, _)| !template.starts_with("x-"))
            .map(|(template, value)| {
                serde_json::from_value::<ShimPathItem>(value)
                    .map(|item| (template.clone(), item))
                    .map_err(|e| {
                        DeError::custom(format!("Invalid path item '{}': {}", template, e))
                    })
            })
            .collect::<Result<BTreeMap<_, _>, D::Error>>()?;
        Ok(Self { items })
    }
}

/// An object representing a Server.
#[derive(Deserialize, Clone, Debug)]
pub struct ShimServer {
    /// A URL to the target host, possibly relative and templated.
    pub url: String,
    /// A map between a variable name and its value.
    #[serde(default)]
    pub variables: Option<BTreeMap<String, ShimServerVariable>>,
}

/// An object representing a Server Variable.
#[derive(Deserialize, Clone, Debug)]
pub struct ShimServerVariable {
    /// The default value to use for substitution.
    pub default: String,
}

/// A Path Item containing operations for a specific URL.
#[derive(Deserialize, Clone)]
pub struct ShimPathItem {
    /// Allows for a referenced definition of this path item.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,
    /// Alternative server array for this path item.
    pub servers: Option<Vec<ShimServer>>,
    /// Parameters common to all operations in this path.
    #[serde(default)]
    pub parameters: Option<Vec<RefOr<ShimParameter>>>,
    /// GET operation.
    pub get: Option<ShimOperation>,
    /// POST operation.
    pub post: Option<ShimOperation>,
    /// PUT operation.
    pub put: Option<ShimOperation>,
    /// DELETE operation.
    pub delete: Option<ShimOperation>,
    /// PATCH operation.
    pub patch: Option<ShimOperation>,
    /// OPTIONS operation.
    pub options: Option<ShimOperation>,
    /// HEAD operation.
    pub head: Option<ShimOperation>,
    /// TRACE operation.
    pub trace: Option<ShimOperation>,
    /// QUERY operation (OAS 3.2+).
    pub query: Option<ShimOperation>,
    /// Map of additional operations keyed by custom HTTP methods.
    #[serde(rename = "additionalOperations")]
    pub additional_operations: Option<BTreeMap<String, ShimOperation>>,
}

impl ShimPathItem {
    /// Looks up the operation for an HTTP method (case-insensitive).
    pub fn operation(&self, method: &str) -> Option<&ShimOperation> {
        let op = match method.to_ascii_lowercase().as_str() {
            "get" => self.get.as_ref(),
            "post" => self.post.as_ref(),
            "put" => self.put.as_ref(),
            "delete" => self.delete.as_ref(),
            "patch" => self.patch.as_ref(),
            "options" => self.options.as_ref(),
            "head" => self.head.as_ref(),
            "trace" => self.trace.as_ref(),
            "query" => self.query.as_ref(),
            _ => None,
        };
        op.or_else(|| {
            self.additional_operations
                .as_ref()?
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(method))
                .map(|(_, op)| op)
        })
    }
}

/// A single HTTP Operation definition.
#[derive(Deserialize, Clone)]
pub struct ShimOperation {
    /// Unique identifier for the operation.
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,
    /// Operation-specific parameters.
    #[serde(default)]
    pub parameters: Option<Vec<RefOr<ShimParameter>>>,
    /// Alternative server array for this operation.
    #[serde(default)]
    pub servers: Option<Vec<ShimServer>>,
}

/// A local shim for Parameter objects.
///
/// `schema` stays raw so that multi-type (`type: [integer, "null"]`) and
/// OAS 3.0 `nullable` schemas survive deserialization untouched.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ShimParameter {
    /// Name of the parameter.
    pub name: String,
    /// Location of the parameter (query, path, header, cookie).
    #[serde(rename = "in")]
    pub parameter_in: String,
    /// Whether the parameter is required.
    #[serde(default)]
    pub required: bool,
    /// Whether the parameter is deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Schema definition (raw). Absent for `content`-described parameters.
    pub schema: Option<Value>,
    /// Serialization style.
    pub style: Option<String>,
    /// Explode modifier.
    pub explode: Option<bool>,
}
