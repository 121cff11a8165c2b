#![deny(missing_docs)]

//! # OpenAPI Document Loading
//!
//! Loads a contract once and keeps two views of it:
//! - typed shims for paths, operations and servers,
//! - the raw JSON tree, used to resolve `$ref`s anywhere in the document.

use crate::error::{AppError, AppResult};
use crate::oas::shims::ShimOpenApi;
use serde_json::Value;
use std::path::Path;

/// A parsed OpenAPI (3.x) or Swagger (2.0) document.
#[derive(Clone)]
pub struct ApiDocument {
    shim: ShimOpenApi,
    raw: Value,
}

impl ApiDocument {
    /// Parses a YAML document. JSON is valid YAML, so this accepts both.
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let raw: Value = serde_yaml::from_str(content)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))?;
        Self::from_value(raw)
    }

    /// Parses a JSON document.
    pub fn from_json_str(content: &str) -> AppResult<Self> {
        let raw: Value = serde_json::from_str(content)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI JSON: {}", e)))?;
        Self::from_value(raw)
    }

    /// Reads a document from disk, choosing the parser by file extension.
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        log::debug!("Loading OpenAPI document from {}", path.display());
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Builds a document from an already parsed JSON tree.
    pub fn from_value(raw: Value) -> AppResult<Self> {
        if !raw.is_object() {
            return Err(AppError::Parse(
                "OpenAPI document root must be an object".into(),
            ));
        }
        let shim: ShimOpenApi = serde_json::from_value(raw.clone())
            .map_err(|e| AppError::Parse(format!("Invalid OpenAPI document: {}", e)))?;
        if shim.openapi.is_none() && shim.swagger.is_none() {
            return Err(AppError::Parse(
                "Document declares neither 'openapi' nor 'swagger' version".into(),
            ));
        }
        Ok(Self { shim, raw })
    }

    /// Typed view of the document.
    pub fn shim(&self) -> &ShimOpenApi {
        &self.shim
    }

    /// Raw JSON tree of the document.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The `$self` URI, if declared.
    pub fn self_uri(&self) -> Option<&str> {
        self.shim.self_uri.as_deref()
    }

    /// Whether this is an OpenAPI 3.x document (as opposed to Swagger 2.0).
    pub fn is_oas3(&self) -> bool {
        self.shim.openapi.is_some()
    }
}
