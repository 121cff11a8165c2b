#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Resolves `$ref` targets inside the current document, with respect to the
//! OAS 3.2 `$self` URI.
//!
//! These utilities never fetch external documents. Absolute or relative
//! references are treated as local when their document part matches the
//! current document's `$self`.

use crate::error::{AppError, AppResult};
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use std::path::Path;
use url::Url;

/// Normalizes a `$ref` to a local JSON Pointer fragment (e.g. `#/components/...`)
/// if it targets the current document as identified by `$self`.
///
/// Returns `None` if the reference is external or lacks a fragment.
pub(crate) fn normalize_ref_to_local(ref_str: &str, self_uri: Option<&str>) -> Option<String> {
    if ref_str.starts_with("#/") || ref_str == "#" {
        return Some(ref_str.to_string());
    }

    let (document, fragment) = ref_str.split_once('#')?;
    let self_uri = self_uri?;
    if ref_doc_matches_self(document, self_uri) {
        return Some(format!("#{}", fragment));
    }
    None
}

/// Extracts a component name from a `$ref` if it points to `#/components/{section}/{name}`.
pub(crate) fn extract_component_name(
    ref_str: &str,
    self_uri: Option<&str>,
    section: &str,
) -> Option<String> {
    let local = normalize_ref_to_local(ref_str, self_uri)?;
    let pointer = local.trim_start_matches('#').trim_start_matches('/');
    let segments: Vec<&str> = pointer.split('/').collect();

    if segments.len() != 3 || segments[0] != "components" || segments[1] != section {
        return None;
    }

    let name = decode_pointer_segment(segments[2]);
    (!name.is_empty()).then_some(name)
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent-encoding).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded).decode_utf8_lossy().into_owned()
}

/// Looks up a `$ref` in `root`.
pub(crate) fn resolve_ref<'a>(
    root: &'a Value,
    ref_str: &str,
    self_uri: Option<&str>,
) -> AppResult<&'a Value> {
    let local = normalize_ref_to_local(ref_str, self_uri)
        .ok_or_else(|| AppError::Reference(format!("External reference '{}'", ref_str)))?;
    let pointer = local.trim_start_matches('#');

    let mut current = root;
    for segment in pointer.split('/').skip(1) {
        let key = decode_pointer_segment(segment);
        current = match current {
            Value::Object(map) => map.get(&key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
        .ok_or_else(|| AppError::Reference(format!("Unresolvable reference '{}'", ref_str)))?;
    }
    Ok(current)
}

/// Returns a copy of `value` with every local `$ref` replaced by its target.
///
/// Recursive references are left as a bare `{}` (accept-anything) schema
/// once the cycle is detected, so the result is always finite.
pub(crate) fn inline_refs(value: &Value, root: &Value, self_uri: Option<&str>) -> AppResult<Value> {
    let mut visiting = Vec::new();
    inline_refs_inner(value, root, self_uri, &mut visiting)
}

fn inline_refs_inner(
    value: &Value,
    root: &Value,
    self_uri: Option<&str>,
    visiting: &mut Vec<String>,
) -> AppResult<Value> {
    match value {
        Value::Object(map) => {
            if let Some(ref_str) = map.get("$ref").and_then(Value::as_str) {
                if visiting.iter().any(|seen| seen == ref_str) {
                    log::debug!("Recursive reference '{}' truncated", ref_str);
                    return Ok(Value::Object(Map::new()));
                }
                let target = resolve_ref(root, ref_str, self_uri)?;
                visiting.push(ref_str.to_string());
                let resolved = inline_refs_inner(target, root, self_uri, visiting);
                visiting.pop();
                return resolved;
            }

            let mut out = Map::with_capacity(map.len());
            for (key, child) in map {
                out.insert(
                    key.clone(),
                    inline_refs_inner(child, root, self_uri, visiting)?,
                );
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .iter()
            .map(|child| inline_refs_inner(child, root, self_uri, visiting))
            .collect::<AppResult<Vec<_>>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

fn ref_doc_matches_self(ref_doc: &str, self_uri: &str) -> bool {
    if ref_doc == self_uri {
        return true;
    }

    if let (Ok(ref_url), Ok(self_url)) = (Url::parse(ref_doc), Url::parse(self_uri)) {
        return ref_url.scheme() == self_url.scheme()
            && ref_url.host() == self_url.host()
            && ref_url.port() == self_url.port()
            && ref_url.path() == self_url.path();
    }

    // If `$self` is an absolute-path reference (e.g. "/api/openapi"), compare path.
    if self_uri.starts_with('/') {
        if let Ok(ref_url) = Url::parse(ref_doc) {
            return ref_url.path() == self_uri;
        }
    }

    if !self_uri.contains("://") && !ref_doc.contains("://") {
        return Path::new(ref_doc) == Path::new(self_uri);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_ref_local_passthrough() {
        let normalized = normalize_ref_to_local("#/components/schemas/User", None).unwrap();
        assert_eq!(normalized, "#/components/schemas/User");
    }

    #[test]
    fn test_normalize_ref_self_absolute_match() {
        let self_uri = Some("https://example.com/openapi.yaml");
        let ref_str = "https://example.com/openapi.yaml#/components/schemas/User";
        let normalized = normalize_ref_to_local(ref_str, self_uri).unwrap();
        assert_eq!(normalized, "#/components/schemas/User");
    }

    #[test]
    fn test_normalize_ref_external_is_none() {
        let ref_str = "https://other.example.com/api.yaml#/components/schemas/User";
        assert!(normalize_ref_to_local(ref_str, Some("https://example.com/openapi.yaml")).is_none());
        assert!(normalize_ref_to_local("common.yaml#/Foo", None).is_none());
    }

    #[test]
    fn test_extract_component_name_success() {
        let self_uri = Some("https://example.com/openapi.yaml");
        let ref_str = "https://example.com/openapi.yaml#/components/parameters/Limit";
        let name = extract_component_name(ref_str, self_uri, "parameters").unwrap();
        assert_eq!(name, "Limit");
    }

    #[test]
    fn test_extract_component_name_wrong_section() {
        let name = extract_component_name("#/components/responses/Limit", None, "parameters");
        assert!(name.is_none());
    }

    #[test]
    fn test_decode_pointer_segment_percent_encoding() {
        let decoded = decode_pointer_segment("User%20Profile~1details");
        assert_eq!(decoded, "User Profile/details");
    }

    #[test]
    fn test_resolve_ref_walks_pointer() {
        let root = json!({"components": {"schemas": {"Id": {"type": "integer"}}}});
        let target = resolve_ref(&root, "#/components/schemas/Id", None).unwrap();
        assert_eq!(target, &json!({"type": "integer"}));

        let err = resolve_ref(&root, "#/components/schemas/Missing", None).unwrap_err();
        assert!(matches!(err, AppError::Reference(_)));
    }

    #[test]
    fn test_inline_refs_nested_and_recursive() {
        let root = json!({
            "components": {"schemas": {
                "Id": {"type": "integer"},
                "Node": {"type": "object", "properties": {"next": {"$ref": "#/components/schemas/Node"}}}
            }}
        });
        let schema = json!({"type": "array", "items": {"$ref": "#/components/schemas/Id"}});
        let inlined = inline_refs(&schema, &root, None).unwrap();
        assert_eq!(inlined, json!({"type": "array", "items": {"type": "integer"}}));

        let node = inline_refs(&json!({"$ref": "#/components/schemas/Node"}), &root, None).unwrap();
        assert_eq!(node["properties"]["next"], json!({}));
    }
}
