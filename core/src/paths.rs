#![deny(missing_docs)]

//! # Path Resolution
//!
//! Matches a request's method and path against the document's path templates
//! and yields the operation (and its effective parameters) to validate.
//!
//! Resolution rules:
//! - literal segments compare exactly, `{name}` matches one non-empty segment,
//! - a trailing slash on the request is tolerated,
//! - server base paths (`servers[].url` paths, or Swagger `basePath`) may be stripped first,
//! - templates with fewer parameters win when several match.

use crate::config::ValidationOptions;
use crate::error::{AppError, AppResult};
use crate::oas::document::ApiDocument;
use crate::oas::models::Parameter;
use crate::oas::params::extract_params_for_operation;
use crate::oas::refs::resolve_ref;
use crate::oas::shims::{ShimPathItem, ShimServer};
use crate::validation::structural::{compile_parameter_schemas, SchemaDialect, StructuralValidator};
use crate::violation::Violation;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

const STANDARD_METHODS: [&str; 9] = [
    "GET", "PUT", "POST", "DELETE", "OPTIONS", "HEAD", "PATCH", "TRACE", "QUERY",
];

/// The operation a request resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOperation<'a> {
    /// The matching path template (e.g. `/pets/{id}`).
    pub template: &'a str,
    /// Upper-cased HTTP method.
    pub method: &'a str,
    /// The operation's `operationId`, if any.
    pub operation_id: Option<&'a str>,
    /// Effective parameters of the operation.
    pub parameters: &'a [Parameter],
    /// Values captured by templated segments, percent-decoded.
    pub path_values: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct OperationEntry {
    method: String,
    operation_id: Option<String>,
    parameters: Vec<Parameter>,
}

#[derive(Debug, Clone)]
struct RouteEntry {
    template: String,
    matcher: Regex,
    param_names: Vec<String>,
    base_paths: Vec<String>,
    operations: Vec<OperationEntry>,
}

impl RouteEntry {
    fn operation(&self, method: &str) -> Option<&OperationEntry> {
        self.operations
            .iter()
            .find(|op| op.method.eq_ignore_ascii_case(method))
    }

    fn capture(&self, path: &str) -> Option<Vec<(String, String)>> {
        let caps = self.matcher.captures(path)?;
        Some(
            self.param_names
                .iter()
                .zip(caps.iter().skip(1))
                .map(|(name, m)| {
                    let raw = m.map(|m| m.as_str()).unwrap_or_default();
                    (
                        name.clone(),
                        percent_decode_str(raw).decode_utf8_lossy().into_owned(),
                    )
                })
                .collect(),
        )
    }
}

/// Pre-compiled lookup from request paths to operations.
#[derive(Debug, Clone)]
pub struct PathIndex {
    routes: Vec<RouteEntry>,
    strip_base_paths: bool,
}

impl PathIndex {
    /// Compiles every path template, resolves every operation's parameters and
    /// compiles their object schemas with `structural`.
    pub fn build(
        doc: &ApiDocument,
        options: &ValidationOptions,
        structural: &dyn StructuralValidator,
    ) -> AppResult<Self> {
        let shim = doc.shim();
        let dialect = SchemaDialect::for_document(doc);
        let mut root_bases: Vec<String> = shim
            .servers
            .as_deref()
            .map(server_base_paths)
            .unwrap_or_default();
        if let Some(base) = shim.base_path.as_deref().and_then(normalize_base_path) {
            root_bases.push(base);
        }

        let mut routes = Vec::new();
        for (template, item) in &shim.paths.items {
            let item = resolve_path_item(doc, item)?;
            let mut base_paths = match item.servers.as_deref() {
                Some(servers) => server_base_paths(servers),
                None => root_bases.clone(),
            };

            let mut operations = Vec::new();
            let custom = item
                .additional_operations
                .as_ref()
                .map(|ops| ops.keys().cloned().collect::<Vec<_>>())
                .unwrap_or_default();
            let methods = STANDARD_METHODS
                .iter()
                .map(|m| m.to_string())
                .chain(custom.into_iter().map(|m| m.to_ascii_uppercase()));
            for method in methods {
                let Some(op) = item.operation(&method) else {
                    continue;
                };
                if let Some(servers) = op.servers.as_deref() {
                    for base in server_base_paths(servers) {
                        if !base_paths.contains(&base) {
                            base_paths.push(base);
                        }
                    }
                }
                let mut parameters = extract_params_for_operation(doc, &item, op)?;
                compile_parameter_schemas(&mut parameters, structural, dialect).map_err(
                    |e| match e {
                        AppError::Schema(msg) => {
                            AppError::Schema(format!("{} {}: {}", method, template, msg))
                        }
                        other => other,
                    },
                )?;
                operations.push(OperationEntry {
                    method,
                    operation_id: op.operation_id.clone(),
                    parameters,
                });
            }

            let (matcher, param_names) = compile_template(template)?;
            routes.push(RouteEntry {
                template: template.clone(),
                matcher,
                param_names,
                base_paths,
                operations,
            });
        }

        // Most specific templates first.
        routes.sort_by_key(|r| r.param_names.len());
        log::debug!("Indexed {} path templates", routes.len());

        Ok(Self {
            routes,
            strip_base_paths: options.strip_server_base_paths,
        })
    }

    /// Resolves a request to an operation.
    ///
    /// On failure returns a single `PathNotFound` or `OperationNotFound` violation.
    pub fn resolve(&self, method: &str, path: &str) -> Result<ResolvedOperation<'_>, Vec<Violation>> {
        let mut path_matched: Option<&RouteEntry> = None;

        for route in &self.routes {
            let Some(path_values) = self.match_route(route, path) else {
                continue;
            };
            match route.operation(method) {
                Some(op) => {
                    log::debug!("{} {} resolved to '{}'", method, path, route.template);
                    return Ok(ResolvedOperation {
                        template: &route.template,
                        method: &op.method,
                        operation_id: op.operation_id.as_deref(),
                        parameters: &op.parameters,
                        path_values,
                    });
                }
                None => {
                    path_matched.get_or_insert(route);
                }
            }
        }

        let violation = match path_matched {
            Some(route) => Violation::operation_not_found(method, path, &route.template),
            None => Violation::path_not_found(method, path),
        };
        Err(vec![violation])
    }

    fn match_route(&self, route: &RouteEntry, path: &str) -> Option<Vec<(String, String)>> {
        if self.strip_base_paths {
            for base in &route.base_paths {
                if let Some(values) = strip_base(path, base).and_then(|rest| route.capture(rest)) {
                    return Some(values);
                }
            }
        }
        route.capture(path)
    }
}

fn resolve_path_item(doc: &ApiDocument, item: &ShimPathItem) -> AppResult<ShimPathItem> {
    let Some(ref_path) = item.ref_path.as_deref() else {
        return Ok(item.clone());
    };
    let target = resolve_ref(doc.raw(), ref_path, doc.self_uri())?;
    serde_json::from_value(target.clone()).map_err(|e| {
        AppError::Reference(format!(
            "Reference '{}' is not a valid Path Item Object: {}",
            ref_path, e
        ))
    })
}

/// Builds an anchored regex for a path template.
///
/// Returns the regex and the names of the templated segments, in order.
fn compile_template(template: &str) -> AppResult<(Regex, Vec<String>)> {
    let trimmed = if template.len() > 1 {
        template.trim_end_matches('/')
    } else {
        template
    };

    let mut pattern = String::from("^");
    let mut names = Vec::new();
    let mut rest = trimmed;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|c| open + c) else {
            break;
        };
        pattern.push_str(&regex::escape(&rest[..open]));
        pattern.push_str("([^/]+)");
        names.push(rest[open + 1..close].to_string());
        rest = &rest[close + 1..];
    }
    pattern.push_str(&regex::escape(rest));
    if trimmed != "/" {
        pattern.push_str("/?");
    }
    pattern.push('$');

    let re = Regex::new(&pattern).map_err(|e| {
        AppError::General(format!("Invalid path template '{}': {}", template, e))
    })?;
    Ok((re, names))
}

/// Extracts the base paths from a list of servers, substituting variable defaults.
fn server_base_paths(servers: &[ShimServer]) -> Vec<String> {
    servers
        .iter()
        .filter_map(|server| {
            let mut url = server.url.clone();
            if let Some(vars) = &server.variables {
                for (name, var) in vars {
                    url = url.replace(&format!("{{{}}}", name), &var.default);
                }
            }
            let path = match Url::parse(&url) {
                Ok(parsed) => parsed.path().to_string(),
                Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
            };
            normalize_base_path(&path)
        })
        .collect()
}

/// Normalizes a base path to `/segment...` without trailing slash.
/// The root path yields `None` since there is nothing to strip.
fn normalize_base_path(path: &str) -> Option<String> {
    let trimmed = path.trim().trim_matches('/');
    (!trimmed.is_empty()).then(|| format!("/{}", trimmed))
}

fn strip_base<'p>(path: &'p str, base: &str) -> Option<&'p str> {
    let rest = path.strip_prefix(base)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
