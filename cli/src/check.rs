#![deny(missing_docs)]

//! # Check Command
//!
//! Validates the cookies of one described request against an OpenAPI document.

use std::io::Write;
use std::path::PathBuf;

use cdd_paramcheck::{ApiDocument, ParamValidator, RawRequest, ValidationOptions, Violation};

use crate::error::{CliError, CliResult};

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the OpenAPI document (YAML or JSON).
    #[clap(long, env = "CDD_PARAMCHECK_SPEC", default_value = "docs/openapi.yaml")]
    pub spec: PathBuf,

    /// HTTP method of the request.
    #[clap(long, default_value = "GET")]
    pub method: String,

    /// Request path; a query string is ignored.
    #[clap(long)]
    pub path: String,

    /// A cookie as `name=value`. May be repeated.
    #[clap(long = "cookie", value_name = "NAME=VALUE")]
    pub cookies: Vec<String>,

    /// A raw `Cookie` header value, e.g. `a=1; b=2`.
    #[clap(long)]
    pub cookie_header: Option<String>,

    /// Assert `format` keywords during structural validation.
    #[clap(long)]
    pub format_assertions: bool,

    /// Match paths exactly, without stripping server base paths.
    #[clap(long)]
    pub no_strip_base_path: bool,

    /// Print violations as JSON.
    #[clap(long)]
    pub json: bool,
}

/// Outcome of a check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// Whether the request passed.
    pub passed: bool,
    /// Every violation found.
    pub violations: Vec<Violation>,
}

/// Executes the check.
pub fn execute(args: &CheckArgs) -> CliResult<CheckReport> {
    if !args.spec.exists() {
        return Err(CliError::General(format!(
            "OpenAPI file not found: {:?}",
            args.spec
        )));
    }

    let doc = ApiDocument::from_path(&args.spec)?;
    let options = ValidationOptions::default()
        .with_format_assertions(args.format_assertions)
        .with_server_base_paths(!args.no_strip_base_path);
    let validator = ParamValidator::with_options(&doc, options)?;

    let request = build_request(args)?;
    tracing::debug!(method = %args.method, path = %args.path, "validating request");
    let (passed, violations) = validator.validate_cookie_params(&request);

    Ok(CheckReport { passed, violations })
}

fn build_request(args: &CheckArgs) -> CliResult<RawRequest> {
    let mut request = RawRequest::new(args.method.as_str(), &args.path);
    if let Some(header) = &args.cookie_header {
        request = request.with_cookie_header(header);
    }
    for pair in &args.cookies {
        let Some((name, value)) = pair.split_once('=') else {
            return Err(CliError::General(format!(
                "Invalid cookie '{}', expected NAME=VALUE",
                pair
            )));
        };
        request = request.with_cookie(name.trim(), value);
    }
    Ok(request)
}

/// Writes the report, as text or JSON.
pub fn render(report: &CheckReport, json: bool, out: &mut impl Write) -> CliResult<()> {
    if json {
        let body = serde_json::json!({
            "passed": report.passed,
            "violations": report.violations,
        });
        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| CliError::General(format!("Failed to serialize report: {}", e)))?;
        writeln!(out, "{}", text)?;
        return Ok(());
    }

    if report.passed {
        writeln!(out, "PASS")?;
        return Ok(());
    }

    writeln!(out, "FAIL ({} violation(s))", report.violations.len())?;
    for v in &report.violations {
        writeln!(out, "- [{:?}] {}", v.kind, v.message)?;
        writeln!(out, "    reason: {}", v.reason)?;
        writeln!(out, "    fix:    {}", v.how_to_fix)?;
        for e in &v.schema_errors {
            writeln!(out, "    at '{}': {}", e.instance_path, e.message)?;
        }
    }
    Ok(())
}
