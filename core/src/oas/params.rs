#![deny(missing_docs)]

//! # Parameter Resolution
//!
//! Resolves the parameters that apply to one operation: path-item level
//! parameters merged with operation level ones, `$ref`s resolved, and the
//! OAS 3.x `style`/`explode` defaults applied.

use crate::error::{AppError, AppResult};
use crate::oas::document::ApiDocument;
use crate::oas::models::{default_explode, default_style, ParamLocation, ParamStyle, Parameter};
use crate::oas::refs::{extract_component_name, resolve_ref};
use crate::oas::schema::build_schema_descriptor;
use crate::oas::shims::{ShimOperation, ShimParameter, ShimPathItem};
use std::collections::HashSet;
use utoipa::openapi::RefOr;

/// Extracts the effective parameter list for `operation`.
///
/// Path-item parameters come first, followed by the operation's own. An
/// operation parameter sharing the `(name, in)` pair of a path-item parameter
/// replaces it, and the replaced entry is dropped from the path-item part.
pub fn extract_params_for_operation(
    doc: &ApiDocument,
    path_item: &ShimPathItem,
    operation: &ShimOperation,
) -> AppResult<Vec<Parameter>> {
    let common_params = resolve_parameters(doc, path_item.parameters.as_deref().unwrap_or(&[]))?;
    let op_params = resolve_parameters(doc, operation.parameters.as_deref().unwrap_or(&[]))?;

    let overridden: HashSet<(&str, ParamLocation)> = op_params
        .iter()
        .map(|p| (p.name.as_str(), p.location))
        .collect();

    let mut params: Vec<Parameter> = common_params
        .into_iter()
        .filter(|p| !overridden.contains(&(p.name.as_str(), p.location)))
        .collect();
    params.extend(op_params);
    Ok(params)
}

/// Resolves a list of OpenAPI parameters into [`Parameter`]s.
///
/// Duplicate `(name, in)` pairs within one list are a contract error.
/// Parameters in locations this crate does not model are skipped.
pub fn resolve_parameters(
    doc: &ApiDocument,
    params: &[RefOr<ShimParameter>],
) -> AppResult<Vec<Parameter>> {
    let mut result = Vec::new();
    let mut seen = HashSet::new();
    for param_or_ref in params {
        let param = match param_or_ref {
            RefOr::T(param) => param.clone(),
            RefOr::Ref(r) => resolve_parameter_ref(doc, &r.ref_location)?,
        };

        let Some(location) = ParamLocation::parse(&param.parameter_in) else {
            log::debug!(
                "Skipping parameter '{}' in unsupported location '{}'",
                param.name,
                param.parameter_in
            );
            continue;
        };

        if !seen.insert((param.name.clone(), location)) {
            return Err(AppError::General(format!(
                "Duplicate parameter '{}' in location '{}'",
                param.name, location
            )));
        }
        result.push(process_parameter(doc, &param, location)?);
    }
    Ok(result)
}

/// Resolves a `Ref` to its target Parameter definition.
fn resolve_parameter_ref(doc: &ApiDocument, ref_location: &str) -> AppResult<ShimParameter> {
    if extract_component_name(ref_location, doc.self_uri(), "parameters").is_none() {
        log::warn!(
            "Parameter reference '{}' does not point into components/parameters",
            ref_location
        );
    }
    let target = resolve_ref(doc.raw(), ref_location, doc.self_uri())?;
    serde_json::from_value(target.clone()).map_err(|e| {
        AppError::Reference(format!(
            "Reference '{}' is not a valid Parameter Object: {}",
            ref_location, e
        ))
    })
}

fn process_parameter(
    doc: &ApiDocument,
    param: &ShimParameter,
    location: ParamLocation,
) -> AppResult<Parameter> {
    let style = resolve_style(param, location);
    let explode = param.explode.unwrap_or_else(|| default_explode(style));

    // Parameters described through `content` carry no schema for this validator.
    let schema = match &param.schema {
        Some(raw) => Some(build_schema_descriptor(raw, doc.raw(), doc.self_uri())?),
        None => None,
    };

    Ok(Parameter {
        name: param.name.clone(),
        location,
        schema,
        style,
        explode,
        required: param.required || location == ParamLocation::Path,
        deprecated: param.deprecated,
    })
}

fn resolve_style(param: &ShimParameter, location: ParamLocation) -> ParamStyle {
    let Some(style) = param.style.as_deref() else {
        return default_style(location);
    };
    match style {
        "matrix" => ParamStyle::Matrix,
        "label" => ParamStyle::Label,
        "form" => ParamStyle::Form,
        "cookie" => ParamStyle::Cookie,
        "simple" => ParamStyle::Simple,
        "spaceDelimited" => ParamStyle::SpaceDelimited,
        "pipeDelimited" => ParamStyle::PipeDelimited,
        "deepObject" => ParamStyle::DeepObject,
        other => {
            log::warn!(
                "Unknown style '{}' on parameter '{}', using the '{}' default",
                other,
                param.name,
                location
            );
            default_style(location)
        }
    }
}
