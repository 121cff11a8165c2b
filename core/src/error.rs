//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! These errors describe failures to *load* a contract (unreadable files,
//! malformed YAML, dangling references). Invalid request values are never
//! errors; they are reported as [`crate::violation::Violation`]s.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The OpenAPI document could not be parsed as YAML or JSON.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// A `$ref` could not be resolved inside the current document.
    #[from(ignore)]
    #[display("Reference Error: {_0}")]
    Reference(String),

    /// A parameter schema could not be compiled for structural validation.
    #[from(ignore)]
    #[display("Schema Error: {_0}")]
    Schema(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
