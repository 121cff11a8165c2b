#![deny(missing_docs)]

//! # Validation Options
//!
//! Knobs that change how a validation pass treats the contract.

/// Options controlling a [`crate::ParamValidator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Assert JSON Schema `format` keywords (e.g. `email`, `date`) during
    /// structural validation of object parameters.
    pub format_assertions: bool,
    /// Strip the path component of declared `servers` URLs from the request
    /// path before matching it against path templates.
    pub strip_server_base_paths: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            format_assertions: false,
            strip_server_base_paths: true,
        }
    }
}

impl ValidationOptions {
    /// Enables or disables `format` assertions.
    pub fn with_format_assertions(mut self, enabled: bool) -> Self {
        self.format_assertions = enabled;
        self
    }

    /// Enables or disables server base path stripping.
    pub fn with_server_base_paths(mut self, enabled: bool) -> Self {
        self.strip_server_base_paths = enabled;
        self
    }
}
