//! Well-known error codes and their HTTP translation

use std::collections::HashMap;
use std::sync::LazyLock;

use http::StatusCode;
use serde::{Deserialize, Serialize};

pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
pub const BAD_REQUEST: &str = "BAD_REQUEST";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const FORBIDDEN: &str = "FORBIDDEN";

static BUILTIN: LazyLock<ErrorCatalog> = LazyLock::new(ErrorCatalog::new);

/// HTTP translation of one failure category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDefinition {
    /// Application error code, e.g. `NOT_FOUND`
    pub error_code: String,
    /// HTTP status code
    pub status_code: u16,
    /// Human readable message sent to API consumers
    pub message: String,
}

impl ErrorDefinition {
    pub fn new(error_code: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Status as an [`http::StatusCode`], falling back to 500 for codes outside the valid range
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Rejected catalog extension
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Built-in definitions are fixed
    #[error("error code `{0}` is built in and cannot be redefined")]
    BuiltinOverride(String),

    /// Catalog entries must describe client or server errors
    #[error("error code `{code}` has status {status}, expected 400-599")]
    InvalidStatus {
        /// Offending error code
        code: String,
        /// Offending status
        status: u16,
    },

    #[error("error code must not be empty")]
    EmptyCode,
}

/// Read-only mapping from error code to [`ErrorDefinition`]
///
/// Built once at startup and shared by reference. Lookups never fail:
/// unknown codes resolve to the `INTERNAL_SERVER_ERROR` definition.
#[derive(Debug, Clone)]
pub struct ErrorCatalog {
    definitions: HashMap<String, ErrorDefinition>,
    fallback: ErrorDefinition,
}

impl ErrorCatalog {
    /// Catalog holding only the built-in definitions
    pub fn new() -> Self {
        let fallback = ErrorDefinition::new(INTERNAL_SERVER_ERROR, 500, "An unexpected error occurred on the server.");

        let definitions = [
            fallback.clone(),
            ErrorDefinition::new(
                BAD_REQUEST,
                400,
                "The request is malformed or contains invalid parameters.",
            ),
            ErrorDefinition::new(NOT_FOUND, 404, "Requested resource is not found."),
            ErrorDefinition::new(UNAUTHORIZED, 401, "Authentication required."),
            ErrorDefinition::new(FORBIDDEN, 403, "Access denied."),
        ]
        .into_iter()
        .map(|definition| (definition.error_code.clone(), definition))
        .collect();

        Self { definitions, fallback }
    }

    /// Process-wide copy of the built-in catalog
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Register an application specific definition
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty, shadows a built-in code, or
    /// carries a status outside 400-599
    pub fn with_definition(mut self, definition: ErrorDefinition) -> Result<Self, CatalogError> {
        if definition.error_code.is_empty() {
            return Err(CatalogError::EmptyCode);
        }

        if BUILTIN.definitions.contains_key(&definition.error_code) {
            return Err(CatalogError::BuiltinOverride(definition.error_code));
        }

        if !(400..=599).contains(&definition.status_code) {
            return Err(CatalogError::InvalidStatus {
                code: definition.error_code,
                status: definition.status_code,
            });
        }

        self.definitions.insert(definition.error_code.clone(), definition);
        Ok(self)
    }

    /// Resolve an error code, defaulting to the internal error definition
    pub fn lookup(&self, error_code: &str) -> &ErrorDefinition {
        self.definitions.get(error_code).unwrap_or(&self.fallback)
    }

    /// The `INTERNAL_SERVER_ERROR` definition
    pub const fn internal(&self) -> &ErrorDefinition {
        &self.fallback
    }

    /// Number of registered definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        Self::new()
    }
}
