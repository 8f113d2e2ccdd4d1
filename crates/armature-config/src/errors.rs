use std::collections::HashMap;

use armature_core::{CatalogError, ErrorCatalog, ErrorDefinition};
use serde::Deserialize;

/// Application specific error definitions layered over the built-in catalog
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorsConfig {
    /// Definitions keyed by error code
    #[serde(default)]
    pub definitions: HashMap<String, ErrorDefinitionConfig>,
}

/// A single configured error definition
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorDefinitionConfig {
    /// HTTP status between 400 and 599
    pub status_code: u16,
    /// Client facing message
    pub message: String,
}

impl ErrorsConfig {
    /// Build the error catalog: built-in entries plus configured definitions
    ///
    /// # Errors
    ///
    /// Returns an error if a definition overrides a built-in code or uses a
    /// status code outside 400-599
    pub fn catalog(&self) -> Result<ErrorCatalog, CatalogError> {
        let mut codes: Vec<_> = self.definitions.keys().collect();
        codes.sort();

        codes.into_iter().try_fold(ErrorCatalog::new(), |catalog, code| {
            let def = &self.definitions[code];
            catalog.with_definition(ErrorDefinition::new(code.as_str(), def.status_code, def.message.as_str()))
        })
    }
}
