use http::StatusCode;
use serde_json::{Map, Value};

use crate::catalog::{ErrorCatalog, ErrorDefinition};
use crate::failure::Failure;

/// Resolved HTTP translation of a [`Failure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: StatusCode,
    pub error_code: String,
    pub message: String,
    pub data: Value,
    /// Raiser supplied debug payload, only ever set for [`Failure::Http`]
    pub debug_data: Option<Value>,
}

impl Classification {
    fn from_definition(definition: &ErrorDefinition, data: Value) -> Self {
        Self {
            status: definition.status(),
            error_code: definition.error_code.clone(),
            message: definition.message.clone(),
            data,
            debug_data: None,
        }
    }
}

/// Map a failure onto its catalog entry or raiser supplied fields
///
/// Pure and infallible; unknown failures resolve to the internal error
/// definition with empty data so nothing internal reaches the caller.
pub fn classify(failure: &Failure, catalog: &ErrorCatalog) -> Classification {
    match failure {
        Failure::Service(error) => Classification::from_definition(catalog.lookup(&error.error_code), error.data.clone()),
        Failure::Http(error) => {
            let fallback = catalog.internal();
            Classification {
                status: error.status_code.unwrap_or_else(|| fallback.status()),
                error_code: non_empty(error.error_code.as_deref()).unwrap_or(&fallback.error_code).to_owned(),
                message: non_empty(error.message.as_deref()).unwrap_or(&fallback.message).to_owned(),
                data: error.data.clone(),
                debug_data: error.debug_data.clone(),
            }
        }
        Failure::Framework(error) => {
            let definition = catalog.lookup(error.kind.error_code());
            let mut classification = Classification::from_definition(definition, empty_object());
            if let Some(message) = non_empty(error.message.as_deref()) {
                message.clone_into(&mut classification.message);
            }
            classification
        }
        Failure::Unknown(_) => Classification::from_definition(catalog.internal(), empty_object()),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
