//! Shared types for Armature
//!
//! Holds the error catalog, the failure taxonomy and its classification,
//! the JSON response envelopes, and the authenticated identity that the
//! gate hands to handlers. Nothing in here performs I/O.

#![allow(clippy::must_use_candidate)]

pub mod catalog;
mod classify;
mod context;
mod envelope;
mod environment;
mod failure;

pub use catalog::{CatalogError, ErrorCatalog, ErrorDefinition};
pub use classify::{Classification, classify};
pub use context::{Claims, Identity, IdentityError};
pub use envelope::{DebugInfo, ResponseError, ResponseSuccess};
pub use environment::Environment;
pub use failure::{Failure, FrameworkError, FrameworkKind, HttpFailure, RaisedFailure, ServiceError, UnknownError};
