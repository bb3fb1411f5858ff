//! fabops-core - Shared types for the fabops bulk-operations toolkit.
//!
//! Everything here is boundary data: credentials and configuration for one
//! process run, the error taxonomy, entity references with their concurrency
//! tokens, batch-run accounting, and the declarative rule-definition payloads
//! accepted by the platform's rule engine.

pub mod batch;
pub mod config;
pub mod entity;
pub mod error;
pub mod rules;

pub use batch::{BatchReport, RowFailure, RowOutcome};
pub use config::{ApiUrl, AuthStyle, Config, Credentials};
pub use entity::{EntityId, EntityRef, Etag};
pub use error::{ApiError, AuthError, ConfigError, DataError, Error, TransportError};
pub use rules::{RuleDefinition, RuleErrorState, RuleEventType, RuleTarget, RuleType};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
