//! Error types for the fabops toolkit.
//!
//! A unified error type with one variant per failure domain, so an operator
//! can always tell which external dependency failed: local configuration,
//! the identity provider, the network, the platform API, or the input data.

use std::fmt;
use thiserror::Error;

/// The unified error type for fabops operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required configuration or credential value is missing or invalid.
    /// Raised before any network call is attempted.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The identity provider rejected the credentials or returned a
    /// malformed token response.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Network-level failure (DNS, connection, timeout, non-2xx HTTP).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The platform accepted the request but rejected the operation
    /// (GraphQL `errors` array present).
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Malformed or missing field in an input row, or a human-readable key
    /// that resolves to no platform entity.
    #[error("data error: {0}")]
    Data(#[from] DataError),
}

impl Error {
    /// True for errors that nothing later in a batch can recover from.
    ///
    /// A batch driver aborts on these; everything else is recorded per row
    /// and the run continues.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Auth(_))
    }
}

/// Configuration errors raised before any work is done.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable or flag is absent.
    #[error("missing required setting {name}")]
    Missing { name: &'static str },

    /// A setting was present but could not be parsed.
    #[error("invalid value for {name}: '{value}' ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// The API base URL failed validation.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },
}

/// Authentication failures from the identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint returned a non-success status.
    #[error("identity provider rejected the client credentials (HTTP {status})")]
    Rejected { status: u16 },

    /// The token response parsed but carried no access token.
    #[error("token response from identity provider has no access_token field")]
    MissingAccessToken,

    /// The token response body was not valid JSON.
    #[error("malformed token response from identity provider: {reason}")]
    MalformedResponse { reason: String },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status before any GraphQL-level
    /// payload could be parsed.
    #[error("HTTP {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// A single entry from a GraphQL `errors` array.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct GraphqlErrorEntry {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
}

/// The platform rejected the specific operation: validation failure,
/// optimistic-concurrency conflict, or permission denial.
#[derive(Debug)]
pub struct ApiError {
    /// Parsed GraphQL errors, in response order.
    pub errors: Vec<GraphqlErrorEntry>,
}

impl ApiError {
    pub fn new(errors: Vec<GraphqlErrorEntry>) -> Self {
        Self { errors }
    }

    /// Build an error for a response that had neither `data` nor `errors`.
    pub fn missing_data() -> Self {
        Self {
            errors: vec![GraphqlErrorEntry {
                message: "response carried no data field".to_string(),
                path: None,
            }],
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "platform rejected the operation")?;
        for entry in &self.errors {
            write!(f, "; {}", entry.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Input-data errors, reported per row and never fatal to a batch.
#[derive(Debug, Error)]
pub enum DataError {
    /// A CSV field failed to parse as the expected type.
    #[error("row {row}, column {column}: cannot parse '{value}' as {expected}")]
    Field {
        row: usize,
        column: usize,
        value: String,
        expected: &'static str,
    },

    /// A row had fewer columns than the operation requires.
    #[error("row {row}: missing column {column}")]
    MissingColumn { row: usize, column: usize },

    /// The input file had a header row but no data rows.
    #[error("input contains a header row but no data rows")]
    Empty,

    /// A human-readable key resolved to no platform entity.
    #[error("no {entity} found matching '{key}'")]
    NoMatch { entity: &'static str, key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        let auth = Error::Auth(AuthError::Rejected { status: 401 });
        let api = Error::Api(ApiError::missing_data());
        let data = Error::Data(DataError::Empty);
        assert!(auth.is_fatal());
        assert!(!api.is_fatal());
        assert!(!data.is_fatal());
    }

    #[test]
    fn api_error_display_includes_messages() {
        let err = ApiError::new(vec![GraphqlErrorEntry {
            message: "etag mismatch".to_string(),
            path: None,
        }]);
        let rendered = err.to_string();
        assert!(rendered.contains("rejected"));
        assert!(rendered.contains("etag mismatch"));
    }
}
