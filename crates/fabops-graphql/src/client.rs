//! Authenticated GraphQL HTTP client.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use fabops_core::error::{ApiError, AuthError, GraphqlErrorEntry, TransportError};
use fabops_core::{ApiUrl, Config, Credentials, Error, Result};

/// Request envelope for one GraphQL call: a document plus its variables.
/// One envelope per HTTP request; operations are never batched.
#[derive(Debug, serde::Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, serde::Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, serde::Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// GraphQL client holding the bearer token for one process run.
///
/// The token is obtained once by [`GraphqlClient::authenticate`] and never
/// refreshed; scripts are short-lived, single-shot processes.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    client: reqwest::Client,
    api_url: ApiUrl,
    token: String,
}

impl GraphqlClient {
    /// Perform the OAuth2 client-credentials grant and return a client
    /// carrying the resulting bearer token.
    #[instrument(skip(config, credentials), fields(api = %config.api_url))]
    pub async fn authenticate(config: &Config, credentials: &Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fabops/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport)?;

        let token_url = config.token_url();
        let request = TokenRequest {
            grant_type: "client_credentials",
            client_id: credentials.client_id(),
            client_secret: credentials.client_secret(),
            audience: &config.audience,
        };

        debug!(%token_url, style = ?config.auth_style, "requesting access token");
        let builder = client.post(&token_url);
        // Keycloak realms take the grant form-encoded; auth0 takes JSON.
        let builder = match config.auth_style {
            fabops_core::AuthStyle::Keycloak => builder.form(&request),
            fabops_core::AuthStyle::Auth0 => builder.json(&request),
        };
        let response = builder.send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            }
            .into());
        }

        let body: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| AuthError::MalformedResponse {
                    reason: e.to_string(),
                })?;
        let token = body.access_token.ok_or(AuthError::MissingAccessToken)?;

        debug!("access token obtained");
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            token,
        })
    }

    pub fn api_url(&self) -> &ApiUrl {
        &self.api_url
    }

    /// Execute one GraphQL document and return the response's `data` value.
    ///
    /// A non-2xx status is a transport error; a response carrying a
    /// non-empty `errors` array is surfaced as [`Error::Api`] — GraphQL
    /// errors are never logged-and-swallowed.
    #[instrument(skip(self, document, variables), fields(api = %self.api_url))]
    pub async fn execute(&self, document: &str, variables: Value) -> Result<Value> {
        let url = self.api_url.graphql_url();
        let envelope = GraphqlRequest {
            query: document,
            variables,
        };
        trace!(?envelope, "graphql request");

        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(&envelope)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                endpoint: url,
            }
            .into());
        }

        let body: GraphqlResponse = response.json().await.map_err(transport)?;
        if let Some(errors) = body.errors {
            if !errors.is_empty() {
                warn!(count = errors.len(), "graphql errors in response");
                return Err(ApiError::new(errors).into());
            }
        }
        body.data
            .filter(|data| !data.is_null())
            .ok_or_else(|| ApiError::missing_data().into())
    }

    /// Execute a document and deserialize the `data` value.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: Value,
    ) -> Result<T> {
        let data = self.execute(document, variables).await?;
        serde_json::from_value(data).map_err(|e| {
            ApiError::new(vec![GraphqlErrorEntry {
                message: format!("unexpected response shape: {}", e),
                path: None,
            }])
            .into()
        })
    }

    /// The underlying HTTP client, for direct transfers against signed
    /// storage URLs that carry their own authorization.
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", self.token);
        let auth_value = HeaderValue::from_str(&auth_value).map_err(|_| {
            Error::Auth(AuthError::MalformedResponse {
                reason: "access token contains invalid header characters".to_string(),
            })
        })?;
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

/// Map a reqwest failure into the transport taxonomy.
pub(crate) fn transport(err: reqwest::Error) -> Error {
    let inner = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(inner)
}
