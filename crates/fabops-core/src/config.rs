//! Process configuration and credentials.
//!
//! All settings are environment-variable driven with defaults pointing at
//! the staging environment. Credentials and configuration are built once at
//! process start and never refreshed or persisted.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{ConfigError, Error};

/// Default platform API base URL (staging).
pub const DEFAULT_API_URL: &str = "https://staging-api.fabworks.io";

/// Default identity-provider host (staging).
pub const DEFAULT_AUTH_SERVER: &str = "staging-auth.fabworks.io";

/// Environment variable names, without any deployment prefix.
pub mod env_vars {
    pub const API_URL: &str = "FABOPS_API_URL";
    pub const AUTH_SERVER: &str = "FABOPS_AUTH_SERVER";
    pub const AUTH_STYLE: &str = "FABOPS_AUTH_STYLE";
    pub const AUDIENCE: &str = "FABOPS_API_AUDIENCE";
    pub const CLIENT_ID: &str = "FABOPS_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "FABOPS_CLIENT_SECRET";
}

/// OAuth2 client-credentials pair for one script invocation.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read `FABOPS_CLIENT_ID` / `FABOPS_CLIENT_SECRET`, optionally under a
    /// deployment prefix such as `FABOPS_SOURCE_`.
    pub fn from_env(prefix: Option<&str>) -> Result<Self, Error> {
        let client_id = read_var(env_vars::CLIENT_ID, prefix)
            .ok_or(ConfigError::Missing { name: env_vars::CLIENT_ID })?;
        let client_secret = read_var(env_vars::CLIENT_SECRET, prefix)
            .ok_or(ConfigError::Missing { name: env_vars::CLIENT_SECRET })?;
        Ok(Self::new(client_id, client_secret))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Which token-endpoint convention the identity provider speaks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthStyle {
    /// Form-encoded POST to `/realms/api-keys/protocol/openid-connect/token`.
    #[default]
    Keycloak,
    /// JSON POST to `/oauth/token`.
    Auth0,
}

impl FromStr for AuthStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "keycloak" => Ok(AuthStyle::Keycloak),
            "auth0" => Ok(AuthStyle::Auth0),
            other => Err(ConfigError::Invalid {
                name: env_vars::AUTH_STYLE,
                value: other.to_string(),
                reason: "expected 'keycloak' or 'auth0'".to_string(),
            }
            .into()),
        }
    }
}

/// A validated platform API base URL.
///
/// # Example
///
/// ```
/// use fabops_core::ApiUrl;
///
/// let api = ApiUrl::new("https://staging-api.fabworks.io/").unwrap();
/// assert_eq!(api.graphql_url(), "https://staging-api.fabworks.io/graphql");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Parse and validate an API base URL. Plain HTTP is accepted so the
    /// client can be pointed at a local mock server.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| ConfigError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::ApiUrl {
                    value: s.to_string(),
                    reason: format!("unsupported scheme '{}'", other),
                }
                .into());
            }
        }
        if url.host_str().is_none() {
            return Err(ConfigError::ApiUrl {
                value: s.to_string(),
                reason: "missing host".to_string(),
            }
            .into());
        }

        Ok(Self(url))
    }

    /// The GraphQL endpoint for this API base.
    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.0.as_str().trim_end_matches('/'))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settings for one platform deployment.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: ApiUrl,
    pub auth_server: String,
    pub auth_style: AuthStyle,
    pub audience: String,
}

impl Config {
    /// Build a configuration from the environment, applying staging defaults.
    ///
    /// With a `prefix` such as `"FABOPS_SOURCE"`, prefixed variables
    /// (`FABOPS_SOURCE_API_URL`, ...) are read instead; an unset prefixed
    /// variable falls back to the unprefixed one, then to the default.
    pub fn from_env(prefix: Option<&str>) -> Result<Self, Error> {
        let api_url = ApiUrl::new(
            read_var(env_vars::API_URL, prefix).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;
        let auth_server = read_var(env_vars::AUTH_SERVER, prefix)
            .unwrap_or_else(|| DEFAULT_AUTH_SERVER.to_string());
        let auth_style = match read_var(env_vars::AUTH_STYLE, prefix) {
            Some(raw) => raw.parse()?,
            None => AuthStyle::default(),
        };
        // The token audience defaults to the API base, matching how the
        // platform issues its API keys.
        let audience =
            read_var(env_vars::AUDIENCE, prefix).unwrap_or_else(|| api_url.as_str().to_string());

        Ok(Self {
            api_url,
            auth_server,
            auth_style,
            audience,
        })
    }

    /// The token endpoint implied by the auth server and style.
    ///
    /// The auth server may be given as a bare host; `https://` is assumed.
    pub fn token_url(&self) -> String {
        let base = if self.auth_server.contains("://") {
            self.auth_server.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", self.auth_server.trim_end_matches('/'))
        };
        match self.auth_style {
            AuthStyle::Keycloak => {
                format!("{}/realms/api-keys/protocol/openid-connect/token", base)
            }
            AuthStyle::Auth0 => format!("{}/oauth/token", base),
        }
    }
}

fn read_var(name: &str, prefix: Option<&str>) -> Option<String> {
    let prefixed = prefix.map(|p| {
        // FABOPS_SOURCE + FABOPS_API_URL -> FABOPS_SOURCE_API_URL
        format!("{}_{}", p, name.trim_start_matches("FABOPS_"))
    });
    if let Some(ref key) = prefixed {
        if let Ok(value) = std::env::var(key) {
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_url_normalizes_trailing_slash() {
        let with = ApiUrl::new("https://api.example.com/").unwrap();
        let without = ApiUrl::new("https://api.example.com").unwrap();
        assert_eq!(with.graphql_url(), "https://api.example.com/graphql");
        assert_eq!(without.graphql_url(), "https://api.example.com/graphql");
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(ApiUrl::new("ftp://api.example.com").is_err());
        assert!(ApiUrl::new("not a url").is_err());
    }

    #[test]
    fn token_url_per_style() {
        let mut config = Config {
            api_url: ApiUrl::new("https://api.example.com").unwrap(),
            auth_server: "auth.example.com".to_string(),
            auth_style: AuthStyle::Keycloak,
            audience: "https://api.example.com".to_string(),
        };
        assert_eq!(
            config.token_url(),
            "https://auth.example.com/realms/api-keys/protocol/openid-connect/token"
        );
        config.auth_style = AuthStyle::Auth0;
        assert_eq!(config.token_url(), "https://auth.example.com/oauth/token");
    }

    #[test]
    fn token_url_accepts_full_url_auth_server() {
        let config = Config {
            api_url: ApiUrl::new("http://127.0.0.1:9000").unwrap(),
            auth_server: "http://127.0.0.1:9000/".to_string(),
            auth_style: AuthStyle::Keycloak,
            audience: "http://127.0.0.1:9000".to_string(),
        };
        assert_eq!(
            config.token_url(),
            "http://127.0.0.1:9000/realms/api-keys/protocol/openid-connect/token"
        );
    }

    #[test]
    fn credentials_debug_redacts_secret() {
        let creds = Credentials::new("client-a", "super-secret");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("client-a"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn auth_style_parses_case_insensitively() {
        assert_eq!(AuthStyle::from_str("KeyCloak").unwrap(), AuthStyle::Keycloak);
        assert_eq!(AuthStyle::from_str("auth0").unwrap(), AuthStyle::Auth0);
        assert!(AuthStyle::from_str("saml").is_err());
    }
}
