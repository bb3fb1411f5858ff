//! Connection assembly: configuration, credentials, authentication.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use colored::Colorize;

use fabops_core::config::env_vars;
use fabops_core::{ApiUrl, Config, Credentials};
use fabops_graphql::GraphqlClient;

use crate::cli::ConnectionArgs;

/// Build configuration and credentials from flags and environment, then
/// authenticate. The client secret comes from `FABOPS_CLIENT_SECRET` or an
/// interactive prompt, never from a flag.
pub async fn connect(args: &ConnectionArgs) -> Result<GraphqlClient> {
    let mut config = Config::from_env(None).context("invalid configuration")?;
    if let Some(api_url) = &args.api_url {
        let audience_from_env =
            std::env::var(env_vars::AUDIENCE).is_ok_and(|value| !value.is_empty());
        apply_api_url(&mut config, api_url, audience_from_env)?;
    }
    if let Some(auth_server) = &args.auth_server {
        config.auth_server = auth_server.clone();
    }

    let client_id = match &args.client_id {
        Some(id) => id.clone(),
        None => std::env::var(env_vars::CLIENT_ID)
            .ok()
            .filter(|v| !v.is_empty())
            .with_context(|| format!("set {} or pass --client-id", env_vars::CLIENT_ID))?,
    };
    let client_secret = read_secret()?;

    eprintln!("{}", format!("Authenticating against {}...", config.api_url).dimmed());
    let client = GraphqlClient::authenticate(&config, &Credentials::new(client_id, client_secret))
        .await
        .context("authentication failed")?;
    Ok(client)
}

/// Authenticate one side of a cross-environment operation, reading only
/// prefixed variables such as `FABOPS_SOURCE_API_URL`. No prompting here:
/// two interleaved secret prompts are worse than a clear error.
pub async fn connect_prefixed(prefix: &str) -> Result<GraphqlClient> {
    let config = Config::from_env(Some(prefix))
        .with_context(|| format!("invalid {}_* configuration", prefix))?;
    let credentials = Credentials::from_env(Some(prefix))
        .with_context(|| format!("set {0}_CLIENT_ID and {0}_CLIENT_SECRET", prefix))?;

    eprintln!("{}", format!("Authenticating against {}...", config.api_url).dimmed());
    GraphqlClient::authenticate(&config, &credentials)
        .await
        .with_context(|| format!("authentication failed for {}", config.api_url))
}

/// Apply the `--api-url` override. The token audience follows the new URL
/// only when `FABOPS_API_AUDIENCE` was not set itself; an explicit audience
/// always wins.
fn apply_api_url(config: &mut Config, api_url: &str, audience_from_env: bool) -> Result<()> {
    config.api_url = ApiUrl::new(api_url).context("invalid --api-url")?;
    if !audience_from_env {
        config.audience = config.api_url.as_str().to_string();
    }
    Ok(())
}

fn read_secret() -> Result<String> {
    if let Ok(secret) = std::env::var(env_vars::CLIENT_SECRET) {
        if !secret.is_empty() {
            return Ok(secret);
        }
    }
    eprint!("Client secret: ");
    std::io::stderr().flush().ok();
    let mut secret = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut secret)
        .context("failed to read client secret")?;
    let secret = secret.trim_end_matches(['\r', '\n']).to_string();
    if secret.is_empty() {
        bail!("empty client secret");
    }
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            api_url: ApiUrl::new("https://staging-api.fabworks.io").unwrap(),
            auth_server: "staging-auth.fabworks.io".to_string(),
            auth_style: Default::default(),
            audience: "https://custom-audience.fabworks.io".to_string(),
        }
    }

    #[test]
    fn api_url_flag_carries_the_audience_when_none_was_set() {
        let mut config = base_config();
        apply_api_url(&mut config, "https://prod-api.fabworks.io", false).unwrap();
        assert_eq!(config.audience, "https://prod-api.fabworks.io/");
    }

    #[test]
    fn explicit_audience_survives_an_api_url_flag() {
        let mut config = base_config();
        apply_api_url(&mut config, "https://prod-api.fabworks.io", true).unwrap();
        assert_eq!(config.audience, "https://custom-audience.fabworks.io");
    }
}
