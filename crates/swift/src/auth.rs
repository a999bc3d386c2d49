//! Swift v1 authentication
//!
//! Exchanges a profile's user and key for a storage URL and token, or takes
//! both from the profile when it was pre-authenticated.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use swo_core::{Endpoint, Error, Profile, Result};
use tracing::debug;

const AUTH_USER: &str = "X-Auth-User";
const AUTH_KEY: &str = "X-Auth-Key";
const STORAGE_URL: &str = "X-Storage-Url";
const AUTH_TOKEN: &str = "X-Auth-Token";

/// Build the HTTP client for a profile, applying its TLS and timeout settings
pub fn http_client(profile: &Profile) -> Result<Client> {
    let mut builder = Client::builder().danger_accept_invalid_certs(profile.insecure);
    if let Some(timeout) = &profile.timeout {
        builder = builder
            .connect_timeout(Duration::from_millis(timeout.connect_ms))
            .read_timeout(Duration::from_millis(timeout.read_ms));
    }
    builder
        .build()
        .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {e}")))
}

/// Resolve the storage endpoint for a profile
pub async fn authenticate(http: &Client, profile: &Profile) -> Result<Endpoint> {
    if let Some((storage_url, auth_token)) = profile.preauthenticated() {
        debug!(profile = %profile.name, "Using pre-authenticated storage URL");
        return Ok(Endpoint {
            storage_url: storage_url.to_string(),
            auth_token: auth_token.to_string(),
        });
    }

    debug!(profile = %profile.name, auth_url = %profile.auth_url, "Authenticating");
    let response = http
        .get(&profile.auth_url)
        .header(AUTH_USER, &profile.user)
        .header(AUTH_KEY, &profile.key)
        .send()
        .await
        .map_err(|e| Error::Transport(format!("Failed to reach auth endpoint: {e}")))?;

    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return Err(Error::Auth(format!(
                "Credentials rejected for profile '{}' (HTTP {status})",
                profile.name
            )));
        }
        s if !s.is_success() => {
            return Err(Error::Transport(format!("Auth request failed: HTTP {status}")));
        }
        _ => {}
    }

    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::Auth(format!("Auth response is missing {name}")))
    };

    Ok(Endpoint {
        storage_url: header(STORAGE_URL)?,
        auth_token: header(AUTH_TOKEN)?,
    })
}
