//! Profile management
//!
//! Profiles are named references to Swift object storage accounts: the auth
//! endpoint and credentials, or a storage URL and token obtained elsewhere.

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// Timeout configuration for a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,

    /// Idle timeout between reads of a response, in milliseconds
    #[serde(default = "default_read_timeout")]
    pub read_ms: u64,
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_read_timeout() -> u64 {
    300_000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: default_connect_timeout(),
            read_ms: default_read_timeout(),
        }
    }
}

/// A named Swift account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// v1 auth endpoint (e.g. "https://swift.example.com/auth/v1.0")
    pub auth_url: String,

    /// Account user, sent as X-Auth-User
    pub user: String,

    /// Account key, sent as X-Auth-Key
    pub key: String,

    /// Pre-authenticated storage URL; skips the auth round trip together with `auth_token`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_url: Option<String>,

    /// Pre-authenticated token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Allow insecure TLS connections
    #[serde(default)]
    pub insecure: bool,

    /// Timeout configuration; unset means the HTTP client defaults apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutConfig>,
}

impl Profile {
    /// Create a new profile that authenticates with user and key
    pub fn new(
        name: impl Into<String>,
        auth_url: impl Into<String>,
        user: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            auth_url: auth_url.into(),
            user: user.into(),
            key: key.into(),
            storage_url: None,
            auth_token: None,
            insecure: false,
            timeout: None,
        }
    }

    /// Storage URL and token when both are configured
    pub fn preauthenticated(&self) -> Option<(&str, &str)> {
        match (&self.storage_url, &self.auth_token) {
            (Some(url), Some(token)) => Some((url.as_str(), token.as_str())),
            _ => None,
        }
    }

    /// Check that the profile carries enough to connect
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config("Profile name cannot be empty".into()));
        }
        if self.preauthenticated().is_some() {
            return Ok(());
        }
        if self.auth_url.is_empty() {
            return Err(Error::Config(format!(
                "Profile '{}' needs an auth URL or a storage URL and token",
                self.name
            )));
        }
        url::Url::parse(&self.auth_url)?;
        if self.user.is_empty() || self.key.is_empty() {
            return Err(Error::Config(format!(
                "Profile '{}' is missing user or key",
                self.name
            )));
        }
        Ok(())
    }
}

/// Manager for profile operations
pub struct ProfileManager {
    config_manager: ConfigManager,
}

impl ProfileManager {
    /// Create a new ProfileManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new ProfileManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured profiles
    pub fn list(&self) -> Result<Vec<Profile>> {
        let config = self.config_manager.load()?;
        Ok(config.profiles)
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Result<Profile> {
        let config = self.config_manager.load()?;
        config
            .profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Resolve the named profile, or the configured default when none is given
    pub fn resolve(&self, name: Option<&str>) -> Result<Profile> {
        match name {
            Some(name) => self.get(name),
            None => {
                let config = self.config_manager.load()?;
                let wanted = config.defaults.profile;
                config
                    .profiles
                    .into_iter()
                    .find(|p| p.name == wanted)
                    .ok_or(Error::ProfileNotFound(wanted))
            }
        }
    }

    /// Add or update a profile
    pub fn set(&self, profile: Profile) -> Result<()> {
        profile.validate()?;
        let mut config = self.config_manager.load()?;

        config.profiles.retain(|p| p.name != profile.name);
        config.profiles.push(profile);

        self.config_manager.save(&config)
    }

    /// Remove a profile
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.profiles.len();

        config.profiles.retain(|p| p.name != name);

        if config.profiles.len() == original_len {
            return Err(Error::ProfileNotFound(name.to_string()));
        }

        self.config_manager.save(&config)
    }

    /// Check if a profile exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.profiles.iter().any(|p| p.name == name))
    }
}
