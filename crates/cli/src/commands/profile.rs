//! Profile management commands
//!
//! Profiles are named Swift accounts: an auth endpoint with user and key, or
//! a storage URL and token obtained elsewhere.

use clap::Subcommand;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use swo_core::{Error, Profile, ProfileManager, Result, TimeoutConfig};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Profile subcommands for managing Swift accounts
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List all configured profiles
    List(ListArgs),

    /// Remove a profile
    Remove(RemoveArgs),
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (e.g., "saio", "prod")
    pub name: String,

    /// v1 auth URL (e.g., "https://swift.example.com/auth/v1.0")
    pub auth_url: Option<String>,

    /// Account user, e.g. "account:user"
    pub user: Option<String>,

    /// Account key
    pub key: Option<String>,

    /// Pre-authenticated storage URL (use with --auth-token)
    #[arg(long, requires = "auth_token")]
    pub storage_url: Option<String>,

    /// Pre-authenticated token (use with --storage-url)
    #[arg(long, requires = "storage_url")]
    pub auth_token: Option<String>,

    /// Allow insecure TLS connections
    #[arg(long, default_value = "false")]
    pub insecure: bool,

    /// Connect timeout in milliseconds
    #[arg(long)]
    pub connect_timeout_ms: Option<u64>,

    /// Read timeout in milliseconds
    #[arg(long)]
    pub read_timeout_ms: Option<u64>,
}

/// Arguments for the `profile list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show full details as a table
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `profile remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the profile to remove
    pub name: String,
}

/// Profile information for output (without secrets)
#[derive(Debug, Serialize)]
struct ProfileInfo {
    name: String,
    auth_url: String,
    user: String,
    storage_url: Option<String>,
    insecure: bool,
}

impl From<&Profile> for ProfileInfo {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            auth_url: profile.auth_url.clone(),
            user: profile.user.clone(),
            storage_url: profile.storage_url.clone(),
            insecure: profile.insecure,
        }
    }
}

/// JSON output for profile set/remove operations
#[derive(Debug, Serialize)]
struct ProfileOperationOutput {
    success: bool,
    profile: String,
    message: String,
}

impl SetArgs {
    fn into_profile(self) -> Profile {
        let mut profile = Profile::new(
            self.name,
            self.auth_url.unwrap_or_default(),
            self.user.unwrap_or_default(),
            self.key.unwrap_or_default(),
        );
        profile.storage_url = self.storage_url;
        profile.auth_token = self.auth_token;
        profile.insecure = self.insecure;
        if self.connect_timeout_ms.is_some() || self.read_timeout_ms.is_some() {
            let defaults = TimeoutConfig::default();
            profile.timeout = Some(TimeoutConfig {
                connect_ms: self.connect_timeout_ms.unwrap_or(defaults.connect_ms),
                read_ms: self.read_timeout_ms.unwrap_or(defaults.read_ms),
            });
        }
        profile
    }
}

/// Execute a profile subcommand
pub fn execute(cmd: ProfileCommands, output_config: &OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());
    let manager = match ProfileManager::new() {
        Ok(manager) => manager,
        Err(e) => return formatter.fail(&e),
    };

    match run(cmd, &manager, &formatter) {
        Ok(()) => ExitCode::Success,
        Err(e) => formatter.fail(&e),
    }
}

fn run(cmd: ProfileCommands, manager: &ProfileManager, formatter: &Formatter) -> Result<()> {
    match cmd {
        ProfileCommands::Set(args) => {
            let profile = args.into_profile();
            let name = profile.name.clone();
            if profile.insecure {
                formatter.warning(&format!(
                    "Profile '{name}' skips TLS certificate verification"
                ));
            }
            manager.set(profile)?;
            report(formatter, &name, format!("Profile '{name}' configured"));
        }
        ProfileCommands::List(args) => {
            let profiles = manager.list()?;
            if formatter.is_json() {
                let infos: Vec<ProfileInfo> = profiles.iter().map(ProfileInfo::from).collect();
                formatter.json(&serde_json::json!({ "profiles": infos }));
            } else if profiles.is_empty() {
                formatter.println("No profiles configured.");
            } else if args.long {
                formatter.println(&profile_table(&profiles).to_string());
            } else {
                for profile in &profiles {
                    formatter.println(&format!("{:<12} {}", profile.name, endpoint_of(profile)));
                }
            }
        }
        ProfileCommands::Remove(args) => {
            manager.remove(&args.name).map_err(|e| match e {
                Error::ProfileNotFound(name) => Error::ProfileNotFound(format!("'{name}'")),
                other => other,
            })?;
            report(
                formatter,
                &args.name,
                format!("Profile '{}' removed", args.name),
            );
        }
    }
    Ok(())
}

fn report(formatter: &Formatter, profile: &str, message: String) {
    if formatter.is_json() {
        formatter.json(&ProfileOperationOutput {
            success: true,
            profile: profile.to_string(),
            message,
        });
    } else {
        formatter.success(&message);
    }
}

/// The URL a profile connects through
fn endpoint_of(profile: &Profile) -> &str {
    profile
        .storage_url
        .as_deref()
        .filter(|_| profile.auth_token.is_some())
        .unwrap_or(&profile.auth_url)
}

fn profile_table(profiles: &[Profile]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Auth", "Endpoint", "User", "Insecure"]);
    for profile in profiles {
        let auth = if profile.preauthenticated().is_some() {
            "token"
        } else {
            "v1"
        };
        table.add_row(vec![
            profile.name.clone(),
            auth.to_string(),
            endpoint_of(profile).to_string(),
            profile.user.clone(),
            profile.insecure.to_string(),
        ]);
    }
    table
}
