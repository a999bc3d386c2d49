//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations.
//! Object commands build a validated request and hand it to
//! [`run_request`], which connects with the selected profile and runs it.

use clap::{Parser, Subcommand};
use swo_core::{ConfigManager, Defaults, ObjectRequest, Outcome, ProfileManager, Result};
use swo_swift::SwiftConnection;
use tracing::debug;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressBar};

mod completions;
mod cp;
mod exec;
mod get;
mod info;
mod ls;
mod mv;
mod profile;
mod put;
mod rm;

/// swo - Swift object storage CLI
///
/// Inspect, upload, download, copy, rename and delete the objects of an
/// OpenStack Swift account.
#[derive(Parser, Debug)]
#[command(name = "swo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinner
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Profile to connect with (defaults to the configured default profile)
    #[arg(short, long, global = true, env = "SWO_PROFILE")]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage Swift account profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// Show object metadata and headers
    Info(info::InfoArgs),

    /// List the objects in a container
    Ls(ls::LsArgs),

    /// Upload a local file as an object
    Put(put::PutArgs),

    /// Copy an object to another container
    Cp(cp::CpArgs),

    /// Download an object to a local file
    Get(get::GetArgs),

    /// Rename an object within its container
    Mv(mv::MvArgs),

    /// Delete an object
    Rm(rm::RmArgs),

    /// Run a positional object command (`object <subcmd> <container> ...`)
    Exec(exec::ExecArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Settings shared by every object command
#[derive(Debug, Clone)]
pub struct Context {
    pub output: OutputConfig,
    pub profile: Option<String>,
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let defaults = load_defaults();
    if defaults.color == "always" && !cli.no_color {
        console::set_colors_enabled(true);
        console::set_colors_enabled_stderr(true);
    }
    let ctx = Context {
        output: output_config(&cli, &defaults),
        profile: cli.profile,
    };

    match cli.command {
        Commands::Profile(cmd) => profile::execute(cmd, &ctx.output),
        Commands::Info(args) => info::execute(args, &ctx).await,
        Commands::Ls(args) => ls::execute(args, &ctx).await,
        Commands::Put(args) => put::execute(args, &ctx).await,
        Commands::Cp(args) => cp::execute(args, &ctx).await,
        Commands::Get(args) => get::execute(args, &ctx).await,
        Commands::Mv(args) => mv::execute(args, &ctx).await,
        Commands::Rm(args) => rm::execute(args, &ctx).await,
        Commands::Exec(args) => exec::execute(args, &ctx).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// `[defaults]` from the config file; built-in defaults when it can't be read
fn load_defaults() -> Defaults {
    match ConfigManager::new().and_then(|manager| manager.load()) {
        Ok(config) => config.defaults,
        Err(e) => {
            debug!(error = %e, "Using built-in output defaults");
            Defaults::default()
        }
    }
}

/// Merge the command-line flags over the configured defaults
fn output_config(cli: &Cli, defaults: &Defaults) -> OutputConfig {
    OutputConfig {
        json: cli.json || defaults.output == "json",
        no_color: cli.no_color || defaults.color == "never",
        no_progress: cli.no_progress || !defaults.progress,
        quiet: cli.quiet,
    }
}

/// Open an authenticated connection for the selected profile
async fn connect(profile: Option<&str>) -> Result<SwiftConnection> {
    let profile = ProfileManager::new()?.resolve(profile)?;
    debug!(profile = %profile.name, "Connecting");
    SwiftConnection::connect(&profile)
        .await
        .map_err(|e| e.context(&format!("Failed to connect with profile '{}'", profile.name)))
}

/// Connect and run one object request, printing its outcome
pub(crate) async fn run_request(request: Result<ObjectRequest>, ctx: &Context) -> ExitCode {
    let formatter = Formatter::new(ctx.output.clone());
    let request = match request {
        Ok(request) => request,
        Err(e) => return formatter.fail(&e),
    };

    let progress = ProgressBar::spinner(&ctx.output, "Connecting");
    let result = run(&request, ctx.profile.as_deref(), &progress).await;
    progress.finish_and_clear();

    match result {
        Ok(Outcome::Done(done)) if !formatter.is_json() => {
            formatter.success(&done.message);
            ExitCode::Success
        }
        Ok(outcome) => {
            formatter.output(&outcome);
            ExitCode::Success
        }
        Err(e) => formatter.fail(&e),
    }
}

async fn run(
    request: &ObjectRequest,
    profile: Option<&str>,
    progress: &ProgressBar,
) -> Result<Outcome> {
    let conn = connect(profile).await?;
    swo_core::object::execute(&conn, request, progress).await
}
