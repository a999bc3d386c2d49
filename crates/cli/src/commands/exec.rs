//! exec command - Run a positional object command
//!
//! Accepts the plugin-style argument list `object <subcmd> <container> ...`
//! (for example `object put-object media clip.mp4 -n launch.mp4`) and runs
//! it like the matching named command.

use clap::Args;
use swo_core::ObjectRequest;

use super::Context;
use crate::exit_code::ExitCode;

/// Run a positional object command
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Command words, e.g. `object delete-object videos launch.mp4 -l`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Execute a positional command
pub async fn execute(args: ExecArgs, ctx: &Context) -> ExitCode {
    let request = ObjectRequest::from_args(&args.args);
    super::run_request(request, ctx).await
}
