//! ls command - List objects
//!
//! Lists every object name in a container, following listing pages.

use clap::Args;
use swo_core::{ListRequest, ObjectRequest};

use super::Context;
use crate::exit_code::ExitCode;

/// List the objects in a container
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Container to list
    pub container: String,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, ctx: &Context) -> ExitCode {
    let request = ListRequest::new(args.container).map(ObjectRequest::List);
    super::run_request(request, ctx).await
}
