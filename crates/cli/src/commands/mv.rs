//! mv command - Rename an object
//!
//! Copies the object to its new name in the same container, then deletes
//! the original. If the delete fails both names remain.

use clap::Args;
use swo_core::{ObjectRequest, RenameRequest};

use super::Context;
use crate::exit_code::ExitCode;

/// Rename an object within its container
#[derive(Args, Debug)]
pub struct MvArgs {
    /// Container holding the object
    pub container: String,

    /// Current object name
    pub object: String,

    /// New object name
    pub new_name: String,
}

/// Execute the mv command
pub async fn execute(args: MvArgs, ctx: &Context) -> ExitCode {
    let request =
        RenameRequest::new(args.container, args.object, args.new_name).map(ObjectRequest::Rename);
    super::run_request(request, ctx).await
}
