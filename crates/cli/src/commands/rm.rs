//! rm command - Delete an object
//!
//! With `-l` the object is treated as a large-object manifest and deleted
//! together with its segments.

use clap::Args;
use swo_core::{DeleteRequest, ObjectRequest};

use super::Context;
use crate::exit_code::ExitCode;

/// Delete an object
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Container holding the object
    pub container: String,

    /// Object to delete
    pub object: String,

    /// Delete a large-object manifest and all of its segments
    #[arg(short = 'l', long = "large")]
    pub large: bool,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, ctx: &Context) -> ExitCode {
    let request =
        DeleteRequest::new(args.container, args.object, args.large).map(ObjectRequest::Delete);
    super::run_request(request, ctx).await
}
