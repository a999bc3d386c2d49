//! info command - Show object metadata
//!
//! Prints the object's size, type, hash and every header the service returned.

use clap::Args;
use swo_core::{ObjectRef, ObjectRequest};

use super::Context;
use crate::exit_code::ExitCode;

/// Show object metadata
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Container holding the object
    pub container: String,

    /// Object name
    pub object: String,
}

/// Execute the info command
pub async fn execute(args: InfoArgs, ctx: &Context) -> ExitCode {
    let request = ObjectRef::new(args.container, args.object).map(ObjectRequest::Info);
    super::run_request(request, ctx).await
}
