//! cp command - Copy an object
//!
//! Server-side copy into another container, keeping the object name.

use clap::Args;
use swo_core::{CopyRequest, ObjectRequest};

use super::Context;
use crate::exit_code::ExitCode;

/// Copy an object to another container
#[derive(Args, Debug)]
pub struct CpArgs {
    /// Source container
    pub container: String,

    /// Object to copy
    pub object: String,

    /// Destination container
    pub new_container: String,
}

/// Execute the cp command
pub async fn execute(args: CpArgs, ctx: &Context) -> ExitCode {
    let request =
        CopyRequest::new(args.container, args.object, args.new_container).map(ObjectRequest::Copy);
    super::run_request(request, ctx).await
}
