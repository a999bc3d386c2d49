//! get command - Download an object
//!
//! Streams an object into a local file, replacing any previous content.

use std::path::PathBuf;

use clap::Args;
use swo_core::{GetRequest, ObjectRequest};

use super::Context;
use crate::exit_code::ExitCode;

/// Download an object to a local file
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Container holding the object
    pub container: String,

    /// Object to download
    pub object: String,

    /// Local destination file
    pub destination: PathBuf,
}

/// Execute the get command
pub async fn execute(args: GetArgs, ctx: &Context) -> ExitCode {
    let request =
        GetRequest::new(args.container, args.object, args.destination).map(ObjectRequest::Get);
    super::run_request(request, ctx).await
}
