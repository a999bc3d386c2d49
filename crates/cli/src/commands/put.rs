//! put command - Upload a file
//!
//! Uploads a local file as a single object, named after the file unless
//! `-n` gives another name. Files of 5 GB or more are refused.

use std::path::PathBuf;

use clap::Args;
use swo_core::{ObjectRequest, PutRequest};

use super::Context;
use crate::exit_code::ExitCode;

/// Upload a local file as an object
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Destination container
    pub container: String,

    /// Local file to upload
    pub source: PathBuf,

    /// Object name (defaults to the file's base name)
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,
}

/// Execute the put command
pub async fn execute(args: PutArgs, ctx: &Context) -> ExitCode {
    let request = PutRequest::new(args.container, args.source, args.name).map(ObjectRequest::Put);
    super::run_request(request, ctx).await
}
