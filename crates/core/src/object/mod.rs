//! Object operations
//!
//! Each operation takes an authenticated [`ObjectConnection`], a validated
//! request, and a [`StatusSink`]; it makes one or two remote calls and returns
//! a value that renders as a human-readable report (`Display`) or as JSON
//! (`Serialize`). Every operation tries once and reports the first failure,
//! prefixed with the name of the failing step.

mod copy;
mod delete;
mod download;
mod info;
mod upload;

#[cfg(test)]
pub(crate) mod memory;

use std::fmt;

use serde::Serialize;

pub use copy::{copy_object, rename_object};
pub use delete::{delete_large_object, delete_object, manifest_delete_url};
pub use download::get_object;
pub use info::{get_info, list_objects};
pub use upload::{MAX_OBJECT_SIZE, hash_source, put_object, read_source};

use crate::error::Result;
use crate::request::ObjectRequest;
use crate::traits::{ObjectConnection, ObjectHeaders, ObjectInfo, StatusSink};

/// Metadata report for one object
#[derive(Debug, Clone, Serialize)]
pub struct ObjectDetails {
    #[serde(flatten)]
    pub info: ObjectInfo,
    pub size_human: String,
    pub headers: ObjectHeaders,
}

impl fmt::Display for ObjectDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = &self.info;
        writeln!(f, "Name: {}", info.name)?;
        writeln!(f, "Content type: {}", info.content_type)?;
        writeln!(f, "Size: {} bytes", info.bytes)?;
        writeln!(f, "Last modified: {}", info.last_modified)?;
        writeln!(f, "Hash: {}", info.hash)?;
        writeln!(f, "Is pseudo dir: {}", info.pseudo_directory)?;
        writeln!(f, "Subdirectory: {}", info.subdir)?;
        write!(f, "Headers:")?;
        for (name, value) in &self.headers {
            write!(f, "\n\tName: {name} Value: {value}")?;
        }
        Ok(())
    }
}

/// Names of every object in a container
#[derive(Debug, Clone, Serialize)]
pub struct ObjectListing {
    pub container: String,
    pub objects: Vec<String>,
}

impl fmt::Display for ObjectListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Objects in container {}:", self.container)?;
        for name in &self.objects {
            write!(f, "\n  {name}")?;
        }
        Ok(())
    }
}

/// Outcome of an operation that changes remote or local state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub operation: &'static str,
    pub container: String,
    pub object: String,
    pub message: String,
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of any object operation
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Details(ObjectDetails),
    Listing(ObjectListing),
    Done(Confirmation),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Details(d) => fmt::Display::fmt(d, f),
            Outcome::Listing(l) => fmt::Display::fmt(l, f),
            Outcome::Done(c) => fmt::Display::fmt(c, f),
        }
    }
}

/// Run a parsed request against a connection
pub async fn execute(
    conn: &dyn ObjectConnection,
    request: &ObjectRequest,
    status: &dyn StatusSink,
) -> Result<Outcome> {
    let outcome = match request {
        ObjectRequest::Info(req) => Outcome::Details(get_info(conn, req, status).await?),
        ObjectRequest::List(req) => Outcome::Listing(list_objects(conn, req, status).await?),
        ObjectRequest::Put(req) => Outcome::Done(put_object(conn, req, status).await?),
        ObjectRequest::Copy(req) => Outcome::Done(copy_object(conn, req, status).await?),
        ObjectRequest::Get(req) => Outcome::Done(get_object(conn, req, status).await?),
        ObjectRequest::Rename(req) => Outcome::Done(rename_object(conn, req, status).await?),
        ObjectRequest::Delete(req) => Outcome::Done(delete_object(conn, req, status).await?),
    };
    Ok(outcome)
}
