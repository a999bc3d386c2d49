use tracing::debug;

use super::{ObjectDetails, ObjectListing};
use crate::error::Result;
use crate::request::{ListRequest, ObjectRef};
use crate::traits::{ObjectConnection, StatusSink};

/// Fetch metadata and headers for one object
pub async fn get_info(
    conn: &dyn ObjectConnection,
    req: &ObjectRef,
    status: &dyn StatusSink,
) -> Result<ObjectDetails> {
    status.set_stage("Fetching object info");
    debug!(container = %req.container, object = %req.object, "Fetching object info");

    let (info, headers) = conn
        .object_info(&req.container, &req.object)
        .await
        .map_err(|e| e.context(&format!("Failed to get object {}", req.object)))?;

    Ok(ObjectDetails {
        size_human: info.size_human(),
        info,
        headers,
    })
}

/// List the names of every object in a container
pub async fn list_objects(
    conn: &dyn ObjectConnection,
    req: &ListRequest,
    status: &dyn StatusSink,
) -> Result<ObjectListing> {
    status.set_stage("Displaying objects");

    let objects = conn
        .object_names_all(&req.container)
        .await
        .map_err(|e| e.context("Failed to get objects"))?;
    debug!(container = %req.container, count = objects.len(), "Listed objects");

    Ok(ObjectListing {
        container: req.container.clone(),
        objects,
    })
}
