use tracing::{debug, warn};

use super::Confirmation;
use crate::error::Result;
use crate::request::{CopyRequest, RenameRequest};
use crate::traits::{ObjectConnection, StatusSink};

/// Copy an object into another container under the same name.
///
/// The destination container is not checked beforehand.
pub async fn copy_object(
    conn: &dyn ObjectConnection,
    req: &CopyRequest,
    status: &dyn StatusSink,
) -> Result<Confirmation> {
    status.set_stage("Copying object");
    let src = &req.source;

    conn.copy_object(&src.container, &src.object, &req.new_container, &src.object)
        .await
        .map_err(|e| e.context("Failed to copy object"))?;
    debug!(source = %src, destination = %req.new_container, "Copied object");

    Ok(Confirmation {
        operation: "copy",
        container: req.new_container.clone(),
        object: src.object.clone(),
        message: format!(
            "Copied object {} to container {}",
            src.object, req.new_container
        ),
    })
}

/// Rename an object by copying it within its container and deleting the original.
///
/// Not atomic: when the delete fails after a successful copy both names
/// exist and the error is returned without rolling back the copy.
pub async fn rename_object(
    conn: &dyn ObjectConnection,
    req: &RenameRequest,
    status: &dyn StatusSink,
) -> Result<Confirmation> {
    status.set_stage("Renaming object");
    let src = &req.source;

    conn.copy_object(&src.container, &src.object, &src.container, &req.new_name)
        .await
        .map_err(|e| e.context("Failed to rename object"))?;

    if let Err(e) = conn.delete_object(&src.container, &src.object).await {
        warn!(
            container = %src.container,
            original = %src.object,
            renamed = %req.new_name,
            "Rename copied the object but could not delete the original; both names now exist"
        );
        return Err(e.context(&format!("Failed to delete object {}", src.object)));
    }

    Ok(Confirmation {
        operation: "rename",
        container: src.container.clone(),
        object: req.new_name.clone(),
        message: format!("Renamed object {} to {}", src.object, req.new_name),
    })
}
