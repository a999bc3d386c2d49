use tracing::debug;

use super::Confirmation;
use crate::error::{Error, Result};
use crate::request::DeleteRequest;
use crate::traits::{Endpoint, ObjectConnection, StatusSink};

/// Delete an object; large (manifest) objects are deleted together with their segments
pub async fn delete_object(
    conn: &dyn ObjectConnection,
    req: &DeleteRequest,
    status: &dyn StatusSink,
) -> Result<Confirmation> {
    status.set_stage("Deleting object");
    let target = &req.target;

    let result = if req.large {
        delete_large_object(
            &conn.http_client(),
            &conn.endpoint(),
            &target.container,
            &target.object,
        )
        .await
    } else {
        conn.delete_object(&target.container, &target.object).await
    };
    result.map_err(|e| e.context(&format!("Failed to delete object {}", target.object)))?;

    Ok(Confirmation {
        operation: "delete",
        container: target.container.clone(),
        object: target.object.clone(),
        message: format!(
            "Deleted object {} from container {}",
            target.object, target.container
        ),
    })
}

/// URL deleting a manifest object and every segment it references
pub fn manifest_delete_url(endpoint: &Endpoint, container: &str, object: &str) -> Result<url::Url> {
    let mut url = endpoint.object_url(container, object)?;
    url.set_query(Some("multipart-manifest=delete"));
    Ok(url)
}

/// Delete an SLO/DLO manifest and its segments with a raw authenticated request.
///
/// The connection only models plain object deletes, which would leave the
/// segments behind. `http` should be the connection's own client so its TLS
/// and timeout settings apply. Any status outside 2xx is a [`Error::Protocol`] failure.
pub async fn delete_large_object(
    http: &reqwest::Client,
    endpoint: &Endpoint,
    container: &str,
    object: &str,
) -> Result<()> {
    let url = manifest_delete_url(endpoint, container, object)?;

    debug!(%url, "Deleting large object");
    let response = http
        .delete(url)
        .header("X-Auth-Token", &endpoint.auth_token)
        .send()
        .await
        .map_err(|e| Error::Transport(format!("Failed to make request: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Protocol(format!(
            "Failed to delete object with status {status}"
        )));
    }

    // Drain the body.
    response
        .bytes()
        .await
        .map_err(|e| Error::Transport(format!("Failed to read response body: {e}")))?;

    Ok(())
}
