use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::Confirmation;
use crate::error::{Error, Result};
use crate::request::GetRequest;
use crate::traits::{ObjectConnection, StatusSink};

/// Download an object into a local file.
///
/// The destination is created if absent and truncated if present. If the
/// transfer fails midway the partial file is left in place.
pub async fn get_object(
    conn: &dyn ObjectConnection,
    req: &GetRequest,
    status: &dyn StatusSink,
) -> Result<Confirmation> {
    status.set_stage("Downloading object");
    let object = &req.source.object;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&req.destination)
        .await
        .map_err(|e| Error::LocalIo(format!("Failed to open/create object file: {e}")))?;

    let fetch_failed = |e: Error| e.context(&format!("Failed to get object {object}"));
    let mut stream = conn
        .get_object(&req.source.container, object)
        .await
        .map_err(fetch_failed)?;

    let local_write = |e: std::io::Error| Error::LocalIo(format!("Failed to write object file: {e}"));
    let mut written = 0u64;
    let mut interrupted = None;
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                file.write_all(&chunk).await.map_err(local_write)?;
                written += chunk.len() as u64;
            }
            Err(e) => {
                interrupted = Some(fetch_failed(e));
                break;
            }
        }
    }
    // Flush even when interrupted so the partial content is on disk before returning.
    file.flush().await.map_err(local_write)?;
    if let Some(e) = interrupted {
        return Err(e);
    }
    debug!(source = %req.source, destination = %req.destination.display(), bytes = written, "Downloaded object");

    Ok(Confirmation {
        operation: "get",
        container: req.source.container.clone(),
        object: object.clone(),
        message: format!(
            "Downloaded object {object} to {}",
            req.destination.display()
        ),
    })
}
