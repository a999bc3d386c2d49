use std::path::Path;

use tokio::io::AsyncReadExt;
use tracing::debug;

use super::Confirmation;
use crate::error::{Error, Result};
use crate::request::PutRequest;
use crate::traits::{ObjectConnection, StatusSink};

/// Largest file that can be stored as a single object (5 GB)
pub const MAX_OBJECT_SIZE: u64 = 1000 * 1000 * 1000 * 5;

/// Upload a local file as a single plain object.
///
/// The whole file is read into memory and its MD5 digest sent with the create
/// call, so the service rejects a corrupted upload. A failure after the
/// object was created can leave a partial object behind; nothing is rolled back.
pub async fn put_object(
    conn: &dyn ObjectConnection,
    req: &PutRequest,
    status: &dyn StatusSink,
) -> Result<Confirmation> {
    status.set_stage("Uploading object");

    let object = req.object_name()?;
    let data = read_source(&req.source).await.map_err(|e| {
        e.context(&format!(
            "Failed to get file contents at path {}",
            req.source.display()
        ))
    })?;
    let hash = hash_source(&data);
    let content_type = mime_guess::from_path(&object)
        .first()
        .map(|m| m.essence_str().to_string());
    debug!(container = %req.container, %object, bytes = data.len(), %hash, "Uploading object");

    let mut writer = conn
        .create_object(&req.container, &object, Some(hash), content_type)
        .await
        .map_err(|e| e.context("Failed to create object"))?;

    writer
        .write(&data)
        .await
        .map_err(|e| e.context("Failed to write object"))?;

    writer
        .close()
        .await
        .map_err(|e| e.context("Failed to close object writer"))?;

    Ok(Confirmation {
        operation: "put",
        message: format!("Uploaded object {object} to container {}", req.container),
        container: req.container.clone(),
        object,
    })
}

/// Read a whole source file, refusing files at or above [`MAX_OBJECT_SIZE`]
pub async fn read_source(path: &Path) -> Result<Vec<u8>> {
    let local = |what: &str, e: std::io::Error| Error::LocalIo(format!("{what}: {e}"));

    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| local("Failed to open source file", e))?;

    let size = file
        .metadata()
        .await
        .map_err(|e| local("Failed to get source file info", e))?
        .len();

    if size >= MAX_OBJECT_SIZE {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        return Err(Error::FileTooLarge(format!(
            "{name} is {size} bytes, a single object must be under {MAX_OBJECT_SIZE} bytes"
        )));
    }

    let mut data = Vec::with_capacity(size as usize);
    file.read_to_end(&mut data)
        .await
        .map_err(|e| local("Failed to read source file", e))?;

    Ok(data)
}

/// Hex-encoded MD5 digest of the content
pub fn hash_source(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}
