//! ObjectConnection trait definition
//!
//! This trait defines the capabilities the object operations need from a
//! storage connection. It allows the operations to be decoupled from the
//! concrete Swift client and to be mocked in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Object headers returned by the service, keyed by header name
pub type ObjectHeaders = BTreeMap<String, String>;

/// Streamed object content
pub type ObjectStream = BoxStream<'static, Result<Bytes>>;

/// Metadata for a single object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Object name
    pub name: String,

    /// Content type as reported by the service
    pub content_type: String,

    /// Size in bytes
    pub bytes: u64,

    /// Last-modified timestamp as sent by the service
    pub last_modified: String,

    /// Content hash (MD5 hex for plain objects)
    pub hash: String,

    /// Whether the name denotes a pseudo-directory
    pub pseudo_directory: bool,

    /// Subdirectory prefix for delimiter listings
    pub subdir: String,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for a plain object
    pub fn file(name: impl Into<String>, bytes: u64) -> Self {
        Self {
            name: name.into(),
            bytes,
            ..Default::default()
        }
    }

    /// Human-readable size
    pub fn size_human(&self) -> String {
        humansize::format_size(self.bytes, humansize::BINARY)
    }
}

/// Storage endpoint of an authenticated connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Account storage URL, e.g. `https://swift.example.com/v1/AUTH_acct`
    pub storage_url: String,

    /// Token sent as `X-Auth-Token`
    pub auth_token: String,
}

impl Endpoint {
    /// URL of an object under the storage URL; `/` in the object name is kept as a path separator
    pub fn object_url(&self, container: &str, object: &str) -> Result<url::Url> {
        let mut url = self.container_url(container)?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid storage URL: {}", self.storage_url)))?
            .extend(object.split('/'));
        Ok(url)
    }

    /// URL of a container under the storage URL
    pub fn container_url(&self, container: &str) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.storage_url)?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid storage URL: {}", self.storage_url)))?
            .pop_if_empty()
            .push(container);
        Ok(url)
    }
}

/// An open remote write session created by [`ObjectConnection::create_object`]
#[async_trait]
pub trait ObjectWriter: Send {
    /// Send a chunk of object content
    async fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Finalize the upload and wait for the service to accept it
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Capabilities required from an authenticated storage connection
///
/// Implemented by the Swift adapter and mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectConnection: Send + Sync {
    /// Get metadata and the full header set of an object
    async fn object_info(&self, container: &str, object: &str)
    -> Result<(ObjectInfo, ObjectHeaders)>;

    /// Get the names of every object in a container, following pagination
    async fn object_names_all(&self, container: &str) -> Result<Vec<String>>;

    /// Start writing a plain object; `hash` lets the service verify the upload
    async fn create_object(
        &self,
        container: &str,
        object: &str,
        hash: Option<String>,
        content_type: Option<String>,
    ) -> Result<Box<dyn ObjectWriter>>;

    /// Server-side copy of an object
    async fn copy_object(
        &self,
        src_container: &str,
        src_object: &str,
        dst_container: &str,
        dst_object: &str,
    ) -> Result<()>;

    /// Stream the content of an object
    async fn get_object(&self, container: &str, object: &str) -> Result<ObjectStream>;

    /// Delete a single object
    async fn delete_object(&self, container: &str, object: &str) -> Result<()>;

    /// Storage URL and current token, for requests the connection doesn't model
    fn endpoint(&self) -> Endpoint;

    /// HTTP client carrying the connection's TLS and timeout settings
    fn http_client(&self) -> reqwest::Client;
}

/// Receives the name of the stage an operation is in
pub trait StatusSink: Send + Sync {
    fn set_stage(&self, stage: &str);
}

/// Sink that discards status updates
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStatus;

impl StatusSink for NoStatus {
    fn set_stage(&self, _stage: &str) {}
}
