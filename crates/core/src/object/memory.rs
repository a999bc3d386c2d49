//! In-memory connection used by the operation tests

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use crate::error::{Error, Result};
use crate::traits::{
    Endpoint, ObjectConnection, ObjectHeaders, ObjectInfo, ObjectStream, ObjectWriter,
};

type Store = Arc<Mutex<BTreeMap<(String, String), Vec<u8>>>>;

pub(crate) struct MemoryConnection {
    objects: Store,
    fail_deletes: AtomicBool,
}

impl MemoryConnection {
    pub(crate) fn new() -> Self {
        Self {
            objects: Arc::default(),
            fail_deletes: AtomicBool::new(false),
        }
    }

    pub(crate) fn insert(&self, container: &str, object: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert((container.to_string(), object.to_string()), data.to_vec());
    }

    pub(crate) fn contains(&self, container: &str, object: &str) -> bool {
        self.content(container, object).is_some()
    }

    pub(crate) fn content(&self, container: &str, object: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(container.to_string(), object.to_string()))
            .cloned()
    }

    pub(crate) fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    fn lookup(&self, container: &str, object: &str) -> Result<Vec<u8>> {
        self.content(container, object)
            .ok_or_else(|| Error::NotFound(format!("{container}/{object}")))
    }
}

struct MemoryWriter {
    objects: Store,
    key: (String, String),
    hash: Option<String>,
    buf: Vec<u8>,
}

#[async_trait]
impl ObjectWriter for MemoryWriter {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.buf.extend_from_slice(data);
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let this = *self;
        let actual = format!("{:x}", md5::compute(&this.buf));
        if let Some(expected) = this.hash
            && expected != actual
        {
            return Err(Error::Transport("HTTP 422 Unprocessable Entity".into()));
        }
        this.objects.lock().unwrap().insert(this.key, this.buf);
        Ok(())
    }
}

#[async_trait]
impl ObjectConnection for MemoryConnection {
    async fn object_info(
        &self,
        container: &str,
        object: &str,
    ) -> Result<(ObjectInfo, ObjectHeaders)> {
        let data = self.lookup(container, object)?;
        let mut info = ObjectInfo::file(object, data.len() as u64);
        info.content_type = "application/octet-stream".into();
        info.last_modified = "Thu, 01 Jan 2026 00:00:00 GMT".into();
        info.hash = format!("{:x}", md5::compute(&data));

        let mut headers = ObjectHeaders::new();
        headers.insert("Content-Length".into(), data.len().to_string());
        headers.insert("Etag".into(), info.hash.clone());
        Ok((info, headers))
    }

    async fn object_names_all(&self, container: &str) -> Result<Vec<String>> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(c, _)| c == container)
            .map(|(_, o)| o.clone())
            .collect())
    }

    async fn create_object(
        &self,
        container: &str,
        object: &str,
        hash: Option<String>,
        _content_type: Option<String>,
    ) -> Result<Box<dyn ObjectWriter>> {
        Ok(Box::new(MemoryWriter {
            objects: Arc::clone(&self.objects),
            key: (container.to_string(), object.to_string()),
            hash,
            buf: Vec::new(),
        }))
    }

    async fn copy_object(
        &self,
        src_container: &str,
        src_object: &str,
        dst_container: &str,
        dst_object: &str,
    ) -> Result<()> {
        let data = self.lookup(src_container, src_object)?;
        self.insert(dst_container, dst_object, &data);
        Ok(())
    }

    async fn get_object(&self, container: &str, object: &str) -> Result<ObjectStream> {
        let data = self.lookup(container, object)?;
        let chunks: Vec<Result<Bytes>> = data
            .chunks(4)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        Ok(futures::stream::iter(chunks).boxed())
    }

    async fn delete_object(&self, container: &str, object: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Error::Transport("HTTP 503 Service Unavailable".into()));
        }
        self.objects
            .lock()
            .unwrap()
            .remove(&(container.to_string(), object.to_string()))
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("{container}/{object}")))
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint {
            storage_url: "http://127.0.0.1:9/v1/AUTH_memory".into(),
            auth_token: "AUTH_tkmemory".into(),
        }
    }

    fn http_client(&self) -> reqwest::Client {
        reqwest::Client::new()
    }
}
