//! Streaming object upload
//!
//! The PUT request is started when the writer is created and its body is fed
//! through a bounded channel, so content is sent as it is written.

use async_trait::async_trait;
use bytes::Bytes;
use futures::SinkExt;
use futures::channel::mpsc;
use reqwest::{Body, RequestBuilder};
use swo_core::{Error, ObjectWriter, Result};
use tokio::task::JoinHandle;

use crate::client::check_status;

/// Chunks buffered between the writer and the request body
const CHANNEL_DEPTH: usize = 8;

type Chunk = std::result::Result<Bytes, std::io::Error>;

/// Writer for one in-flight object PUT
pub struct SwiftWriter {
    tx: Option<mpsc::Sender<Chunk>>,
    task: Option<JoinHandle<Result<()>>>,
}

impl SwiftWriter {
    /// Start the request; `what` names the object in error messages
    pub(crate) fn start(request: RequestBuilder, what: String) -> Self {
        let (tx, rx) = mpsc::channel::<Chunk>(CHANNEL_DEPTH);
        let task = tokio::spawn(async move {
            let response = request
                .body(Body::wrap_stream(rx))
                .send()
                .await
                .map_err(|e| Error::Transport(format!("Failed to upload {what}: {e}")))?;
            check_status(response, &what).await?;
            Ok(())
        });

        Self {
            tx: Some(tx),
            task: Some(task),
        }
    }

    async fn finish(&mut self) -> Result<()> {
        match self.task.take() {
            Some(task) => task
                .await
                .map_err(|e| Error::General(format!("Upload task failed: {e}")))?,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectWriter for SwiftWriter {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let Some(tx) = self.tx.as_mut() else {
            return Err(Error::General("Object writer is closed".into()));
        };
        if tx.send(Ok(Bytes::copy_from_slice(data))).await.is_ok() {
            return Ok(());
        }

        // The request ended before the body was consumed; report its outcome.
        self.tx = None;
        self.finish().await?;
        Err(Error::Transport(
            "Upload ended before all content was sent".into(),
        ))
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        // Dropping the sender ends the request body.
        self.tx = None;
        self.finish().await
    }
}
