//! Seismogram extraction backend and response streaming.
//!
//! The extractor runs on its own task and pushes encoded chunks into a
//! bounded channel that feeds the response body. When the client goes away
//! the body is dropped, the channel closes and the extractor's next
//! [`ChunkSink::send`] fails with [`ExtractionError::Cancelled`].

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use bytes::Bytes;
use seismo_protocol::window::AbsoluteWindow;
use seismo_protocol::SeismogramsQuery;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::metrics::record_cancelled;

/// Everything an extractor needs to produce seismograms.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub query: SeismogramsQuery,
    /// Absolute window, already clipped to the available data.
    pub window: AbsoluteWindow,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractionError {
    /// The receiving end is gone.
    #[error("client disconnected")]
    Cancelled,

    #[error("Extraction failed: {0}")]
    Failed(String),
}

type Chunk = Result<Bytes, io::Error>;

/// Write side of a streamed response.
#[derive(Debug, Clone)]
pub struct ChunkSink {
    tx: mpsc::Sender<Chunk>,
}

impl ChunkSink {
    /// Create a sink and the receiver that drains it.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Chunk>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Whether the consumer has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Push one encoded chunk, waiting for buffer space.
    pub async fn send(&self, chunk: Bytes) -> Result<(), ExtractionError> {
        self.tx
            .send(Ok(chunk))
            .await
            .map_err(|_| ExtractionError::Cancelled)
    }

    async fn abort(&self, message: String) {
        // The body turns this into a broken connection.
        let _ = self
            .tx
            .send(Err(io::Error::new(io::ErrorKind::Other, message)))
            .await;
    }
}

/// Produces encoded seismograms for a validated request.
#[async_trait]
pub trait SeismogramExtractor: Send + Sync {
    /// Stream the encoded output into `sink`.
    ///
    /// Implementations must return promptly once a send fails or
    /// [`ChunkSink::is_closed`] reports true.
    async fn extract(
        &self,
        request: ExtractionRequest,
        sink: ChunkSink,
    ) -> Result<(), ExtractionError>;
}

/// Turn the receiving half of a sink into a response body.
pub fn body_from_receiver(rx: mpsc::Receiver<Chunk>) -> Body {
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (chunk, rx))
    });
    Body::from_stream(stream)
}

/// Run `extractor` on its own task and return the body it feeds.
pub fn spawn_extraction(
    extractor: Arc<dyn SeismogramExtractor>,
    request: ExtractionRequest,
    capacity: usize,
) -> (Body, JoinHandle<()>) {
    let (sink, rx) = ChunkSink::channel(capacity);

    let handle = tokio::spawn(async move {
        match extractor.extract(request, sink.clone()).await {
            Ok(()) => debug!("Extraction finished"),
            Err(ExtractionError::Cancelled) => {
                record_cancelled();
                info!("Client disconnected, extraction stopped");
            }
            Err(e) => {
                error!(error = %e, "Extraction failed mid-stream");
                sink.abort(e.to_string()).await;
            }
        }
    });

    (body_from_receiver(rx), handle)
}
