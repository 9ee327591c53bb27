//! In-process transport fed through channels

use super::{ByteStream, ChatRequest, ChatTransport};
use crate::error::{StreamDocError, StreamDocResult};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Transport whose response streams are fed by the caller.
///
/// Each `open_stream` call takes the next stream prepared with
/// [`ChannelTransport::prepare_stream`].
#[derive(Debug, Default)]
pub struct ChannelTransport {
    streams: Mutex<VecDeque<mpsc::UnboundedReceiver<StreamDocResult<Bytes>>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

/// Write half of a prepared stream; dropping it ends the stream
#[derive(Debug, Clone)]
pub struct StreamSender {
    tx: mpsc::UnboundedSender<StreamDocResult<Bytes>>,
}

impl StreamSender {
    /// Deliver one chunk. Returns false once the reader has gone away.
    pub fn send(&self, chunk: impl Into<Bytes>) -> bool {
        self.tx.send(Ok(chunk.into())).is_ok()
    }

    /// Deliver a transport failure
    pub fn fail(&self, error: StreamDocError) -> bool {
        self.tx.send(Err(error)).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response stream for the next `open_stream` call
    pub fn prepare_stream(&self) -> StreamSender {
        let (tx, rx) = mpsc::unbounded_channel();
        self.streams.lock().push_back(rx);
        StreamSender { tx }
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatTransport for ChannelTransport {
    async fn open_stream(&self, request: &ChatRequest) -> StreamDocResult<ByteStream> {
        self.requests.lock().push(request.clone());
        let rx = self
            .streams
            .lock()
            .pop_front()
            .ok_or_else(|| StreamDocError::transport("No stream prepared for request"))?;
        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }
}
