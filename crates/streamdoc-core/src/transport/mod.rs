//! Stream transports
//!
//! The session only needs in-order chunk delivery and an end-of-stream
//! signal, so a transport is anything that turns a `ChatRequest` into a
//! stream of byte chunks.

mod channel;
mod http;

pub use channel::{ChannelTransport, StreamSender};
pub use http::HttpTransport;

use crate::error::StreamDocResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Request body sent to the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub content: String,
}

impl ChatRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Stream of raw response chunks; `None` is end-of-stream
pub type ByteStream = Pin<Box<dyn Stream<Item = StreamDocResult<Bytes>> + Send>>;

/// Opens the response stream for a chat request
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn open_stream(&self, request: &ChatRequest) -> StreamDocResult<ByteStream>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for std::sync::Arc<T> {
    async fn open_stream(&self, request: &ChatRequest) -> StreamDocResult<ByteStream> {
        (**self).open_stream(request).await
    }
}
