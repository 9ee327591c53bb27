//! HTTP streaming transport

use super::{ByteStream, ChatRequest, ChatTransport};
use crate::config::ClientConfig;
use crate::error::{StreamDocError, StreamDocResult};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{ACCEPT, HeaderValue};

const EVENT_STREAM: &str = "text/event-stream";

/// POSTs the request as JSON and streams the response body
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Transport with default client settings
    pub fn new(endpoint: impl Into<String>) -> StreamDocResult<Self> {
        Self::from_config(&ClientConfig {
            endpoint: endpoint.into(),
            ..ClientConfig::default()
        })
    }

    pub fn from_config(config: &ClientConfig) -> StreamDocResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout());
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder.build().map_err(|e| {
            StreamDocError::config(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn open_stream(&self, request: &ChatRequest) -> StreamDocResult<ByteStream> {
        tracing::debug!(endpoint = %self.endpoint, "opening chat stream");

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, HeaderValue::from_static(EVENT_STREAM))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            return Err(StreamDocError::http_with_status(
                format!("Chat endpoint returned {}: {}", status, body.trim()),
                status.as_u16(),
                url,
            ));
        }

        let stream = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| StreamDocError::transport(format!("Stream error: {}", e)))
        });
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_streams_response_body() {
        let server = MockServer::start().await;
        let body = "data: {\"type\":\"token\",\"text\":\"hi\"}\n\ndata: {\"type\":\"done\"}\n\n";
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("accept", "text/event-stream"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({"content": "hello"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(format!("{}/chat", server.uri())).unwrap();
        let mut stream = transport
            .open_stream(&ChatRequest::new("hello"))
            .await
            .unwrap();

        let mut received = Vec::new();
        while let Some(chunk) = stream.next().await {
            received.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(String::from_utf8(received).unwrap(), body);
    }

    #[tokio::test]
    async fn test_error_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(format!("{}/chat", server.uri())).unwrap();
        let err = match transport.open_stream(&ChatRequest::new("x")).await {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        match err {
            StreamDocError::Http {
                status_code,
                message,
                ..
            } => {
                assert_eq!(status_code, Some(503));
                assert!(message.contains("overloaded"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        assert!(HttpTransport::new("localhost:8000/chat").is_err());
    }
}
