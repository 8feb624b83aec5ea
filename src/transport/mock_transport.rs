use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

#[cfg(feature = "tracing")]
use tracing::instrument;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::rpc::envelope::{encode_end_stream, encode_message};
use crate::rpc::{Code, RpcError};
use crate::transport::Transport;
use crate::types::{HttpRequest, HttpResponse, HttpStreamResponse};
use crate::{Error, Result};

/// A canned streaming response body.
struct MockStream {
    status: u16,
    chunks: Vec<Bytes>,
}

/// A mock implementation of the [`Transport`] trait for testing purposes.
///
/// Responses are queued up front and handed out in order, one per request.
/// Every request the mock receives is recorded so tests can inspect the URL,
/// headers and body that the client produced.
#[derive(Clone, Default)]
pub struct MockTransport {
    /// Responses returned for non-streaming requests.
    http_responses: Arc<Mutex<VecDeque<HttpResponse>>>,
    /// Bodies returned for streaming requests.
    streams: Arc<Mutex<VecDeque<MockStream>>>,
    /// When set, the next request of either kind fails with this message.
    failure: Arc<Mutex<Option<String>>>,
    /// Requests received so far.
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    /// Creates a new, empty [`MockTransport`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw [`HttpResponse`] for the next non-streaming request.
    pub fn with_http_response(self, response: HttpResponse) -> Self {
        self.http_responses.lock().unwrap().push_back(response);
        self
    }

    /// Queues a successful unary response whose body is `message` as JSON.
    pub fn with_unary_message<T: Serialize>(self, message: &T) -> Result<Self> {
        let body = serde_json::to_vec(message)?;
        Ok(self.with_http_response(HttpResponse {
            status: 200,
            body: Some(Bytes::from(body)),
        }))
    }

    /// Queues a failed unary response carrying `error` the way the gateway encodes it.
    pub fn with_unary_error(self, status: u16, error: RpcError) -> Result<Self> {
        let body = serde_json::to_vec(&error)?;
        Ok(self.with_http_response(HttpResponse {
            status,
            body: Some(Bytes::from(body)),
        }))
    }

    /// Queues a streaming response that yields `messages` and then ends cleanly.
    pub fn with_stream_messages<T: Serialize>(self, messages: &[T]) -> Result<Self> {
        let mut chunks = messages
            .iter()
            .map(encode_message)
            .collect::<Result<Vec<_>>>()?;
        chunks.push(encode_end_stream(None)?);
        Ok(self.with_raw_stream(200, chunks))
    }

    /// Queues a streaming response that yields `messages` and then ends with an error.
    pub fn with_stream_error<T: Serialize>(
        self,
        messages: &[T],
        code: Code,
        message: impl Into<String>,
    ) -> Result<Self> {
        let mut chunks = messages
            .iter()
            .map(encode_message)
            .collect::<Result<Vec<_>>>()?;
        chunks.push(encode_end_stream(Some(&RpcError::new(code, message)))?);
        Ok(self.with_raw_stream(200, chunks))
    }

    /// Queues a streaming response made of raw body chunks, delivered one by one.
    pub fn with_raw_stream(self, status: u16, chunks: Vec<Bytes>) -> Self {
        self.streams
            .lock()
            .unwrap()
            .push_back(MockStream { status, chunks });
        self
    }

    /// Makes the next request fail before any response is produced, as a dropped
    /// connection would.
    pub fn with_transport_failure(self, message: impl Into<String>) -> Self {
        *self.failure.lock().unwrap() = Some(message.into());
        self
    }

    /// Returns every request received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: HttpRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request);
        match self.failure.lock().unwrap().take() {
            Some(message) => Err(Error::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                message,
            ))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    /// Mocks sending a non-streaming HTTP request.
    ///
    /// Returns the oldest queued response, or an empty `200` if none is queued.
    #[cfg_attr(feature = "tracing", instrument(skip(self, request)))]
    async fn send_http_request(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.record(request)?;
        let response = self.http_responses.lock().unwrap().pop_front();
        Ok(response.unwrap_or(HttpResponse {
            status: 200,
            body: None,
        }))
    }

    /// Mocks sending a streaming HTTP request.
    ///
    /// Returns the oldest queued stream, or an empty body if none is queued.
    #[cfg_attr(feature = "tracing", instrument(skip(self, request)))]
    async fn send_http_stream_request(&self, request: HttpRequest) -> Result<HttpStreamResponse> {
        self.record(request)?;
        let mock = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockStream {
                status: 200,
                chunks: Vec::new(),
            });
        Ok(HttpStreamResponse {
            status: mock.status,
            body: stream::iter(mock.chunks).map(Ok).boxed(),
        })
    }
}
