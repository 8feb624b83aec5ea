use async_trait::async_trait;

use crate::types::{HttpRequest, HttpResponse, HttpStreamResponse};
use crate::Result;

mod mock_transport;
mod reqwest_transport;

pub use mock_transport::MockTransport;
pub use reqwest_transport::ReqwestTransport;

/// An HTTP-capable client the RPC layer sends its requests through.
///
/// Implementations perform the exchange and report the status code as-is; they
/// do not interpret non-success statuses, which carry RPC error payloads.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends a request and buffers the whole response body.
    async fn send_http_request(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Sends a request and returns as soon as the response head arrives, with the
    /// body delivered as a stream. Dropping the body aborts the exchange.
    async fn send_http_stream_request(&self, request: HttpRequest) -> Result<HttpStreamResponse>;
}
