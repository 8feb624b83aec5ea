//! Client side of the RPC protocol spoken by the API gateway.
//!
//! Calls are plain HTTP `POST`s to `{base_url}/{service}/{method}` with JSON
//! payloads. Unary calls exchange a single JSON message each way; server-streaming
//! calls receive a sequence of length-prefixed envelopes terminated by an
//! end-of-stream envelope (see [`envelope`]).

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Result;

mod connect;
pub mod envelope;
mod interceptor;
mod server_stream;

pub use connect::ConnectClient;
pub use interceptor::{auth_interceptor, Interceptor, API_KEY_HEADER};
pub use server_stream::ConnectServerStream;

/// Fully-qualified name of the gateway service.
pub const SERVICE_NAME: &str = "apigateway.v1.APIGatewayService";

pub const CHAT_COMPLETE_METHOD: &str = "ChatComplete";
pub const CHAT_COMPLETE_STREAM_METHOD: &str = "ChatCompleteStream";
pub const EMBED_METHOD: &str = "Embed";
pub const TEXT_TO_IMAGE_METHOD: &str = "TextToImage";
pub const TRANSCRIBE_METHOD: &str = "Transcribe";

/// A lower-level handle on an in-flight server-streaming call.
#[async_trait]
pub trait ServerStreamingCall<M>: Send {
    /// Receives the next message.
    ///
    /// Returns `None` once the call has finished cleanly, and keeps returning `None`
    /// afterwards. An error means the call has failed and no more messages follow.
    async fn receive(&mut self) -> Option<Result<M>>;

    /// Stops the call, telling the server to stop producing messages.
    async fn close(&mut self) -> Result<()>;
}

/// Status codes an RPC can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Code {
    Canceled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl Code {
    pub fn as_str(&self) -> &'static str {
        match self {
            Code::Canceled => "canceled",
            Code::Unknown => "unknown",
            Code::InvalidArgument => "invalid_argument",
            Code::DeadlineExceeded => "deadline_exceeded",
            Code::NotFound => "not_found",
            Code::AlreadyExists => "already_exists",
            Code::PermissionDenied => "permission_denied",
            Code::ResourceExhausted => "resource_exhausted",
            Code::FailedPrecondition => "failed_precondition",
            Code::Aborted => "aborted",
            Code::OutOfRange => "out_of_range",
            Code::Unimplemented => "unimplemented",
            Code::Internal => "internal",
            Code::Unavailable => "unavailable",
            Code::DataLoss => "data_loss",
            Code::Unauthenticated => "unauthenticated",
        }
    }

    /// The code implied by an HTTP status when the response carries no error body.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Code::Internal,
            401 => Code::Unauthenticated,
            403 => Code::PermissionDenied,
            404 => Code::Unimplemented,
            429 | 502 | 503 | 504 => Code::Unavailable,
            _ => Code::Unknown,
        }
    }
}

impl From<String> for Code {
    fn from(value: String) -> Self {
        match value.as_str() {
            "canceled" => Code::Canceled,
            "invalid_argument" => Code::InvalidArgument,
            "deadline_exceeded" => Code::DeadlineExceeded,
            "not_found" => Code::NotFound,
            "already_exists" => Code::AlreadyExists,
            "permission_denied" => Code::PermissionDenied,
            "resource_exhausted" => Code::ResourceExhausted,
            "failed_precondition" => Code::FailedPrecondition,
            "aborted" => Code::Aborted,
            "out_of_range" => Code::OutOfRange,
            "unimplemented" => Code::Unimplemented,
            "internal" => Code::Internal,
            "unavailable" => Code::Unavailable,
            "data_loss" => Code::DataLoss,
            "unauthenticated" => Code::Unauthenticated,
            _ => Code::Unknown,
        }
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported by the gateway for a call.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct RpcError {
    pub code: Code,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

#[derive(Deserialize)]
struct WireError {
    code: Option<Code>,
    #[serde(default)]
    message: String,
}

impl RpcError {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Builds the error for a non-success HTTP response.
    ///
    /// Uses the JSON error body when there is one; otherwise the code is derived
    /// from the status.
    pub fn from_http(status: u16, body: Option<&[u8]>) -> Self {
        let wire = body
            .filter(|b| !b.is_empty())
            .and_then(|b| serde_json::from_slice::<WireError>(b).ok());

        match wire {
            Some(WireError {
                code: Some(code),
                message,
            }) => Self { code, message },
            Some(WireError {
                code: None,
                message,
            }) if !message.is_empty() => Self::new(Code::from_http_status(status), message),
            _ => Self::new(
                Code::from_http_status(status),
                format!("HTTP status {}", status),
            ),
        }
    }
}
