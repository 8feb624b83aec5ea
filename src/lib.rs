use thiserror::Error;

use self::rpc::{ConnectClient, RpcError};

pub mod builder;
pub mod client;
pub mod rpc;
pub mod stream;
pub mod transport;
pub mod types;

/// The default Function Network API gateway base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.function.network";

/// A client that can make inference calls against the Function Network.
///
/// Holds the API key used to authenticate every call and the RPC service handle
/// bound to the configured transport. Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct FunctionClient {
    api_key: String,
    service: ConnectClient,
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A client was being built, but no API key was provided for it to use.
    #[error("missing API key")]
    MissingCredential,

    /// A streaming response ended before the information it must carry could be read.
    /// This can be indicative of a network issue or an API gateway malfunction.
    #[error("the stream response was truncated")]
    TruncatedStreamResponse,

    #[error("Client error: {0}")]
    Client(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
