//! Contains data structures for requests and responses to the Function Network API gateway.
//!
//! Message types mirror the gateway's JSON messages and are passed through unchanged;
//! the HTTP types are the currency of the [`Transport`](crate::transport::Transport) layer.

pub mod chat;
pub mod embed;
pub mod image;
pub mod transcribe;
mod http;

pub use http::*;
