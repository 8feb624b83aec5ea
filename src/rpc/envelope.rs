//! Length-prefixed envelopes used by streaming calls.
//!
//! Each envelope is one flags byte, a big-endian `u32` payload length and the
//! payload. The last envelope of a response carries [`END_STREAM_FLAG`] and a JSON
//! [`EndStreamMessage`] instead of a message.

use std::collections::HashMap;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tokio_util::codec::{Decoder, Encoder};

use crate::rpc::RpcError;
use crate::{Error, Result};

pub const COMPRESSED_FLAG: u8 = 0b0000_0001;
pub const END_STREAM_FLAG: u8 = 0b0000_0010;

const PREFIX_LEN: usize = 5;

/// Largest payload accepted from the server.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub flags: u8,
    pub data: Bytes,
}

impl Envelope {
    pub fn message(data: impl Into<Bytes>) -> Self {
        Self {
            flags: 0,
            data: data.into(),
        }
    }

    pub fn end_stream(data: impl Into<Bytes>) -> Self {
        Self {
            flags: END_STREAM_FLAG,
            data: data.into(),
        }
    }

    pub fn is_end_stream(&self) -> bool {
        self.flags & END_STREAM_FLAG != 0
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & COMPRESSED_FLAG != 0
    }
}

/// Payload of the final envelope of a stream.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct EndStreamMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Vec<String>>,
}

impl EndStreamMessage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes).map_err(Error::JsonParse)
    }
}

#[derive(Debug, Clone)]
pub struct EnvelopeCodec {
    max_message_size: usize,
}

impl EnvelopeCodec {
    pub fn new() -> Self {
        Self::with_max_message_size(DEFAULT_MAX_MESSAGE_SIZE)
    }

    pub fn with_max_message_size(max_message_size: usize) -> Self {
        Self { max_message_size }
    }
}

impl Default for EnvelopeCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for EnvelopeCodec {
    type Item = Envelope;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Envelope>> {
        if src.len() < PREFIX_LEN {
            return Ok(None);
        }

        let flags = src[0];
        let len = u32::from_be_bytes([src[1], src[2], src[3], src[4]]) as usize;
        if len > self.max_message_size {
            return Err(Error::Protocol(format!(
                "message of {} bytes exceeds the {} byte limit",
                len, self.max_message_size
            )));
        }

        if src.len() < PREFIX_LEN + len {
            src.reserve(PREFIX_LEN + len - src.len());
            return Ok(None);
        }

        src.advance(PREFIX_LEN);
        let data = src.split_to(len).freeze();
        Ok(Some(Envelope { flags, data }))
    }
}

impl Encoder<Envelope> for EnvelopeCodec {
    type Error = Error;

    fn encode(&mut self, item: Envelope, dst: &mut BytesMut) -> Result<()> {
        let len = u32::try_from(item.data.len())
            .map_err(|_| Error::Protocol("message too large to frame".into()))?;
        dst.reserve(PREFIX_LEN + item.data.len());
        dst.put_u8(item.flags);
        dst.put_u32(len);
        dst.extend_from_slice(&item.data);
        Ok(())
    }
}

/// Serializes `message` as JSON and frames it as a single envelope.
pub fn encode_message<T: Serialize>(message: &T) -> Result<Bytes> {
    let data = serde_json::to_vec(message)?;
    let mut dst = BytesMut::new();
    EnvelopeCodec::new().encode(Envelope::message(data), &mut dst)?;
    Ok(dst.freeze())
}

/// Frames an end-of-stream envelope, optionally carrying an error.
pub fn encode_end_stream(error: Option<&RpcError>) -> Result<Bytes> {
    let message = EndStreamMessage {
        error: error.cloned(),
        metadata: HashMap::new(),
    };
    let data = serde_json::to_vec(&message)?;
    let mut dst = BytesMut::new();
    EnvelopeCodec::new().encode(Envelope::end_stream(data), &mut dst)?;
    Ok(dst.freeze())
}
