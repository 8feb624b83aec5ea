use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use bytes::BytesMut;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio_util::codec::Decoder;

use crate::rpc::envelope::{EndStreamMessage, Envelope, EnvelopeCodec};
use crate::rpc::ServerStreamingCall;
use crate::types::ByteStream;
use crate::{Error, Result};

/// The client half of a server-streaming call, decoding envelopes off a response body.
pub struct ConnectServerStream<M> {
    /// `None` once the call has finished, failed or been closed.
    body: Option<ByteStream>,
    buffer: BytesMut,
    codec: EnvelopeCodec,
    /// Set once the body has yielded any bytes.
    received: bool,
    trailers: HashMap<String, Vec<String>>,
    _marker: PhantomData<fn() -> M>,
}

impl<M> ConnectServerStream<M>
where
    M: DeserializeOwned + Send,
{
    pub fn new(body: ByteStream) -> Self {
        Self {
            body: Some(body),
            buffer: BytesMut::new(),
            codec: EnvelopeCodec::new(),
            received: false,
            trailers: HashMap::new(),
            _marker: PhantomData,
        }
    }

    /// Metadata the server sent along with the end-of-stream envelope.
    pub fn trailers(&self) -> &HashMap<String, Vec<String>> {
        &self.trailers
    }

    fn finish(&mut self) {
        self.body = None;
        self.buffer.clear();
    }

    fn handle(&mut self, envelope: Envelope) -> Option<Result<M>> {
        if envelope.is_compressed() {
            self.finish();
            return Some(Err(Error::Protocol(
                "received a compressed message, but no compression was negotiated".into(),
            )));
        }

        if envelope.is_end_stream() {
            self.finish();
            return match EndStreamMessage::from_bytes(&envelope.data) {
                Ok(end) => {
                    self.trailers = end.metadata;
                    end.error.map(|e| Err(e.into()))
                }
                Err(e) => Some(Err(e)),
            };
        }

        match serde_json::from_slice(&envelope.data) {
            Ok(message) => Some(Ok(message)),
            Err(e) => {
                self.finish();
                Some(Err(Error::JsonParse(e)))
            }
        }
    }
}

#[async_trait]
impl<M> ServerStreamingCall<M> for ConnectServerStream<M>
where
    M: DeserializeOwned + Send,
{
    async fn receive(&mut self) -> Option<Result<M>> {
        loop {
            match self.codec.decode(&mut self.buffer) {
                Ok(Some(envelope)) => return self.handle(envelope),
                Ok(None) => {}
                Err(e) => {
                    self.finish();
                    return Some(Err(e));
                }
            }

            let body = self.body.as_mut()?;
            let next = body.next().await;
            match next {
                Some(Ok(bytes)) => {
                    self.received |= !bytes.is_empty();
                    self.buffer.extend_from_slice(&bytes);
                }
                Some(Err(e)) => {
                    self.finish();
                    return Some(Err(e));
                }
                None if !self.received => {
                    // Nothing at all came back, not even an end-of-stream envelope.
                    self.finish();
                    return Some(Err(Error::TruncatedStreamResponse));
                }
                None => {
                    let reason = if self.buffer.is_empty() {
                        "stream ended without an end-of-stream message"
                    } else {
                        "stream ended in the middle of a message"
                    };
                    self.finish();
                    return Some(Err(Error::Protocol(reason.into())));
                }
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        // Dropping the body aborts the HTTP exchange.
        self.finish();
        Ok(())
    }
}
