//! Pull-based streaming responses.
//!
//! A [`ResponseStream`] wraps a server-streaming call and exposes each message it
//! receives through a projection, so callers only ever see the value they care
//! about (for chat completion, the next piece of text).

#[cfg(feature = "metrics")]
use metrics::counter;

use futures::stream::{unfold, Stream};

use crate::rpc::ServerStreamingCall;
use crate::types::chat::ChatCompleteStreamChunk;
use crate::Result;

/// A streaming response that can be read chunk by chunk.
///
/// [`read`](ResponseStream::read) returns `Ok(Some(_))` for each chunk and `Ok(None)`
/// once the stream is complete. Every read after that, and every read after
/// [`close`](ResponseStream::close), also returns `Ok(None)`.
///
/// If you are no longer interested in a stream, call `close`: the server is told
/// to stop sending chunks and nothing more is read locally, even if some chunks
/// were already in flight.
///
/// Reads take `&mut self`, so a single stream cannot be read from concurrently.
pub struct ResponseStream<TIn, TOut> {
    closed: bool,
    call: Box<dyn ServerStreamingCall<TIn>>,
    transformer: Box<dyn Fn(TIn) -> TOut + Send + Sync>,
}

impl<TIn, TOut> ResponseStream<TIn, TOut>
where
    TIn: Send + 'static,
    TOut: Send + 'static,
{
    /// Wraps `call`, projecting each received message through `transformer`.
    pub fn new<C, F>(call: C, transformer: F) -> Self
    where
        C: ServerStreamingCall<TIn> + 'static,
        F: Fn(TIn) -> TOut + Send + Sync + 'static,
    {
        Self {
            closed: false,
            call: Box::new(call),
            transformer: Box::new(transformer),
        }
    }

    /// Returns whether the stream is closed, either by [`close`](ResponseStream::close)
    /// or because a read found the stream finished or failed.
    ///
    /// This does not notice a connection that went away since the last read.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Receives a single chunk from the stream.
    ///
    /// Returns `Ok(None)` when the stream is done or has been closed. A failure
    /// reported by the transport or the server is returned as `Err` and closes the
    /// stream; the value of a chunk is never returned together with an error.
    pub async fn read(&mut self) -> Result<Option<TOut>> {
        if self.closed {
            return Ok(None);
        }

        match self.call.receive().await {
            Some(Ok(message)) => {
                #[cfg(feature = "metrics")]
                counter!("function_client.stream_chunks_total").increment(1);

                Ok(Some((self.transformer)(message)))
            }
            Some(Err(e)) => {
                self.closed = true;
                Err(e)
            }
            None => {
                self.closed = true;
                Ok(None)
            }
        }
    }

    /// Ends the stream. Any subsequent call to [`read`](ResponseStream::read) yields `Ok(None)`.
    ///
    /// The stream is considered closed even if an error is returned.
    pub async fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.call.close().await
    }

    /// Converts this into a [`Stream`] of chunks that ends where `read` would
    /// return `Ok(None)`.
    pub fn into_stream(self) -> impl Stream<Item = Result<TOut>> + Send {
        unfold(self, |mut stream| async move {
            match stream.read().await {
                Ok(Some(value)) => Some((Ok(value), stream)),
                Ok(None) => None,
                Err(e) => Some((Err(e), stream)),
            }
        })
    }
}

/// The streamed reply of [`FunctionClient::chat_complete_stream`](crate::FunctionClient::chat_complete_stream).
pub struct ChatCompleteStreamResponse {
    /// The role of the reply's author.
    pub role: String,

    /// The reply's content, token by token.
    pub token_stream: ResponseStream<ChatCompleteStreamChunk, String>,
}

pub(crate) fn chunk_content(chunk: ChatCompleteStreamChunk) -> String {
    chunk.response.content
}
