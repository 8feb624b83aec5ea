#[cfg(feature = "metrics")]
use metrics::counter;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::builder::FunctionClientBuilder;
use crate::rpc::{
    ServerStreamingCall, CHAT_COMPLETE_METHOD, CHAT_COMPLETE_STREAM_METHOD, EMBED_METHOD,
    TEXT_TO_IMAGE_METHOD, TRANSCRIBE_METHOD,
};
use crate::stream::{chunk_content, ChatCompleteStreamResponse, ResponseStream};
use crate::types::chat::{
    ChatCompleteRequest, ChatCompleteResponse, ChatCompleteStreamChunk,
    ChatCompleteStreamRequest,
};
use crate::types::embed::{EmbedRequest, EmbedResponse};
use crate::types::image::{TextToImageRequest, TextToImageResponse};
use crate::types::transcribe::{TranscribeRequest, TranscribeResponse};
use crate::FunctionClient;
use crate::{Error, Result};

impl FunctionClient {
    pub fn builder() -> FunctionClientBuilder {
        FunctionClientBuilder::new()
    }

    /// Creates a client with the default transport and base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// The API key this client authenticates with.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Generates the next reply for a list of messages, returned all at once along
    /// with its token count. Use [`chat_complete_stream`](FunctionClient::chat_complete_stream)
    /// to receive the reply token by token instead.
    #[cfg_attr(feature = "tracing", instrument(skip(self, request)))]
    pub async fn chat_complete(&self, request: ChatCompleteRequest) -> Result<ChatCompleteResponse> {
        #[cfg(feature = "metrics")]
        counter!("function_client.requests_total", "method" => "chat_complete", "type" => "unary")
            .increment(1);

        self.service.unary(CHAT_COMPLETE_METHOD, &request).await
    }

    /// Generates the next reply for a list of messages, streamed token by token.
    ///
    /// The first chunk of the response is read before this returns, to learn the
    /// role of the reply. Closing the returned token stream cancels the response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedStreamResponse`] if the response ends before its
    /// first chunk, and propagates call setup and transport errors unchanged.
    #[cfg_attr(feature = "tracing", instrument(skip(self, request)))]
    pub async fn chat_complete_stream(
        &self,
        request: ChatCompleteStreamRequest,
    ) -> Result<ChatCompleteStreamResponse> {
        #[cfg(feature = "metrics")]
        counter!("function_client.requests_total", "method" => "chat_complete_stream", "type" => "streaming")
            .increment(1);

        let mut call = self
            .service
            .server_stream::<_, ChatCompleteStreamChunk>(CHAT_COMPLETE_STREAM_METHOD, &request)
            .await?;

        // The first chunk carries the role; the rest carry content.
        let first = match call.receive().await {
            Some(chunk) => chunk?,
            None => return Err(Error::TruncatedStreamResponse),
        };

        Ok(ChatCompleteStreamResponse {
            role: first.response.role,
            token_stream: ResponseStream::new(call, chunk_content),
        })
    }

    /// Turns one or more input strings into vector embeddings.
    #[cfg_attr(feature = "tracing", instrument(skip(self, request)))]
    pub async fn embed(&self, request: EmbedRequest) -> Result<EmbedResponse> {
        #[cfg(feature = "metrics")]
        counter!("function_client.requests_total", "method" => "embed", "type" => "unary")
            .increment(1);

        self.service.unary(EMBED_METHOD, &request).await
    }

    /// Generates an image from a text prompt. The image is returned as a download URL.
    #[cfg_attr(feature = "tracing", instrument(skip(self, request)))]
    pub async fn text_to_image(&self, request: TextToImageRequest) -> Result<TextToImageResponse> {
        #[cfg(feature = "metrics")]
        counter!("function_client.requests_total", "method" => "text_to_image", "type" => "unary")
            .increment(1);

        self.service.unary(TEXT_TO_IMAGE_METHOD, &request).await
    }

    /// Transcribes the speech in the audio at `request.audio_url`, as a block of text
    /// and as a list of timestamped words.
    #[cfg_attr(feature = "tracing", instrument(skip(self, request)))]
    pub async fn transcribe(&self, request: TranscribeRequest) -> Result<TranscribeResponse> {
        #[cfg(feature = "metrics")]
        counter!("function_client.requests_total", "method" => "transcribe", "type" => "unary")
            .increment(1);

        self.service.unary(TRANSCRIBE_METHOD, &request).await
    }
}
