use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use bytes::BytesMut;
use futures::StreamExt;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::rpc::envelope::encode_message;
use crate::rpc::{ConnectServerStream, Interceptor, RpcError, SERVICE_NAME};
use crate::transport::Transport;
use crate::types::{ByteStream, HttpRequest};
use crate::{Error, Result};

const CONTENT_TYPE_HEADER: &str = "content-type";
const PROTOCOL_VERSION_HEADER: &str = "connect-protocol-version";

const UNARY_CONTENT_TYPE: &str = "application/json";
const STREAMING_CONTENT_TYPE: &str = "application/connect+json";

/// A service handle: a transport bound to a base URL, with interceptors applied to
/// every outgoing request.
#[derive(Clone)]
pub struct ConnectClient {
    transport: Arc<dyn Transport + Send + Sync>,
    base_url: Url,
    interceptors: Arc<[Arc<dyn Interceptor>]>,
}

impl ConnectClient {
    pub fn new(
        transport: Arc<dyn Transport + Send + Sync>,
        base_url: Url,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Self {
        Self {
            transport,
            base_url,
            interceptors: interceptors.into(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Performs a unary call to `method` of the gateway service and returns the decoded response message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rpc`] when the gateway answers with an error, and propagates
    /// transport and decoding errors unchanged.
    #[cfg_attr(feature = "tracing", instrument(skip(self, message)))]
    pub async fn unary<Req, Res>(&self, method: &str, message: &Req) -> Result<Res>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned,
    {
        let body = serde_json::to_vec(message)?;
        let request = HttpRequest::new(self.method_url(method))
            .post()
            .header(CONTENT_TYPE_HEADER, UNARY_CONTENT_TYPE)?
            .header(PROTOCOL_VERSION_HEADER, "1")?
            .body(body);
        let request = self.intercept(request)?;

        let response = self.transport.send_http_request(request).await?;
        if !response.is_success() {
            return Err(RpcError::from_http(response.status, response.body.as_deref()).into());
        }

        match response.body {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(Error::JsonParse),
            None => Err(Error::Protocol("Missing response body".into())),
        }
    }

    /// Opens a server-streaming call. Only the response head has been received when
    /// this returns; messages are pulled from the returned handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rpc`] when the gateway rejects the call outright, and
    /// propagates transport errors unchanged.
    #[cfg_attr(feature = "tracing", instrument(skip(self, message)))]
    pub async fn server_stream<Req, Res>(
        &self,
        method: &str,
        message: &Req,
    ) -> Result<ConnectServerStream<Res>>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned + Send,
    {
        let body = encode_message(message)?;
        let request = HttpRequest::new(self.method_url(method))
            .post()
            .header(CONTENT_TYPE_HEADER, STREAMING_CONTENT_TYPE)?
            .body(body);
        let request = self.intercept(request)?;

        let response = self.transport.send_http_stream_request(request).await?;
        if !response.is_success() {
            let body = collect_body(response.body).await?;
            return Err(RpcError::from_http(response.status, Some(&body[..])).into());
        }

        Ok(ConnectServerStream::new(response.body))
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            SERVICE_NAME,
            method
        )
    }

    fn intercept(&self, mut request: HttpRequest) -> Result<HttpRequest> {
        for interceptor in self.interceptors.iter() {
            request = interceptor.intercept(request)?;
        }
        Ok(request)
    }
}

async fn collect_body(mut body: ByteStream) -> Result<BytesMut> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = body.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer)
}
