use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use reqwest::Url;

use crate::rpc::{auth_interceptor, ConnectClient, Interceptor};
use crate::transport::{ReqwestTransport, Transport};
use crate::{Error, FunctionClient, Result, DEFAULT_BASE_URL};

/// A builder for constructing a [`FunctionClient`].
///
/// - Requires an API key; [`build`](FunctionClientBuilder::build) fails without one.
/// - Uses either the `FUNCTION_BASE_URL` environment variable or [`DEFAULT_BASE_URL`].
/// - Uses `reqwest`-based transport by default - [`ReqwestTransport`].
///
/// Building a client does not open any connections or perform any requests.
#[derive(Default)]
pub struct FunctionClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    transport: Option<Arc<dyn Transport + Send + Sync>>,
}

impl FunctionClientBuilder {
    /// Creates a new [`FunctionClientBuilder`]. This method is called by [`FunctionClient::builder`]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets the API key used to authenticate calls made to the network. Required.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the API gateway base URL.
    ///
    /// If not set, the builder will try to read from the `FUNCTION_BASE_URL` environment
    /// variable, defaulting to [`DEFAULT_BASE_URL`]. Most users will not need this.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets a custom transport implementation for the client.
    ///
    /// This allows for using a preconfigured HTTP client or a mock implementation for testing.
    /// If not set, a `reqwest`-based transport \([`ReqwestTransport`]\) will be used.
    pub fn transport(mut self, transport: Arc<dyn Transport + Send + Sync>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the [`FunctionClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if no API key (or an empty one) was provided,
    /// and an [`Error::Client`](variant@Error::Client) if the base URL is invalid or the
    /// default transport cannot be initialized.
    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub fn build(self) -> Result<FunctionClient> {
        let api_key = match self.api_key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(Error::MissingCredential),
        };

        let base_url_str = self.base_url.unwrap_or_else(|| {
            std::env::var("FUNCTION_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
        });
        let base_url = Url::parse(&base_url_str)
            .map_err(|e| Error::Client(format!("Invalid base URL: {}", e)))?;

        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new()?),
        };

        let auth: Arc<dyn Interceptor> = Arc::new(auth_interceptor(api_key.clone()));
        let service = ConnectClient::new(transport, base_url, vec![auth]);

        Ok(FunctionClient { api_key, service })
    }
}
