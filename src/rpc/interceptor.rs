use reqwest::header::HeaderValue;

use crate::types::HttpRequest;
use crate::{Error, Result};

/// Header carrying the API key on every call.
pub const API_KEY_HEADER: &str = "x-api-key";

/// A hook run on every outgoing request, unary or streaming, before it reaches
/// the transport.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, request: HttpRequest) -> Result<HttpRequest>;
}

impl<F> Interceptor for F
where
    F: Fn(HttpRequest) -> Result<HttpRequest> + Send + Sync,
{
    fn intercept(&self, request: HttpRequest) -> Result<HttpRequest> {
        self(request)
    }
}

/// Returns an interceptor that sets [`API_KEY_HEADER`] to `api_key`.
pub fn auth_interceptor(api_key: String) -> impl Interceptor {
    move |mut request: HttpRequest| -> Result<HttpRequest> {
        let mut value = HeaderValue::from_str(&api_key)
            .map_err(|_| Error::Client("API key is not a valid header value".into()))?;
        value.set_sensitive(true);
        request.headers.insert(API_KEY_HEADER, value);
        Ok(request)
    }
}
