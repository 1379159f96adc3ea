use http::header::CONTENT_TYPE;
use http::{Method, Request};
use http_body_util::Full;
use hyper::body::Bytes;
use tracing::debug;
use url::Url;

use crate::location::full_url;
use crate::transport::{HyperTransport, Reply, Transport};
use crate::{ClientConfig, HarnessError, Payload};

/// Sends requests relative to a base URL through a [`Transport`].
pub struct Client<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn full_url(&self, path: &str) -> Result<Url, HarnessError> {
        full_url(&self.config.base_url, path)
    }

    pub async fn do_request(
        &self,
        method: Method,
        path: &str,
        payload: &Payload,
    ) -> Result<Reply, HarnessError> {
        let url = self.full_url(path)?;
        let body = payload.encode(&self.config)?;

        let mut builder = Request::builder().method(method.clone()).uri(url.as_str());
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, self.config.content_type.as_str());
        }
        let request = builder.body(Full::new(body.unwrap_or_else(Bytes::new)))?;

        debug!(%method, %url, "sending request");
        self.transport.perform(request).await
    }
}

impl Client<HyperTransport> {
    /// A client that talks HTTP over TCP.
    pub fn http(config: ClientConfig) -> Self {
        Self::new(config, HyperTransport::new())
    }

    /// Starts a fresh cookie session.
    pub fn reset(&self) {
        self.transport.reset();
    }
}
