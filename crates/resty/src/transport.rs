use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use http::header::{CONTENT_LENGTH, CONTENT_TYPE, COOKIE, LOCATION};
use http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper_util::client::legacy::Client as LegacyClient;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use tower::{Service, ServiceExt};
use tracing::{debug, warn};
use url::Url;

use crate::HarnessError;
use crate::cookies::CookieJar;
use crate::error::BoxError;

/// Redirect hops followed before a request fails.
pub const MAX_REDIRECTS: usize = 10;

/// A completed exchange: status, headers and the whole response body.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub url: String,
}

impl Reply {
    pub(crate) async fn from_response<B>(
        url: String,
        response: Response<B>,
    ) -> Result<Self, HarnessError>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|err| HarnessError::Body(err.into()))?
            .to_bytes();
        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            body,
            url,
        })
    }

    /// Deserializes the body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HarnessError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Performs one HTTP exchange.
///
/// Implementations own connection handling, cookies and timeouts; the
/// harness only builds requests and inspects the [`Reply`].
pub trait Transport: Send + Sync {
    fn perform(
        &self,
        request: Request<Full<Bytes>>,
    ) -> impl Future<Output = Result<Reply, HarnessError>> + Send;
}

/// Talks to a real server over TCP, remembering cookies per host and
/// following up to [`MAX_REDIRECTS`] redirects.
pub struct HyperTransport {
    client: LegacyClient<HttpConnector, Full<Bytes>>,
    cookies: Mutex<CookieJar>,
    timeout: Option<Duration>,
}

impl HyperTransport {
    pub fn new() -> Self {
        Self {
            client: LegacyClient::builder(TokioExecutor::new()).build_http(),
            cookies: Mutex::new(CookieJar::default()),
            timeout: None,
        }
    }

    /// Bounds the whole exchange, redirects and body included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Forgets every stored cookie.
    pub fn reset(&self) {
        self.cookie_jar().clear();
    }

    fn cookie_jar(&self) -> MutexGuard<'_, CookieJar> {
        // The jar holds plain strings; a poisoned lock leaves it consistent.
        self.cookies.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn cookie_header(&self, host: &str) -> Option<HeaderValue> {
        let joined = self.cookie_jar().header(host, SystemTime::now())?;
        match HeaderValue::from_str(&joined) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%host, %err, "dropping unencodable cookies");
                None
            }
        }
    }

    fn store_cookies(&self, host: &str, headers: &HeaderMap) {
        self.cookie_jar().store(host, headers, SystemTime::now());
    }

    async fn exchange(&self, request: Request<Full<Bytes>>) -> Result<Reply, HarnessError> {
        let (parts, body) = request.into_parts();
        let mut body = body
            .collect()
            .await
            .map_err(|err| HarnessError::Body(err.into()))?
            .to_bytes();
        let mut method = parts.method;
        let mut uri = parts.uri;
        let mut headers = parts.headers;

        let mut hops = 0;
        loop {
            let host = uri.host().unwrap_or_default().to_owned();
            match self.cookie_header(&host) {
                Some(cookie) => headers.insert(COOKIE, cookie),
                None => headers.remove(COOKIE),
            };
            let mut request = Request::builder()
                .method(method.clone())
                .uri(uri.clone())
                .body(Full::new(body.clone()))?;
            *request.headers_mut() = headers.clone();

            let url = uri.to_string();
            let response = self
                .client
                .request(request)
                .await
                .map_err(|err| HarnessError::Transport(Box::new(err)))?;
            debug!(%url, status = %response.status(), "received response");
            self.store_cookies(&host, response.headers());

            let Some(location) = redirect_location(&response) else {
                return Reply::from_response(url, response).await;
            };
            if hops == MAX_REDIRECTS {
                return Err(HarnessError::TooManyRedirects(MAX_REDIRECTS));
            }
            if downgrades_to_get(response.status(), &method) {
                method = Method::GET;
                body = Bytes::new();
                headers.remove(CONTENT_TYPE);
                headers.remove(CONTENT_LENGTH);
            }
            uri = resolve_location(&url, &location)?;
            hops += 1;
            debug!(from = %url, to = %uri, hops, "following redirect");
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn perform(&self, request: Request<Full<Bytes>>) -> Result<Reply, HarnessError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(request))
                .await
                .map_err(|_| HarnessError::Timeout(limit))?,
            None => self.exchange(request).await,
        }
    }
}

/// The `Location` of a redirect response; `None` for anything else,
/// including a redirect status without a usable header.
fn redirect_location<B>(response: &Response<B>) -> Option<String> {
    if !matches!(response.status().as_u16(), 301 | 302 | 303 | 307 | 308) {
        return None;
    }
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    Some(location.to_owned())
}

/// 301, 302 and 303 turn anything but GET and HEAD into a bodiless GET;
/// 307 and 308 replay the request unchanged.
fn downgrades_to_get(status: StatusCode, method: &Method) -> bool {
    matches!(status.as_u16(), 301..=303) && *method != Method::GET && *method != Method::HEAD
}

fn resolve_location(current: &str, location: &str) -> Result<Uri, HarnessError> {
    let base = Url::parse(current).map_err(|source| HarnessError::Url {
        url: current.to_owned(),
        source,
    })?;
    let next = base.join(location).map_err(|source| HarnessError::Url {
        url: location.to_owned(),
        source,
    })?;
    Ok(next.as_str().parse::<Uri>().map_err(http::Error::from)?)
}

/// Drives an in-process [`tower::Service`], such as an axum `Router`,
/// without opening a socket.
#[derive(Debug, Clone)]
pub struct ServiceTransport<S> {
    service: S,
}

impl<S> ServiceTransport<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

impl<S, B> Transport for ServiceTransport<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<B>> + Clone + Send + Sync,
    S::Future: Send,
    S::Error: Into<BoxError>,
    B: Body<Data = Bytes> + Send,
    B::Error: Into<BoxError>,
{
    async fn perform(&self, request: Request<Full<Bytes>>) -> Result<Reply, HarnessError> {
        let url = request.uri().to_string();
        let response = self
            .service
            .clone()
            .oneshot(request)
            .await
            .map_err(|err| HarnessError::Transport(err.into()))?;
        debug!(%url, status = %response.status(), "received response");
        Reply::from_response(url, response).await
    }
}
