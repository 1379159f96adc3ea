use std::fmt;

use http::{Method, StatusCode};
use resty_shape::{Mismatch, match_bytes};
use tracing::info;

use crate::payload::{Expected, Payload};
use crate::transport::{Reply, Transport};
use crate::{Client, HarnessError};

/// One request and what its response must look like.
#[derive(Debug, Clone)]
pub struct TestRequest {
    pub method: Method,
    pub path: String,
    pub payload: Payload,
    pub expected_status: StatusCode,
    /// `None` skips the body comparison.
    pub expected: Option<Expected>,
}

/// Why a [`TestRequest`] failed; every message starts with `METHOD path`.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error("{request}: error: {source}")]
    Request {
        request: String,
        source: HarnessError,
    },
    #[error("{request}: wanted {wanted}, got {got}: {body}")]
    Status {
        request: String,
        wanted: StatusCode,
        got: StatusCode,
        body: String,
    },
    #[error("{request}: {source}")]
    Expected {
        request: String,
        source: HarnessError,
    },
    #[error("{request}: {source}\nresponse: {body}")]
    Mismatch {
        request: String,
        source: Mismatch,
        body: String,
    },
}

impl TestRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: Payload::Empty,
            expected_status: StatusCode::OK,
            expected: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.expected_status = status;
        self
    }

    pub fn with_expected(mut self, expected: impl Into<Expected>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Performs the request and checks status, then body.
    pub async fn run<T: Transport>(&self, client: &Client<T>) -> Result<Reply, Failure> {
        let reply = client
            .do_request(self.method.clone(), &self.path, &self.payload)
            .await
            .map_err(|source| Failure::Request {
                request: self.to_string(),
                source,
            })?;

        if client.config().log_requests {
            info!("{self}: {}", String::from_utf8_lossy(&reply.body));
        }

        if reply.status != self.expected_status {
            return Err(Failure::Status {
                request: self.to_string(),
                wanted: self.expected_status,
                got: reply.status,
                body: String::from_utf8_lossy(&reply.body).into_owned(),
            });
        }

        if let Some(expected) = &self.expected {
            self.compare(&reply, expected)?;
        }
        Ok(reply)
    }

    /// Like [`run`](Self::run), but panics with the failure message.
    pub async fn assert<T: Transport>(&self, client: &Client<T>) -> Reply {
        match self.run(client).await {
            Ok(reply) => reply,
            Err(failure) => panic!("{failure}"),
        }
    }

    fn compare(&self, reply: &Reply, expected: &Expected) -> Result<(), Failure> {
        let outcome = match expected {
            Expected::Partial(literal) => literal.check(&reply.body),
            other => {
                let expected = other.to_bytes().map_err(|source| Failure::Expected {
                    request: self.to_string(),
                    source,
                })?;
                match_bytes(&reply.body, &expected)
            }
        };
        outcome.map_err(|source| Failure::Mismatch {
            request: self.to_string(),
            source,
            body: String::from_utf8_lossy(&reply.body).into_owned(),
        })
    }
}

impl fmt::Display for TestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
