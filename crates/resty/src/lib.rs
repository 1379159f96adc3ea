//! A small harness for asserting on HTTP JSON APIs.
//!
//! A [`TestRequest`] names a method, path, payload, expected status and an
//! optional [`Expected`] body. Running it through a [`Client`] performs the
//! request and checks the response with [`resty_shape`].

pub mod client;
pub mod config;
mod cookies;
pub mod error;
pub mod location;
pub mod payload;
pub mod request;
pub mod transport;

pub use client::Client;
pub use config::ClientConfig;
pub use error::HarnessError;
pub use location::full_url;
pub use payload::{Expected, Payload};
pub use request::{Failure, TestRequest};
pub use resty_shape::{MatchResult, Mismatch, PartialMatch, match_bytes, match_partial};
pub use transport::{HyperTransport, Reply, ServiceTransport, Transport};
