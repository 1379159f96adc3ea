use serde::{Deserialize, Serialize};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Settings a [`Client`](crate::Client) is constructed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for every relative request path.
    pub base_url: String,
    /// Sent as `Content-Type` whenever a request carries a body.
    pub content_type: String,
    /// Log every response body at `info` level.
    pub log_requests: bool,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_log_requests(mut self, log_requests: bool) -> Self {
        self.log_requests = log_requests;
        self
    }

    /// Whether structured payloads may be encoded for this content type.
    pub(crate) fn is_json(&self) -> bool {
        self.content_type
            .split(';')
            .next()
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            content_type: JSON_CONTENT_TYPE.to_string(),
            log_requests: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_json_without_logging() {
        let config = ClientConfig::new("http://127.0.0.1:3000");
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.content_type, JSON_CONTENT_TYPE);
        assert!(!config.log_requests);
        assert!(config.is_json());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "http://api", "log_requests": true}"#).unwrap();
        assert_eq!(config.base_url, "http://api");
        assert_eq!(config.content_type, JSON_CONTENT_TYPE);
        assert!(config.log_requests);
    }

    #[test]
    fn json_with_parameters_is_json() {
        let config = ClientConfig::default().with_content_type("application/json; charset=utf-8");
        assert!(config.is_json());
    }

    #[test]
    fn text_is_not_json() {
        let config = ClientConfig::default().with_content_type("text/plain");
        assert!(!config.is_json());
    }
}
