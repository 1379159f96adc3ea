use crate::{MatchResult, Mismatch};

/// A literal fragment the raw response body must contain.
///
/// Using it as an expected value switches that assertion from structural
/// matching to a plain substring check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartialMatch(Vec<u8>);

impl PartialMatch {
    pub fn new(literal: impl Into<Vec<u8>>) -> Self {
        Self(literal.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn check(&self, actual: &[u8]) -> MatchResult {
        match_partial(actual, &self.0)
    }
}

impl From<&str> for PartialMatch {
    fn from(literal: &str) -> Self {
        Self::new(literal)
    }
}

impl From<String> for PartialMatch {
    fn from(literal: String) -> Self {
        Self::new(literal)
    }
}

impl From<&[u8]> for PartialMatch {
    fn from(literal: &[u8]) -> Self {
        Self::new(literal)
    }
}

impl From<Vec<u8>> for PartialMatch {
    fn from(literal: Vec<u8>) -> Self {
        Self(literal)
    }
}

/// Succeeds iff `literal` occurs contiguously somewhere in `actual`.
pub fn match_partial(actual: &[u8], literal: &[u8]) -> MatchResult {
    if contains(actual, literal) {
        Ok(())
    } else {
        Err(Mismatch::SubstringNotFound {
            needle: literal.to_vec(),
            haystack: actual.to_vec(),
        })
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_inner_fragment() {
        assert!(match_partial(b"hello world", b"lo wor").is_ok());
    }

    #[test]
    fn missing_fragment_fails() {
        let err = match_partial(b"hello world", b"xyz").unwrap_err();
        match err {
            Mismatch::SubstringNotFound { needle, haystack } => {
                assert_eq!(needle, b"xyz");
                assert_eq!(haystack, b"hello world");
            }
            other => panic!("expected SubstringNotFound, got {other:?}"),
        }
    }

    #[test]
    fn empty_literal_always_matches() {
        assert!(match_partial(b"", b"").is_ok());
        assert!(match_partial(b"abc", b"").is_ok());
    }

    #[test]
    fn needle_longer_than_haystack_fails() {
        assert!(match_partial(b"ab", b"abc").is_err());
    }

    #[test]
    fn does_not_decode_json() {
        assert!(match_partial(br#"{"id": 1}"#, br#""id": 1"#).is_ok());
        assert!(match_partial(br#"{"id": 1}"#, br#"{"id":1}"#).is_err());
    }

    #[test]
    fn marker_checks_its_literal() {
        let marker = PartialMatch::from("world");
        assert_eq!(marker.as_bytes(), b"world");
        assert!(marker.check(b"hello world").is_ok());
        assert!(marker.check(b"hello").is_err());
    }
}
