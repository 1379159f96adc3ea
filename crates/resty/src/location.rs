use url::Url;

use crate::HarnessError;

/// Resolves a request path against `base`.
///
/// Absolute `http:`/`https:` paths are used untouched. Anything else is
/// appended to `base` with a `/`, and runs of slashes in the resulting path
/// collapse into one.
pub fn full_url(base: &str, path: &str) -> Result<Url, HarnessError> {
    if path.starts_with("http:") || path.starts_with("https:") {
        return parse(path);
    }

    let mut url = parse(&format!("{base}/{path}"))?;
    let collapsed = collapse_slashes(url.path());
    url.set_path(&collapsed);
    Ok(url)
}

fn parse(raw: &str) -> Result<Url, HarnessError> {
    Url::parse(raw).map_err(|source| HarnessError::Url {
        url: raw.to_owned(),
        source,
    })
}

fn collapse_slashes(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    for ch in path.chars() {
        if ch == '/' && collapsed.ends_with('/') {
            continue;
        }
        collapsed.push(ch);
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path() {
        let url = full_url("http://localhost:8080", "users").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/users");
    }

    #[test]
    fn collapses_duplicate_slashes() {
        let url = full_url("http://localhost/api/", "/v1//users").unwrap();
        assert_eq!(url.as_str(), "http://localhost/api/v1/users");
    }

    #[test]
    fn keeps_query_string() {
        let url = full_url("http://localhost", "/users?page=2&per=10").unwrap();
        assert_eq!(url.path(), "/users");
        assert_eq!(url.query(), Some("page=2&per=10"));
    }

    #[test]
    fn absolute_urls_pass_through() {
        let url = full_url("http://localhost", "https://example.com/x").unwrap();
        assert_eq!(url.as_str(), "https://example.com/x");
    }

    #[test]
    fn empty_path_hits_root() {
        let url = full_url("http://localhost", "").unwrap();
        assert_eq!(url.path(), "/");
    }

    #[test]
    fn relative_base_is_rejected() {
        assert!(matches!(
            full_url("", "users"),
            Err(HarnessError::Url { .. })
        ));
    }
}
