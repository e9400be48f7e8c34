use std::time::Duration;

use bytes::Bytes;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: http::Method,
    pub url: url::Url,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn get(url: url::Url) -> Self {
        Self {
            method: http::Method::GET,
            url,
            timeout: None,
        }
    }

    /// `path` appended to any path already on `base`, with `query` form-encoded into
    /// the query string.
    pub fn get_with_query(base: &str, path: &str, query: &[(&str, &str)]) -> Result<Self> {
        let invalid = || Error::InvalidUrl(format!("{base}{path}"));

        let mut url = url::Url::parse(base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()));

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(Self::get(url))
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_form_encoded() {
        let req = HttpRequest::get_with_query(
            "http://localhost:8080",
            "/v1/user/search",
            &[("first_name", "Олег"), ("last_name", "Шокин"), ("limit", "1")],
        )
        .unwrap_or_else(|e| panic!("valid url expected: {e}"));

        assert_eq!(req.url.path(), "/v1/user/search");
        let pairs: Vec<(String, String)> = req
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("first_name".to_string(), "Олег".to_string()));
        assert_eq!(pairs[2], ("limit".to_string(), "1".to_string()));
        assert!(req.url.as_str().contains("first_name=%D0%9E"));
    }

    #[test]
    fn base_path_prefix_is_kept() {
        for base in ["http://localhost:8080/api", "http://localhost:8080/api/"] {
            let req = HttpRequest::get_with_query(base, "/v1/user/42", &[])
                .unwrap_or_else(|e| panic!("valid url expected: {e}"));
            assert_eq!(req.url.as_str(), "http://localhost:8080/api/v1/user/42");
        }

        let req = HttpRequest::get_with_query("http://localhost:8080", "/v1/user/42", &[])
            .unwrap_or_else(|e| panic!("valid url expected: {e}"));
        assert_eq!(req.url.as_str(), "http://localhost:8080/v1/user/42");
    }

    #[test]
    fn invalid_base_is_rejected() {
        let err = HttpRequest::get_with_query("not a url", "/v1/user/1", &[]);
        assert!(matches!(err, Err(Error::InvalidUrl(_))));
    }
}
