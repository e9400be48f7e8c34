use bytes::Bytes;
use http_body_util::{BodyExt as _, Empty};
use hyper::Request;
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

use super::{Error, HttpRequest, HttpResponse, Result};

/// Pooled HTTP/1.1 client shared by all virtual users.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
}

impl Default for HttpClient {
    fn default() -> Self {
        // The OS-level TCP connect timeout can be tens of seconds; keep failed
        // connects against a down service from stalling short runs.
        Self::new(Some(Duration::from_secs(3)))
    }
}

impl HttpClient {
    #[must_use]
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        let mut http_connector = HttpConnector::new();
        http_connector.enforce_http(false);
        http_connector.set_connect_timeout(connect_timeout);

        let https_connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(http_connector);

        let inner = Client::builder(TokioExecutor::new()).build(https_connector);

        Self { inner }
    }

    pub async fn request(&self, req: HttpRequest) -> Result<HttpResponse> {
        if !matches!(req.url.scheme(), "http" | "https") {
            return Err(Error::UnsupportedScheme(req.url.to_string()));
        }

        let uri: hyper::Uri = req
            .url
            .as_str()
            .parse()
            .map_err(|_| Error::InvalidUrl(req.url.to_string()))?;

        let request: Request<Empty<Bytes>> = Request::builder()
            .method(req.method)
            .uri(uri)
            .body(Empty::new())?;

        let res: hyper::Response<Incoming> = match req.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.inner.request(request))
                .await
                .map_err(|_| Error::Timeout(timeout))??,
            None => self.inner.request(request).await?,
        };

        let status = res.status().as_u16();
        let body = res.into_body().collect().await?.to_bytes();

        Ok(HttpResponse { status, body })
    }

    pub async fn get(&self, url: url::Url) -> Result<HttpResponse> {
        self.request(HttpRequest::get(url)).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn unreachable_host_fails_fast_with_connect_timeout() {
        let client = HttpClient::new(Some(Duration::from_millis(200)));
        let url = url::Url::parse("http://192.0.2.1:81/").unwrap();

        let started = Instant::now();
        let err = client.get(url).await.unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, Error::Request(_)), "unexpected error: {err}");
        assert!(
            elapsed < Duration::from_secs(2),
            "expected fast failure, elapsed={elapsed:?}"
        );
    }

    #[tokio::test]
    async fn non_http_scheme_is_rejected() {
        let client = HttpClient::default();
        let url = url::Url::parse("ftp://example.com/").unwrap();
        let err = client.get(url).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme(_)));
    }
}
