use std::time::Duration;

use hiveload_core::{BoxError, Checks, Workload};
use hiveload_http::{HttpClient, HttpRequest};

use crate::error::{Error, Result};

const STATUS_OK: &str = "status was 200";

#[derive(Debug, Clone)]
pub struct SearchUsersConfig {
    pub base_url: String,
    pub first_name: String,
    pub last_name: String,
    pub limit: u32,
    pub timeout: Option<Duration>,
}

impl Default for SearchUsersConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            first_name: "Олег".to_string(),
            last_name: "Шокин".to_string(),
            limit: 1,
            timeout: None,
        }
    }
}

/// Searches users by first and last name prefix.
#[derive(Debug)]
pub struct SearchUsers {
    client: HttpClient,
    request: HttpRequest,
}

impl SearchUsers {
    pub fn new(client: HttpClient, config: SearchUsersConfig) -> Result<Self> {
        if config.limit == 0 {
            return Err(Error::NonPositive("limit"));
        }

        let base_url = crate::parse_base_url(&config.base_url)?;
        let limit = config.limit.to_string();
        let request = HttpRequest::get_with_query(
            base_url.as_str(),
            "/v1/user/search",
            &[
                ("first_name", config.first_name.as_str()),
                ("last_name", config.last_name.as_str()),
                ("limit", limit.as_str()),
            ],
        )
        .map_err(|_| Error::InvalidBaseUrl(config.base_url.clone()))?
        .with_timeout(config.timeout);

        Ok(Self { client, request })
    }

    pub fn url(&self) -> &url::Url {
        &self.request.url
    }
}

impl Workload for SearchUsers {
    fn name(&self) -> &str {
        "search-users"
    }

    fn check_names(&self) -> &'static [&'static str] {
        &[STATUS_OK]
    }

    async fn iteration(&self) -> std::result::Result<Checks, BoxError> {
        let res = self.client.request(self.request.clone()).await?;

        Ok(Checks::single(STATUS_OK, res.is_ok()))
    }
}
