use std::time::Duration;

use hiveload_core::{BoxError, Checks, Workload};
use hiveload_http::{HttpClient, HttpRequest};
use rand::Rng as _;

use crate::error::{Error, Result};

const STATUS_OK: &str = "status was 200";

#[derive(Debug, Clone)]
pub struct GetUserConfig {
    pub base_url: String,
    /// Ids are drawn uniformly from `1..=max_user_id`.
    pub max_user_id: i64,
    pub timeout: Option<Duration>,
}

impl Default for GetUserConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            max_user_id: 1_000_000,
            timeout: None,
        }
    }
}

/// Looks up a random user by id.
#[derive(Debug)]
pub struct GetUser {
    client: HttpClient,
    base_url: url::Url,
    max_user_id: i64,
    timeout: Option<Duration>,
}

impl GetUser {
    pub fn new(client: HttpClient, config: GetUserConfig) -> Result<Self> {
        if config.max_user_id < 1 {
            return Err(Error::NonPositive("max_user_id"));
        }

        Ok(Self {
            client,
            base_url: crate::parse_base_url(&config.base_url)?,
            max_user_id: config.max_user_id,
            timeout: config.timeout,
        })
    }

    fn request_for(&self, user_id: i64) -> hiveload_http::Result<HttpRequest> {
        Ok(
            HttpRequest::get_with_query(self.base_url.as_str(), &format!("/v1/user/{user_id}"), &[])?
                .with_timeout(self.timeout),
        )
    }
}

fn random_user_id(max: i64) -> i64 {
    rand::thread_rng().gen_range(1..=max)
}

impl Workload for GetUser {
    fn name(&self) -> &str {
        "get-user"
    }

    fn check_names(&self) -> &'static [&'static str] {
        &[STATUS_OK]
    }

    async fn iteration(&self) -> std::result::Result<Checks, BoxError> {
        let req = self.request_for(random_user_id(self.max_user_id))?;
        let res = self.client.request(req).await?;

        Ok(Checks::single(STATUS_OK, res.is_ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_stay_in_range() {
        for _ in 0..1000 {
            let id = random_user_id(5);
            assert!((1..=5).contains(&id), "id out of range: {id}");
        }
        assert_eq!(random_user_id(1), 1);
    }

    #[test]
    fn request_url_includes_user_id() {
        let workload = GetUser::new(HttpClient::default(), GetUserConfig::default())
            .unwrap_or_else(|e| panic!("valid config expected: {e}"));
        let req = workload
            .request_for(42)
            .unwrap_or_else(|e| panic!("valid request expected: {e}"));
        assert_eq!(req.url.as_str(), "http://localhost:8080/v1/user/42");
    }

    #[test]
    fn rejects_bad_config() {
        let bad_url = GetUserConfig {
            base_url: "localhost:8080".to_string(),
            ..GetUserConfig::default()
        };
        assert!(matches!(
            GetUser::new(HttpClient::default(), bad_url),
            Err(Error::InvalidBaseUrl(_))
        ));

        let bad_max = GetUserConfig {
            max_user_id: 0,
            ..GetUserConfig::default()
        };
        assert!(matches!(
            GetUser::new(HttpClient::default(), bad_max),
            Err(Error::NonPositive("max_user_id"))
        ));
    }
}
