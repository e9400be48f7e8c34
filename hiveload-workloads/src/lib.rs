//! Workloads exercising the hive backend: user lookup and search over HTTP, and raw
//! write load against its Postgres database.

mod error;
mod get_user;
mod kind;
mod search_users;
mod write_sql;

pub use error::{Error, Result};
pub use get_user::{GetUser, GetUserConfig};
pub use kind::WorkloadKind;
pub use search_users::{SearchUsers, SearchUsersConfig};
pub use write_sql::{WriteSql, WriteSqlConfig};

pub(crate) fn parse_base_url(raw: &str) -> Result<url::Url> {
    let url = url::Url::parse(raw).map_err(|_| Error::InvalidBaseUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(Error::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}
