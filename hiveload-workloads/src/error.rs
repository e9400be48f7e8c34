pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid base url (expected http:// or https://): `{0}`")]
    InvalidBaseUrl(String),

    #[error("invalid database url: {0}")]
    InvalidDatabaseUrl(#[source] sqlx::Error),

    #[error("`{0}` must be a positive integer")]
    NonPositive(&'static str),
}
