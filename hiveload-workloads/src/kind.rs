#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum WorkloadKind {
    /// `GET /v1/user/{id}` with a random id.
    GetUser,
    /// `GET /v1/user/search` with fixed name prefixes.
    SearchUsers,
    /// `INSERT` of random numbers straight into Postgres.
    WriteSql,
}
