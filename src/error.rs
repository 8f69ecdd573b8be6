use thiserror::Error;

#[derive(Error, Debug)]
pub enum PglensError {
    /// The initial current-database probe failed; nothing else can proceed.
    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A catalog query returned rows violating the shape this tool assumes.
    /// This is a broken invariant, not a data edge case, so analysis aborts
    /// rather than producing a silently-incomplete snapshot.
    #[error("Catalog parse error for table {table}: {detail}")]
    CatalogParse { table: String, detail: String },

    #[error("Introspection task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl PglensError {
    pub(crate) fn catalog_parse(table: &str, detail: impl Into<String>) -> Self {
        PglensError::CatalogParse {
            table: table.to_string(),
            detail: detail.into(),
        }
    }
}
