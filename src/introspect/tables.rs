use sqlx::PgPool;

use crate::error::PglensError;

/// A (schema, table) pair from the table enumeration.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TableName {
    pub table_schema: String,
    pub table_name: String,
}

/// List all base tables visible to the connection, excluding the reserved
/// system schemas. Output order is whatever the catalog returns; callers
/// must not read significance into it.
pub async fn query_tables(pool: &PgPool) -> Result<Vec<TableName>, PglensError> {
    let rows = sqlx::query_as::<_, TableName>(
        r#"
        SELECT t.table_schema, t.table_name
        FROM information_schema.tables t
        WHERE t.table_type = 'BASE TABLE'
          AND t.table_schema NOT IN ('pg_catalog', 'information_schema')
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
