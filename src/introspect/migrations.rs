use sqlx::PgPool;

/// Read the version identifiers of previously applied migrations.
///
/// Best-effort: on a fresh database the backing table does not exist yet, so
/// any failure here is logged and an empty list substituted. This path must
/// never abort analysis of the rest of the schema.
pub async fn query_applied_migrations(pool: &PgPool, migrations_table: &str) -> Vec<String> {
    let sql = migrations_query(migrations_table);
    match sqlx::query_scalar::<_, String>(&sql).fetch_all(pool).await {
        Ok(versions) => versions,
        Err(err) => {
            tracing::debug!(
                table = migrations_table,
                "could not read applied migrations, assuming none: {err}"
            );
            Vec::new()
        }
    }
}

/// Build the read query with the table name as a quoted identifier;
/// embedded double quotes are doubled per SQL quoting rules.
fn migrations_query(migrations_table: &str) -> String {
    let quoted = migrations_table.replace('"', "\"\"");
    format!(r#"SELECT version FROM "{quoted}""#)
}
