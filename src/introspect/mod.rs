//! Schema analysis: orchestrates the per-table catalog readers into one
//! complete, immutable snapshot.

pub(crate) mod columns;
pub(crate) mod foreign_keys;
pub(crate) mod indexes;
mod migrations;
mod tables;

use sqlx::PgPool;
use tokio::task::JoinSet;

use crate::error::PglensError;
use crate::schema::{SchemaSnapshot, TableDefinition};

/// Version of the snapshot layout handed to migration tooling.
pub const MIGRATION_API_VERSION: i32 = 1;

/// Default name of the applied-migrations bookkeeping table.
pub const DEFAULT_MIGRATIONS_TABLE: &str = "schema_migrations";

/// Caller-supplied settings for one analysis run.
///
/// The module name is an explicit parameter rather than ambient process
/// state, so one process can snapshot on behalf of several modules.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub module_name: String,
    pub migrations_table: String,
    /// When non-empty, only tables with these names are resolved.
    pub table_filter: Vec<String>,
}

impl AnalyzeOptions {
    pub fn new(module_name: impl Into<String>) -> Self {
        AnalyzeOptions {
            module_name: module_name.into(),
            migrations_table: DEFAULT_MIGRATIONS_TABLE.to_string(),
            table_filter: Vec::new(),
        }
    }
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        AnalyzeOptions::new("default")
    }
}

/// Analyze the live database behind `pool` into a [`SchemaSnapshot`].
///
/// The current-database probe is the one fatal precondition; everything else
/// either succeeds, recovers locally (missing migrations table, unknown
/// catalog codes), or aborts the whole analysis (`CatalogParse`). Per-table
/// resolution of columns, indexes, and foreign keys fans out concurrently;
/// the first failure cancels outstanding work and no partial snapshot is
/// ever returned.
pub async fn analyze(
    pool: &PgPool,
    options: &AnalyzeOptions,
) -> Result<SchemaSnapshot, PglensError> {
    let database_name = sqlx::query_scalar::<_, String>("SELECT current_database()")
        .fetch_one(pool)
        .await
        .map_err(PglensError::Connection)?;

    let applied_migrations =
        migrations::query_applied_migrations(pool, &options.migrations_table).await;

    let mut table_names = tables::query_tables(pool).await?;
    if !options.table_filter.is_empty() {
        table_names.retain(|t| options.table_filter.contains(&t.table_name));
    }
    tracing::debug!("resolving {} tables in {database_name}", table_names.len());

    let mut tasks: JoinSet<Result<(usize, TableDefinition), PglensError>> = JoinSet::new();
    for (position, table) in table_names.into_iter().enumerate() {
        let pool = pool.clone();
        tasks.spawn(async move {
            let table = resolve_table(&pool, &table.table_schema, &table.table_name).await?;
            Ok((position, table))
        });
    }

    // Reassemble in enumeration order; a failed task aborts the rest when
    // the JoinSet is dropped.
    let mut resolved = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        resolved.push(joined??);
    }
    resolved.sort_by_key(|(position, _)| *position);

    Ok(SchemaSnapshot {
        module_name: options.module_name.clone(),
        database_name,
        tables: resolved.into_iter().map(|(_, table)| table).collect(),
        migration_api_version: MIGRATION_API_VERSION,
        applied_migrations,
    })
}

/// Resolve one table's columns, indexes, and foreign keys concurrently.
async fn resolve_table(
    pool: &PgPool,
    schema: &str,
    name: &str,
) -> Result<TableDefinition, PglensError> {
    let (columns, indexes, foreign_keys) = tokio::try_join!(
        columns::query_columns(pool, schema, name),
        indexes::query_indexes(pool, schema, name),
        foreign_keys::query_foreign_keys(pool, schema, name),
    )?;

    Ok(TableDefinition {
        schema: schema.to_string(),
        name: name.to_string(),
        columns,
        foreign_keys,
        indexes,
    })
}
