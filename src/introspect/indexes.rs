use sqlx::PgPool;

use crate::decode::{parse_operator_class, parse_storage_options, strip_quotes};
use crate::error::PglensError;
use crate::schema::{IndexDefinition, IndexElement};

/// pgvector's approximate-nearest-neighbor access methods. Only these carry
/// tuning parameters and a distance function in the snapshot.
const SIMILARITY_METHODS: [&str; 2] = ["hnsw", "ivfflat"];

/// Query index metadata for one table.
///
/// Each key position is rendered by `pg_get_indexdef` so expressions come
/// back as text; the parallel `key_is_column` array tells plain columns
/// (indkey entry nonzero) apart from expressions (indkey entry zero).
pub async fn query_indexes(
    pool: &PgPool,
    schema: &str,
    table_name: &str,
) -> Result<Vec<IndexDefinition>, PglensError> {
    let rows = sqlx::query_as::<_, IndexRow>(
        r#"
        SELECT i.relname AS index_name,
               ts.spcname AS table_space,
               am.amname AS method,
               ix.indisunique AS is_unique,
               ix.indisprimary AS is_primary,
               pg_get_expr(ix.indpred, ix.indrelid) AS predicate,
               i.reloptions AS storage_options,
               ARRAY(SELECT pg_get_indexdef(ix.indexrelid, k, TRUE)
                     FROM generate_series(1, ix.indnkeyatts) AS k) AS key_definitions,
               ARRAY(SELECT ix.indkey[k - 1] <> 0
                     FROM generate_series(1, ix.indnkeyatts) AS k) AS key_is_column,
               ARRAY(SELECT oc.opcname
                     FROM unnest(ix.indclass) WITH ORDINALITY AS u(opc, ord)
                     JOIN pg_opclass oc ON oc.oid = u.opc
                     ORDER BY u.ord) AS operator_classes
        FROM pg_index ix
        JOIN pg_class i ON i.oid = ix.indexrelid
        JOIN pg_class t ON t.oid = ix.indrelid
        JOIN pg_namespace n ON n.oid = t.relnamespace
        JOIN pg_am am ON am.oid = i.relam
        LEFT JOIN pg_tablespace ts ON ts.oid = i.reltablespace
        WHERE n.nspname = $1 AND t.relname = $2
        ORDER BY i.relname
        "#,
    )
    .bind(schema)
    .bind(table_name)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| build_index(table_name, row))
        .collect()
}

/// Convert one raw catalog row into an IndexDefinition.
///
/// Mismatched or absent key arrays mean the query contract itself was
/// violated and abort the analysis.
pub(crate) fn build_index(
    table_name: &str,
    row: IndexRow,
) -> Result<IndexDefinition, PglensError> {
    let (Some(definitions), Some(is_column)) = (row.key_definitions, row.key_is_column) else {
        return Err(PglensError::catalog_parse(
            table_name,
            format!("index {} is missing key definition arrays", row.index_name),
        ));
    };
    if definitions.len() != is_column.len() {
        return Err(PglensError::catalog_parse(
            table_name,
            format!(
                "index {} has {} key definitions but {} column flags",
                row.index_name,
                definitions.len(),
                is_column.len()
            ),
        ));
    }

    let elements = definitions
        .into_iter()
        .zip(is_column)
        .map(|(definition, is_column)| {
            if is_column {
                IndexElement::Column(strip_quotes(&definition).to_string())
            } else {
                IndexElement::Expression(definition)
            }
        })
        .collect();

    let mut parameters = None;
    let mut vector_distance_function = None;
    let mut vector_column_type = None;
    if SIMILARITY_METHODS.contains(&row.method.as_str()) {
        parameters = Some(parse_storage_options(
            row.storage_options.as_deref().unwrap_or_default(),
        ));
        if let Some((column_type, distance)) = row
            .operator_classes
            .first()
            .and_then(|oc| parse_operator_class(oc))
        {
            vector_column_type = Some(column_type);
            vector_distance_function = Some(distance);
        } else {
            tracing::debug!(
                index = %row.index_name,
                "could not resolve vector operator class {:?}",
                row.operator_classes.first()
            );
        }
    }

    Ok(IndexDefinition {
        index_name: row.index_name,
        table_space: row.table_space,
        method: row.method,
        is_unique: row.is_unique,
        is_primary: row.is_primary,
        elements,
        predicate: row.predicate,
        parameters,
        vector_distance_function,
        vector_column_type,
    })
}

#[derive(sqlx::FromRow)]
pub(crate) struct IndexRow {
    pub(crate) index_name: String,
    pub(crate) table_space: Option<String>,
    pub(crate) method: String,
    pub(crate) is_unique: bool,
    pub(crate) is_primary: bool,
    pub(crate) predicate: Option<String>,
    pub(crate) storage_options: Option<Vec<String>>,
    pub(crate) key_definitions: Option<Vec<String>>,
    pub(crate) key_is_column: Option<Vec<bool>>,
    pub(crate) operator_classes: Vec<String>,
}
