use sqlx::PgPool;

use crate::decode::decode_yes_no;
use crate::error::PglensError;
use crate::schema::{ColumnDefinition, ColumnType};

/// Query column metadata for one table, in catalog ordinal position.
///
/// The query pre-sorts by ordinal position; the returned order is
/// authoritative and preserved as-is.
pub async fn query_columns(
    pool: &PgPool,
    schema: &str,
    table_name: &str,
) -> Result<Vec<ColumnDefinition>, PglensError> {
    let rows = sqlx::query_as::<_, ColumnRow>(
        r#"
        SELECT c.column_name, c.column_default, c.is_nullable,
               CASE WHEN c.data_type = 'USER-DEFINED' THEN c.udt_name
                    ELSE c.data_type END AS type_name,
               CASE WHEN c.udt_name IN ('vector', 'halfvec', 'sparsevec', 'bit')
                    THEN a.atttypmod END AS type_modifier
        FROM information_schema.columns c
        JOIN pg_namespace n ON n.nspname = c.table_schema
        JOIN pg_class t ON t.relnamespace = n.oid AND t.relname = c.table_name
        JOIN pg_attribute a ON a.attrelid = t.oid AND a.attname = c.column_name
        WHERE c.table_schema = $1 AND c.table_name = $2
        ORDER BY c.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table_name)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| build_column(table_name, row))
        .collect()
}

/// Convert one raw catalog row into a ColumnDefinition.
pub(crate) fn build_column(
    table_name: &str,
    row: ColumnRow,
) -> Result<ColumnDefinition, PglensError> {
    let is_nullable = decode_yes_no(&row.is_nullable).ok_or_else(|| {
        PglensError::catalog_parse(
            table_name,
            format!(
                "unexpected is_nullable token {:?} for column {}",
                row.is_nullable, row.column_name
            ),
        )
    })?;

    let column_type = ColumnType::from_catalog_name(&row.type_name);
    let vector_dimension = if column_type.is_vector() {
        row.type_modifier.filter(|m| *m > 0)
    } else {
        None
    };

    Ok(ColumnDefinition {
        name: row.column_name,
        column_type,
        is_nullable,
        column_default: row.column_default,
        vector_dimension,
    })
}

#[derive(sqlx::FromRow)]
pub(crate) struct ColumnRow {
    pub(crate) column_name: String,
    pub(crate) column_default: Option<String>,
    pub(crate) is_nullable: String,
    pub(crate) type_name: String,
    pub(crate) type_modifier: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, type_name: &str) -> ColumnRow {
        ColumnRow {
            column_name: name.to_string(),
            column_default: None,
            is_nullable: "NO".to_string(),
            type_name: type_name.to_string(),
            type_modifier: None,
        }
    }

    #[test]
    fn test_build_plain_column() {
        let col = build_column(
            "orders",
            ColumnRow {
                column_default: Some("nextval('orders_id_seq'::regclass)".to_string()),
                ..row("id", "integer")
            },
        )
        .unwrap();
        assert_eq!(col.name, "id");
        assert_eq!(col.column_type, ColumnType::Integer);
        assert!(!col.is_nullable);
        assert!(col.column_default.is_some());
        assert_eq!(col.vector_dimension, None);
    }

    #[test]
    fn test_build_vector_column_with_dimension() {
        let col = build_column(
            "orders",
            ColumnRow {
                type_modifier: Some(768),
                ..row("embedding", "vector")
            },
        )
        .unwrap();
        assert_eq!(col.column_type, ColumnType::Vector);
        assert_eq!(col.vector_dimension, Some(768));
    }

    #[test]
    fn test_undimensioned_vector_has_no_dimension() {
        // atttypmod is -1 for vector columns declared without a dimension
        let col = build_column(
            "orders",
            ColumnRow {
                type_modifier: Some(-1),
                ..row("embedding", "vector")
            },
        )
        .unwrap();
        assert_eq!(col.vector_dimension, None);
    }

    #[test]
    fn test_modifier_ignored_for_non_vector_types() {
        let col = build_column(
            "orders",
            ColumnRow {
                type_modifier: Some(104),
                ..row("note", "character varying")
            },
        )
        .unwrap();
        assert_eq!(col.vector_dimension, None);
    }

    #[test]
    fn test_unknown_type_falls_back() {
        let col = build_column("orders", row("doc", "tsvector")).unwrap();
        assert_eq!(col.column_type, ColumnType::Unknown);
    }

    #[test]
    fn test_bad_nullable_token_is_parse_error() {
        let err = build_column(
            "orders",
            ColumnRow {
                is_nullable: "MAYBE".to_string(),
                ..row("id", "integer")
            },
        )
        .unwrap_err();
        assert!(matches!(err, PglensError::CatalogParse { .. }));
    }
}
