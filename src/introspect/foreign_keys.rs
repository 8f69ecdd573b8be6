use sqlx::PgPool;

use crate::decode::{decode_fk_action, decode_fk_match};
use crate::error::PglensError;
use crate::schema::ForeignKeyDefinition;

/// Query foreign-key constraints for one table.
///
/// Column lists are resolved from the stored attribute-number arrays
/// (conkey/confkey) in order, so multi-column keys stay positionally
/// aligned between the local and referenced side.
pub async fn query_foreign_keys(
    pool: &PgPool,
    schema: &str,
    table_name: &str,
) -> Result<Vec<ForeignKeyDefinition>, PglensError> {
    let rows = sqlx::query_as::<_, ForeignKeyRow>(
        r#"
        SELECT con.conname AS constraint_name,
               con.confupdtype::text AS on_update,
               con.confdeltype::text AS on_delete,
               con.confmatchtype::text AS match_type,
               rn.nspname AS ref_schema,
               rt.relname AS ref_table,
               ARRAY(SELECT a.attname
                     FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord)
                     JOIN pg_attribute a
                         ON a.attrelid = con.conrelid AND a.attnum = k.attnum
                     ORDER BY k.ord) AS columns,
               ARRAY(SELECT a.attname
                     FROM unnest(con.confkey) WITH ORDINALITY AS k(attnum, ord)
                     JOIN pg_attribute a
                         ON a.attrelid = con.confrelid AND a.attnum = k.attnum
                     ORDER BY k.ord) AS ref_columns
        FROM pg_constraint con
        JOIN pg_class t ON t.oid = con.conrelid
        JOIN pg_namespace n ON n.oid = t.relnamespace
        JOIN pg_class rt ON rt.oid = con.confrelid
        JOIN pg_namespace rn ON rn.oid = rt.relnamespace
        WHERE n.nspname = $1 AND t.relname = $2 AND con.contype = 'f'
        ORDER BY con.conname
        "#,
    )
    .bind(schema)
    .bind(table_name)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| build_foreign_key(table_name, row))
        .collect()
}

/// Convert one raw pg_constraint row into a ForeignKeyDefinition.
pub(crate) fn build_foreign_key(
    table_name: &str,
    row: ForeignKeyRow,
) -> Result<ForeignKeyDefinition, PglensError> {
    if row.columns.len() != row.ref_columns.len() {
        return Err(PglensError::catalog_parse(
            table_name,
            format!(
                "constraint {} has {} local columns but {} referenced columns",
                row.constraint_name,
                row.columns.len(),
                row.ref_columns.len()
            ),
        ));
    }

    Ok(ForeignKeyDefinition {
        constraint_name: row.constraint_name,
        columns: row.columns,
        ref_schema: row.ref_schema,
        ref_table: row.ref_table,
        ref_columns: row.ref_columns,
        on_update: decode_fk_action(&row.on_update),
        on_delete: decode_fk_action(&row.on_delete),
        match_type: decode_fk_match(&row.match_type),
    })
}

#[derive(sqlx::FromRow)]
pub(crate) struct ForeignKeyRow {
    pub(crate) constraint_name: String,
    pub(crate) on_update: String,
    pub(crate) on_delete: String,
    pub(crate) match_type: String,
    pub(crate) ref_schema: String,
    pub(crate) ref_table: String,
    pub(crate) columns: Vec<String>,
    pub(crate) ref_columns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ForeignKeyAction, ForeignKeyMatchType};

    fn row() -> ForeignKeyRow {
        ForeignKeyRow {
            constraint_name: "orders_customer_id_fkey".to_string(),
            on_update: "a".to_string(),
            on_delete: "c".to_string(),
            match_type: "s".to_string(),
            ref_schema: "public".to_string(),
            ref_table: "customers".to_string(),
            columns: vec!["customer_id".to_string()],
            ref_columns: vec!["id".to_string()],
        }
    }

    #[test]
    fn test_build_foreign_key() {
        let fk = build_foreign_key("orders", row()).unwrap();
        assert_eq!(fk.constraint_name, "orders_customer_id_fkey");
        assert_eq!(fk.columns, vec!["customer_id"]);
        assert_eq!(fk.ref_schema, "public");
        assert_eq!(fk.ref_table, "customers");
        assert_eq!(fk.ref_columns, vec!["id"]);
        assert_eq!(fk.on_update, Some(ForeignKeyAction::NoAction));
        assert_eq!(fk.on_delete, Some(ForeignKeyAction::Cascade));
        assert_eq!(fk.match_type, Some(ForeignKeyMatchType::Simple));
    }

    #[test]
    fn test_multi_column_keys_stay_aligned() {
        let fk = build_foreign_key(
            "order_lines",
            ForeignKeyRow {
                columns: vec!["order_id".to_string(), "line_no".to_string()],
                ref_columns: vec!["id".to_string(), "seq".to_string()],
                ..row()
            },
        )
        .unwrap();
        assert_eq!(fk.columns.len(), fk.ref_columns.len());
        assert_eq!(fk.columns[1], "line_no");
        assert_eq!(fk.ref_columns[1], "seq");
    }

    #[test]
    fn test_unrecognized_codes_decode_to_none() {
        let fk = build_foreign_key(
            "orders",
            ForeignKeyRow {
                on_update: "z".to_string(),
                on_delete: "z".to_string(),
                match_type: "z".to_string(),
                ..row()
            },
        )
        .unwrap();
        assert_eq!(fk.on_update, None);
        assert_eq!(fk.on_delete, None);
        assert_eq!(fk.match_type, None);
    }

    #[test]
    fn test_column_count_mismatch_is_a_parse_error() {
        let err = build_foreign_key(
            "orders",
            ForeignKeyRow {
                ref_columns: vec!["id".to_string(), "extra".to_string()],
                ..row()
            },
        )
        .unwrap_err();
        assert!(matches!(err, PglensError::CatalogParse { .. }));
    }
}
