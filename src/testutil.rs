//! Shared fixtures for the orders/customers test schema.

use crate::introspect::columns::ColumnRow;
use crate::introspect::foreign_keys::ForeignKeyRow;
use crate::introspect::indexes::IndexRow;

/// Raw column rows for `orders(id, customer_id, embedding vector(768))`,
/// in ordinal position.
pub fn orders_column_rows() -> Vec<ColumnRow> {
    vec![
        ColumnRow {
            column_name: "id".to_string(),
            column_default: Some("nextval('orders_id_seq'::regclass)".to_string()),
            is_nullable: "NO".to_string(),
            type_name: "integer".to_string(),
            type_modifier: None,
        },
        ColumnRow {
            column_name: "customer_id".to_string(),
            column_default: None,
            is_nullable: "NO".to_string(),
            type_name: "integer".to_string(),
            type_modifier: None,
        },
        ColumnRow {
            column_name: "embedding".to_string(),
            column_default: None,
            is_nullable: "YES".to_string(),
            type_name: "vector".to_string(),
            type_modifier: Some(768),
        },
    ]
}

/// Raw constraint row for `orders.customer_id -> customers.id`
/// with ON DELETE CASCADE.
pub fn fk_row() -> ForeignKeyRow {
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

/// Raw index row for an hnsw index on `orders.embedding` with
/// `vector_cosine_ops` and the option `m=16`.
pub fn orders_hnsw_index_row() -> IndexRow {
    IndexRow {
        index_name: "orders_embedding_idx".to_string(),
        table_space: None,
        method: "hnsw".to_string(),
        is_unique: false,
        is_primary: false,
        predicate: None,
        storage_options: Some(vec!["m=16".to_string()]),
        key_definitions: Some(vec!["embedding".to_string()]),
        key_is_column: Some(vec![true]),
        operator_classes: vec!["vector_cosine_ops".to_string()],
    }
}
