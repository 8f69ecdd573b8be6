//! pglens reads a live PostgreSQL database's system catalogs and reduces
//! them to a normalized, in-memory [`SchemaSnapshot`] for downstream diff
//! and migration-plan tooling. It understands pgvector columns (with their
//! declared dimension) and hnsw/ivfflat similarity indexes (with tuning
//! parameters and the distance function decoded from operator-class names).

pub mod decode;
mod error;
pub mod introspect;
mod schema;
#[cfg(test)]
mod testutil;

pub use error::PglensError;
pub use introspect::{analyze, AnalyzeOptions, DEFAULT_MIGRATIONS_TABLE, MIGRATION_API_VERSION};
pub use schema::{
    ColumnDefinition, ColumnType, ForeignKeyAction, ForeignKeyDefinition, ForeignKeyMatchType,
    IndexDefinition, IndexElement, SchemaSnapshot, TableDefinition, VectorDistanceFunction,
};
