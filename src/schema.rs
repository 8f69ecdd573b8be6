use std::collections::BTreeMap;

/// A point-in-time view of a database's physical schema.
///
/// Built fresh on every [`analyze`](crate::introspect::analyze) call and
/// never mutated afterwards; each call re-queries the live catalogs.
#[derive(Debug, Clone)]
pub struct SchemaSnapshot {
    /// Name of the module this snapshot was taken for, stamped by the caller.
    pub module_name: String,
    pub database_name: String,
    pub tables: Vec<TableDefinition>,
    pub migration_api_version: i32,
    /// Version identifiers of migrations already applied to this database.
    pub applied_migrations: Vec<String>,
}

/// Metadata for a single table.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    pub schema: String,
    pub name: String,
    /// Columns in catalog ordinal position. The order is authoritative and
    /// must not be re-sorted by consumers.
    pub columns: Vec<ColumnDefinition>,
    /// Unique by constraint name within the table.
    pub foreign_keys: Vec<ForeignKeyDefinition>,
    /// Unique by index name within the schema.
    pub indexes: Vec<IndexDefinition>,
}

/// Metadata for a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    pub is_nullable: bool,
    /// Raw default expression as stored in the catalog, if any.
    pub column_default: Option<String>,
    /// Declared dimension for vector-like columns, `None` otherwise.
    pub vector_dimension: Option<i32>,
}

/// Logical column types this tool understands.
///
/// Catalog type names outside this set map to [`ColumnType::Unknown`] rather
/// than failing the snapshot; whether an unknown column is acceptable is a
/// policy decision for the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Real,
    DoublePrecision,
    Numeric,
    Text,
    Varchar,
    Char,
    Uuid,
    Date,
    Time,
    Timestamp,
    Timestamptz,
    Interval,
    Bytea,
    Json,
    Jsonb,
    /// pgvector single-precision vector.
    Vector,
    /// pgvector half-precision vector.
    HalfVec,
    /// pgvector sparse vector.
    SparseVec,
    /// Bit string, indexable by pgvector's binary distance opclasses.
    Bit,
    Unknown,
}

impl ColumnType {
    /// Resolve a catalog-reported type name. Accepts both the verbose
    /// information_schema spellings and the short udt names, since the column
    /// query substitutes `udt_name` for 'USER-DEFINED' types.
    pub fn from_catalog_name(name: &str) -> Self {
        match name {
            "boolean" | "bool" => ColumnType::Boolean,
            "smallint" | "int2" => ColumnType::SmallInt,
            "integer" | "int4" => ColumnType::Integer,
            "bigint" | "int8" => ColumnType::BigInt,
            "real" | "float4" => ColumnType::Real,
            "double precision" | "float8" => ColumnType::DoublePrecision,
            "numeric" | "decimal" => ColumnType::Numeric,
            "text" => ColumnType::Text,
            "character varying" | "varchar" => ColumnType::Varchar,
            "character" | "char" | "bpchar" => ColumnType::Char,
            "uuid" => ColumnType::Uuid,
            "date" => ColumnType::Date,
            "time without time zone" | "time" => ColumnType::Time,
            "timestamp without time zone" | "timestamp" => ColumnType::Timestamp,
            "timestamp with time zone" | "timestamptz" => ColumnType::Timestamptz,
            "interval" => ColumnType::Interval,
            "bytea" => ColumnType::Bytea,
            "json" => ColumnType::Json,
            "jsonb" => ColumnType::Jsonb,
            "vector" => ColumnType::Vector,
            "halfvec" => ColumnType::HalfVec,
            "sparsevec" => ColumnType::SparseVec,
            "bit" => ColumnType::Bit,
            _ => ColumnType::Unknown,
        }
    }

    /// Whether this type carries a fixed dimension and is a valid target for
    /// a similarity-search index.
    pub fn is_vector(&self) -> bool {
        matches!(
            self,
            ColumnType::Vector | ColumnType::HalfVec | ColumnType::SparseVec | ColumnType::Bit
        )
    }
}

/// Metadata for a database index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    /// Unique within the schema.
    pub index_name: String,
    pub table_space: Option<String>,
    /// Access method name as reported by pg_am (btree, hash, gin, hnsw, ...).
    pub method: String,
    pub is_unique: bool,
    pub is_primary: bool,
    /// Key elements in precedence order.
    pub elements: Vec<IndexElement>,
    /// Partial-index predicate expression, if any.
    pub predicate: Option<String>,
    /// Tuning options from reloptions; populated only for similarity-search
    /// methods, else `None`.
    pub parameters: Option<BTreeMap<String, String>>,
    pub vector_distance_function: Option<VectorDistanceFunction>,
    /// The vector type the index's operator class targets.
    pub vector_column_type: Option<ColumnType>,
}

/// One key position of an index: either a plain column or an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexElement {
    /// Bare column name, with surrounding quote characters stripped.
    Column(String),
    /// Raw expression text as rendered by the catalog.
    Expression(String),
}

/// Metadata for a foreign-key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDefinition {
    /// Unique within the table.
    pub constraint_name: String,
    /// Local columns, positionally aligned with `ref_columns`.
    pub columns: Vec<String>,
    pub ref_schema: String,
    pub ref_table: String,
    pub ref_columns: Vec<String>,
    /// `None` when the catalog action code is not recognized.
    pub on_update: Option<ForeignKeyAction>,
    pub on_delete: Option<ForeignKeyAction>,
    pub match_type: Option<ForeignKeyMatchType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyMatchType {
    Full,
    Partial,
    Simple,
}

/// Distance metric encoded in a pgvector operator-class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorDistanceFunction {
    L2,
    InnerProduct,
    Cosine,
    L1,
    Hamming,
    Jaccard,
}
