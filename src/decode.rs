//! Pure helpers for normalizing catalog-encoded text: quoted identifiers,
//! reloption strings, single-character constraint codes, and pgvector
//! operator-class names.

use std::collections::BTreeMap;

use crate::schema::{ColumnType, ForeignKeyAction, ForeignKeyMatchType, VectorDistanceFunction};

/// Strip one matching pair of surrounding double quotes from an identifier.
///
/// `pg_get_indexdef` renders plain column names quoted when they need it;
/// a one-sided quote is left untouched. Expressions containing embedded
/// quote characters are not handled -- known limitation.
pub fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Split raw reloption strings (`key=value`) into a map. Entries that do not
/// contain exactly one `=` are silently skipped, matching the historical
/// behavior of this parser.
pub fn parse_storage_options(raw: &[String]) -> BTreeMap<String, String> {
    let mut options = BTreeMap::new();
    for opt in raw {
        let parts: Vec<&str> = opt.split('=').collect();
        if let [key, value] = parts[..] {
            options.insert(key.to_string(), value.to_string());
        }
    }
    options
}

/// Decode a pg_constraint action code (confupdtype/confdeltype). Unknown
/// codes decode to `None`; Postgres may grow codes we do not know yet.
pub fn decode_fk_action(code: &str) -> Option<ForeignKeyAction> {
    match code {
        "a" => Some(ForeignKeyAction::NoAction),
        "r" => Some(ForeignKeyAction::Restrict),
        "c" => Some(ForeignKeyAction::Cascade),
        "n" => Some(ForeignKeyAction::SetNull),
        "d" => Some(ForeignKeyAction::SetDefault),
        _ => None,
    }
}

/// Decode a pg_constraint match-type code (confmatchtype).
pub fn decode_fk_match(code: &str) -> Option<ForeignKeyMatchType> {
    match code {
        "f" => Some(ForeignKeyMatchType::Full),
        "p" => Some(ForeignKeyMatchType::Partial),
        "s" => Some(ForeignKeyMatchType::Simple),
        _ => None,
    }
}

/// Decode the information_schema YES/NO token.
pub fn decode_yes_no(token: &str) -> Option<bool> {
    match token {
        "YES" => Some(true),
        "NO" => Some(false),
        _ => None,
    }
}

/// Parse a pgvector operator-class name of the form `<basetype>_<metric>_ops`
/// into the targeted column type and distance function.
///
/// Returns `None` when the name does not match the pattern or either
/// component is unrecognized; the caller leaves both fields unset.
pub fn parse_operator_class(name: &str) -> Option<(ColumnType, VectorDistanceFunction)> {
    let stem = name.strip_suffix("_ops")?;
    let (base, metric) = stem.split_once('_')?;

    let column_type = ColumnType::from_catalog_name(base);
    if !column_type.is_vector() {
        return None;
    }

    let distance = match metric {
        "l2" => VectorDistanceFunction::L2,
        "ip" => VectorDistanceFunction::InnerProduct,
        "cosine" => VectorDistanceFunction::Cosine,
        "l1" => VectorDistanceFunction::L1,
        "hamming" => VectorDistanceFunction::Hamming,
        "jaccard" => VectorDistanceFunction::Jaccard,
        _ => return None,
    };

    Some((column_type, distance))
}
