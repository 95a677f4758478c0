/// Quote an identifier when its case must be preserved.
///
/// Case-insensitive identifiers pass through unchanged; CQL folds them to
/// lower case on its own.
pub fn escape_identifier(name: &str, case_sensitive: bool) -> String {
    if !case_sensitive {
        return name.to_string();
    }
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `keyspace.table`, each part escaped independently.
pub fn qualified_name(keyspace: Option<&str>, table: &str, case_sensitive: bool) -> String {
    match keyspace {
        Some(ks) => format!(
            "{}.{}",
            escape_identifier(ks, case_sensitive),
            escape_identifier(table, case_sensitive)
        ),
        None => escape_identifier(table, case_sensitive),
    }
}
