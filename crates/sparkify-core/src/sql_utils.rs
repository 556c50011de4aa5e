//! SQL quoting utilities
//!
//! Engine statements are assembled from config values (paths, credentials)
//! and catalog names, so every interpolated value goes through one of these.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use sparkify_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("songs"), r#""songs""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render a value as a complete single-quoted SQL string literal.
///
/// # Examples
/// ```
/// use sparkify_core::sql_utils::quote_literal;
/// assert_eq!(quote_literal("s3://bucket/it's"), "'s3://bucket/it''s'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
