//! `SQLite` schema definitions for the local store.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the key/value table that stands in for browser
/// local storage.
pub const CREATE_LOCAL_STORAGE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create an index on `updated_at` for recency queries.
pub const CREATE_UPDATED_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_local_storage_updated ON local_storage(updated_at DESC)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_LOCAL_STORAGE_TABLE,
    CREATE_UPDATED_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_local_storage_table_columns() {
        assert!(CREATE_LOCAL_STORAGE_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_LOCAL_STORAGE_TABLE.contains("value TEXT NOT NULL"));
        assert!(CREATE_LOCAL_STORAGE_TABLE.contains("updated_at TEXT NOT NULL"));
    }
}
