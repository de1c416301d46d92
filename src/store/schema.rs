//! Table definitions for the record store

/// SQLite schema
pub const SQLITE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS medicines (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    composition TEXT,
    uses TEXT,
    side_effects TEXT,
    manufacturer TEXT,
    image_url TEXT,
    excellent_review_percent REAL NOT NULL DEFAULT 0,
    average_review_percent REAL NOT NULL DEFAULT 0,
    poor_review_percent REAL NOT NULL DEFAULT 0
);
"#;

/// MySQL schema. The binary collation keeps name uniqueness case-sensitive.
pub const MYSQL_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS medicines (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL UNIQUE,
    composition TEXT,
    uses TEXT,
    side_effects TEXT,
    manufacturer TEXT,
    image_url TEXT,
    excellent_review_percent DOUBLE NOT NULL DEFAULT 0,
    average_review_percent DOUBLE NOT NULL DEFAULT 0,
    poor_review_percent DOUBLE NOT NULL DEFAULT 0
)
"#;
