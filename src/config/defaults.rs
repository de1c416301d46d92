//! Default values for configuration

use std::path::PathBuf;

/// Default HTTP listen port
pub fn default_port() -> u16 {
    3000
}

/// Default HTTP bind address
pub fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

/// Default MySQL port
pub fn default_db_port() -> u16 {
    3306
}

/// Default MySQL user
pub fn default_db_user() -> String {
    "root".to_string()
}

/// Default database name (SQLite file path when no host is configured)
pub fn default_db_name() -> String {
    "medvault.db".to_string()
}

/// Default pool size
pub fn default_db_max_connections() -> u32 {
    5
}

/// Default dataset location, relative to the working directory
pub fn default_data_path() -> PathBuf {
    PathBuf::from("medvault-data/medicines.json")
}

/// Run the bulk loader when the server starts
pub fn default_load_on_start() -> bool {
    true
}

/// Default base URL the lookup client talks to
pub fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

/// Maximum accepted request body size in bytes
pub fn default_max_body_bytes() -> usize {
    1024 * 1024
}
