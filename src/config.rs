use std::env;
use std::path::PathBuf;

use crate::export::DEFAULT_SLOT_PATH;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: "0.0.0.0:3000")
    pub bind_addr: String,

    /// SQLite database file (default: "students.db")
    pub db_path: PathBuf,

    /// Single-slot JSON export file (default: "students.json")
    pub export_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            db_path: PathBuf::from("students.db"),
            export_path: PathBuf::from(DEFAULT_SLOT_PATH),
        }
    }
}

impl ServerConfig {
    /// Read overrides from `STUDENT_REGISTRY_ADDR`, `STUDENT_REGISTRY_DB`,
    /// and `STUDENT_REGISTRY_EXPORT`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = env::var("STUDENT_REGISTRY_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(db) = env::var("STUDENT_REGISTRY_DB") {
            config.db_path = PathBuf::from(db);
        }
        if let Ok(export) = env::var("STUDENT_REGISTRY_EXPORT") {
            config.export_path = PathBuf::from(export);
        }

        config
    }
}
