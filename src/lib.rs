// Student Registry - Core Library
// Exposes all modules for use in the API server and tests

pub mod api;
pub mod config;
pub mod db;
pub mod export;
pub mod service;

// Re-export commonly used types
pub use api::{router, AppState};
pub use config::ServerConfig;
pub use db::{setup_database, Student, StudentStore};
pub use export::{StudentSlot, DEFAULT_SLOT_PATH};
pub use service::{StudentService, DEFAULT_HONORS_GPA};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
