//! Student Directory - in-memory student records over HTTP
//!
//! Layers:
//! 1. Student: record, id and patch types
//! 2. StudentDirectory: keyed store with lookup, insert, update and delete
//! 3. Server: axum router mapping endpoints onto directory operations

pub mod config;
pub mod directory;
pub mod error;
pub mod server;
pub mod student;

pub use config::Config;
pub use directory::{DirectoryStats, IdNameLookup, NameLookup, StudentDirectory};
pub use error::{DirectoryError, Result};
pub use server::{router, AppState};
pub use student::{Student, StudentId, StudentPatch};
