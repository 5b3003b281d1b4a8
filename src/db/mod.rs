//! Database module: record shapes, schema registry and SQLite storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: registered tables and their DDL
//! - `sqlite.rs`: pool handle, initializer and per-table storage

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DetectionHistory, NewDetection, NewUser, User};
pub use schema::{TABLES, TableDef};
pub use sqlite::{HistoryStorage, SqlitePool, Store, UserStorage, init_db};
