pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use db::{Store, init_db};
pub use error::{Result, StoreError};
