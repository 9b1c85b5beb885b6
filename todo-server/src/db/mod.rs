//! Database layer - connection pool, schema and repositories
//!
//! - One shared pool; each request borrows a connection per statement
//! - Rely on DB constraints, handle conflicts - no check-then-insert

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_url};
pub use repos::*;
