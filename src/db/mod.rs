//! Database module: models, schema and queries for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `store.rs`: the pooled `SchoolStore` handle and startup seeding
//! - `migrate.rs`: the academic-session backfill
//! - one module per resource with its queries

pub mod attendance;
pub mod fees;
pub mod holidays;
pub mod migrate;
pub mod models;
pub mod schema;
pub mod sessions;
pub mod staff;
pub mod store;
pub mod students;
pub mod users;
pub mod vendors;

pub use migrate::MigrationReport;
pub use schema::SQLITE_INIT;
pub use store::{DEFAULT_SCHOOL_ID, SchoolStore, SqlitePool, spawn};
