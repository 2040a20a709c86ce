//! # petfinder-database
//!
//! PostgreSQL connection management, migrations, and the repository layer.
//! Every repository is a trait with a PostgreSQL implementation and an
//! in-memory implementation selected by `database.provider`.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::Repositories;
