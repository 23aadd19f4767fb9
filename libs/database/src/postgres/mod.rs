//! PostgreSQL connector and transaction management
//!
//! Connection configuration and pooling, migration running, health checks,
//! and the unit-of-work transaction manager.

mod config;
mod connector;
mod health;
mod transaction;

pub use config::PostgresConfig;
pub use connector::{
    connect, connect_from_config, connect_with_options, connect_with_retry, run_migrations,
};
pub use health::check_health;
pub use transaction::TransactionManager;

// Re-export SeaORM types for convenience
pub use sea_orm::{ConnectOptions, DatabaseConnection, DatabaseTransaction, DbErr};
pub use sea_orm_migration::MigratorTrait;
