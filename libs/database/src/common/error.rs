/// Error type for database infrastructure operations
///
/// Covers connection lifecycle, health checks, migrations, and transaction
/// resolution. Storage-operation errors raised while executing queries stay
/// as `sea_orm::DbErr` inside the repositories; this type is for the
/// infrastructure around them.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Underlying SeaORM/driver error
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Connection could not be established after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Migration error
    #[error("Migration error: {0}")]
    MigrationError(String),
}

/// Result type alias for database infrastructure operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
