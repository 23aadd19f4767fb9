use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{debug, error};

use crate::common::{DatabaseError, DatabaseResult};

/// Unit-of-work manager for the command services
///
/// Owns the connection pool and hands out exclusively-owned transactions.
/// A transaction obtained from [`begin`](Self::begin) must be resolved by
/// exactly one call to [`complete`](Self::complete), which consumes the
/// handle: commit when the supplied outcome is `Ok`, rollback when it is
/// `Err`. Because `complete` takes the transaction by value, a second
/// resolution does not compile, and a handle dropped on an abandoned future
/// is rolled back by SeaORM's drop behavior.
#[derive(Clone)]
pub struct TransactionManager {
    db: DatabaseConnection,
}

impl TransactionManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The connection this manager allocates transactions from
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Begin a new transaction
    ///
    /// Fails when the pool cannot allocate one (exhausted, connection lost).
    pub async fn begin(&self) -> DatabaseResult<DatabaseTransaction> {
        let tx = self.db.begin().await?;
        debug!("transaction started");
        Ok(tx)
    }

    /// Resolve a transaction according to the outcome of the work done in it
    ///
    /// Commits on `Ok`; a commit failure is converted into the caller's
    /// error type. Rolls back on `Err`; a rollback failure is logged and the
    /// original error is returned, since the business error takes priority
    /// over the resolution failure.
    pub async fn complete<T, E>(
        &self,
        tx: DatabaseTransaction,
        outcome: Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DatabaseError>,
    {
        match outcome {
            Ok(value) => match tx.commit().await {
                Ok(()) => {
                    debug!("transaction committed");
                    Ok(value)
                }
                Err(e) => Err(E::from(DatabaseError::from(e))),
            },
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!(error = %rollback_err, "transaction rollback failed");
                } else {
                    debug!("transaction rolled back");
                }
                Err(err)
            }
        }
    }
}
