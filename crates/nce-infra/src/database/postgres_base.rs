use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use sea_orm::{
    DatabaseTransaction, DbConn, DbErr, EntityTrait, RuntimeErr, TransactionError,
    TransactionTrait,
};

use nce_core::domain::SortOrder;
use nce_core::error::RepoError;

/// Future returned by a unit-of-work body.
pub(crate) type TxnFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, DbErr>> + Send + 'c>>;

/// Generic PostgreSQL repository: a connection pool plus a listing order.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    pub(crate) order: SortOrder,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self::with_order(db, SortOrder::default())
    }

    pub fn with_order(db: DbConn, order: SortOrder) -> Self {
        Self {
            db,
            order,
            _entity: PhantomData,
        }
    }

    /// Run `work` inside its own transaction.
    ///
    /// Commits when `work` succeeds and rolls back otherwise. Failures are
    /// reported with the engine's primary diagnostic only.
    pub(crate) async fn unit_of_work<T, F>(
        &self,
        operation: &'static str,
        work: F,
    ) -> Result<T, RepoError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxnFuture<'c, T> + Send,
    {
        tracing::debug!(operation, "Opening unit of work");

        self.db
            .transaction::<F, T, DbErr>(work)
            .await
            .map_err(|err| {
                let repo_err = match err {
                    TransactionError::Connection(e) => {
                        RepoError::Connection(storage_diagnostic(&e))
                    }
                    TransactionError::Transaction(e) => RepoError::Query(storage_diagnostic(&e)),
                };
                tracing::error!(operation, error = %repo_err, "Unit of work rolled back");
                repo_err
            })
    }
}

/// Extract the human-readable message from a storage error.
///
/// Database-reported errors yield the server's own message; anything else
/// yields the first line of the error's rendering.
pub(crate) fn storage_diagnostic(err: &DbErr) -> String {
    let runtime = match err {
        DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => Some(e),
        _ => None,
    };

    if let Some(RuntimeErr::SqlxError(sqlx_err)) = runtime {
        if let Some(db_err) = sqlx_err.as_database_error() {
            return db_err.message().to_string();
        }
    }

    err.to_string()
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
