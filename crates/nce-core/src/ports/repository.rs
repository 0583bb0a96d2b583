use async_trait::async_trait;

use crate::domain::{ErrorRecord, NewErrorRecord, Page, PageRequest};
use crate::error::RepoError;

/// Persistence operations for error records.
///
/// Every method is its own unit of work: it commits on success and rolls back
/// on failure, reporting the engine diagnostic as a [`RepoError`].
#[async_trait]
pub trait ErrorRecordRepository: Send + Sync {
    /// Fetch one page, ordered by `error_id`, along with the total row count.
    async fn list_page(&self, request: PageRequest) -> Result<Page<ErrorRecord>, RepoError>;

    /// Find a record by its id.
    async fn find_by_id(&self, id: i32) -> Result<Option<ErrorRecord>, RepoError>;

    /// Insert a record and return the id assigned by storage.
    async fn create(&self, record: NewErrorRecord) -> Result<i32, RepoError>;

    /// Overwrite every field of an existing record. Returns rows affected (0 or 1).
    async fn replace(&self, id: i32, record: NewErrorRecord) -> Result<u64, RepoError>;

    /// Delete a record. Returns rows affected (0 or 1).
    async fn delete(&self, id: i32) -> Result<u64, RepoError>;

    /// Insert many records atomically. Returns the number inserted.
    async fn insert_batch(&self, records: Vec<NewErrorRecord>) -> Result<u64, RepoError>;
}
