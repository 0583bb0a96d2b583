//! In-memory record store - used when no database is configured, and in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use nce_core::domain::{ErrorRecord, NewErrorRecord, Page, PageRequest, SortOrder};
use nce_core::error::RepoError;
use nce_core::ports::ErrorRecordRepository;

#[derive(Default)]
struct Store {
    rows: BTreeMap<i32, ErrorRecord>,
    /// Highest id ever handed out; ids are never reused after deletion.
    last_id: i32,
}

impl Store {
    fn insert(&mut self, record: NewErrorRecord) -> Result<i32, RepoError> {
        let error_id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| RepoError::Query("error_id sequence exhausted".to_string()))?;
        self.last_id = error_id;
        self.rows.insert(error_id, record.with_id(error_id));
        Ok(error_id)
    }
}

/// In-memory error record repository using a `BTreeMap` behind an async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryErrorRecordRepository {
    store: RwLock<Store>,
    order: SortOrder,
}

impl InMemoryErrorRecordRepository {
    pub fn new() -> Self {
        Self::with_order(SortOrder::default())
    }

    pub fn with_order(order: SortOrder) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            order,
        }
    }
}

impl Default for InMemoryErrorRecordRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ErrorRecordRepository for InMemoryErrorRecordRepository {
    async fn list_page(&self, request: PageRequest) -> Result<Page<ErrorRecord>, RepoError> {
        let store = self.store.read().await;
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.limit).unwrap_or(usize::MAX);

        let items = match self.order {
            SortOrder::Ascending => store.rows.values().skip(skip).take(take).cloned().collect(),
            SortOrder::Descending => store
                .rows
                .values()
                .rev()
                .skip(skip)
                .take(take)
                .cloned()
                .collect(),
        };

        Ok(Page {
            items,
            total: store.rows.len() as u64,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ErrorRecord>, RepoError> {
        Ok(self.store.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, record: NewErrorRecord) -> Result<i32, RepoError> {
        let error_id = self.store.write().await.insert(record)?;
        tracing::info!(error_id, "Error record created (in-memory)");
        Ok(error_id)
    }

    async fn replace(&self, id: i32, record: NewErrorRecord) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        match store.rows.get_mut(&id) {
            Some(row) => {
                *row = record.with_id(id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i32) -> Result<u64, RepoError> {
        let removed = self.store.write().await.rows.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn insert_batch(&self, records: Vec<NewErrorRecord>) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        let mut staged = Store {
            rows: BTreeMap::new(),
            last_id: store.last_id,
        };
        for record in records {
            staged.insert(record)?;
        }

        let inserted = staged.rows.len() as u64;
        store.last_id = staged.last_id;
        store.rows.append(&mut staged.rows);
        Ok(inserted)
    }
}
