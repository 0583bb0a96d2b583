//! PostgreSQL repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use nce_core::domain::{ErrorRecord, NewErrorRecord, Page, PageRequest, SortOrder};
use nce_core::error::RepoError;
use nce_core::ports::ErrorRecordRepository;

use super::entity::error_record::{self, Entity as ErrorRecordEntity};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL error record repository.
pub type PostgresErrorRecordRepository = PostgresBaseRepository<ErrorRecordEntity>;

fn sql_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Ascending => Order::Asc,
        SortOrder::Descending => Order::Desc,
    }
}

#[async_trait]
impl ErrorRecordRepository for PostgresErrorRecordRepository {
    async fn list_page(&self, request: PageRequest) -> Result<Page<ErrorRecord>, RepoError> {
        let order = sql_order(self.order);

        let (models, total) = self
            .unit_of_work("list_page", move |txn| {
                Box::pin(async move {
                    let total = ErrorRecordEntity::find().count(txn).await?;
                    let models = ErrorRecordEntity::find()
                        .order_by(error_record::Column::ErrorId, order)
                        .offset(request.offset())
                        .limit(request.limit)
                        .all(txn)
                        .await?;
                    Ok((models, total))
                })
            })
            .await?;

        tracing::debug!(
            page = request.page,
            limit = request.limit,
            total,
            returned = models.len(),
            "Listed error records"
        );

        Ok(Page {
            items: models.into_iter().map(Into::into).collect(),
            total,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ErrorRecord>, RepoError> {
        tracing::debug!(error_id = id, "Finding error record");

        let model = self
            .unit_of_work("find_by_id", move |txn| {
                Box::pin(async move { ErrorRecordEntity::find_by_id(id).one(txn).await })
            })
            .await?;

        Ok(model.map(Into::into))
    }

    async fn create(&self, record: NewErrorRecord) -> Result<i32, RepoError> {
        let active: error_record::ActiveModel = record.into();

        let model = self
            .unit_of_work("create", move |txn| {
                Box::pin(async move { active.insert(txn).await })
            })
            .await?;

        tracing::info!(error_id = model.error_id, "Error record created");
        Ok(model.error_id)
    }

    async fn replace(&self, id: i32, record: NewErrorRecord) -> Result<u64, RepoError> {
        let active: error_record::ActiveModel = record.into();

        let result = self
            .unit_of_work("replace", move |txn| {
                Box::pin(async move {
                    ErrorRecordEntity::update_many()
                        .set(active)
                        .filter(error_record::Column::ErrorId.eq(id))
                        .exec(txn)
                        .await
                })
            })
            .await?;

        tracing::info!(
            error_id = id,
            rows_affected = result.rows_affected,
            "Error record replaced"
        );
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: i32) -> Result<u64, RepoError> {
        let result = self
            .unit_of_work("delete", move |txn| {
                Box::pin(async move { ErrorRecordEntity::delete_by_id(id).exec(txn).await })
            })
            .await?;

        tracing::info!(
            error_id = id,
            rows_affected = result.rows_affected,
            "Error record deleted"
        );
        Ok(result.rows_affected)
    }

    async fn insert_batch(&self, records: Vec<NewErrorRecord>) -> Result<u64, RepoError> {
        if records.is_empty() {
            return Ok(0);
        }

        let models: Vec<error_record::ActiveModel> =
            records.into_iter().map(Into::into).collect();

        let inserted = self
            .unit_of_work("insert_batch", move |txn| {
                Box::pin(async move {
                    ErrorRecordEntity::insert_many(models)
                        .exec_without_returning(txn)
                        .await
                })
            })
            .await?;

        tracing::info!(inserted, "Error records bulk inserted");
        Ok(inserted)
    }
}
