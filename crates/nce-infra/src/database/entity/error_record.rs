//! Error record entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use nce_core::domain::{ErrorRecord, NewErrorRecord};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(schema_name = "public", table_name = "sheet1_errors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub error_id: i32,
    #[sea_orm(column_type = "Text")]
    pub error_description: String,
    #[sea_orm(column_type = "Text")]
    pub category: String,
    #[sea_orm(column_type = "Text")]
    pub customer_overview_type: String,
    pub error_date: Date,
    pub error_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to domain ErrorRecord.
impl From<Model> for ErrorRecord {
    fn from(model: Model) -> Self {
        Self {
            error_id: model.error_id,
            error_description: model.error_description,
            category: model.category,
            customer_overview_type: model.customer_overview_type,
            error_date: model.error_date,
            error_count: model.error_count,
        }
    }
}

/// Conversion from a validated record to an ActiveModel.
///
/// `error_id` stays unset so the database sequence assigns it on insert and
/// an update never touches it.
impl From<NewErrorRecord> for ActiveModel {
    fn from(record: NewErrorRecord) -> Self {
        Self {
            error_id: NotSet,
            error_description: Set(record.error_description),
            category: Set(record.category),
            customer_overview_type: Set(record.customer_overview_type),
            error_date: Set(record.error_date),
            error_count: Set(record.error_count),
        }
    }
}
