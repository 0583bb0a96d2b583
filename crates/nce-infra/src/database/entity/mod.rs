//! SeaORM entities.

pub mod error_record;
