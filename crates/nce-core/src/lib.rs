//! # NCE Core
//!
//! The domain layer of the NCE error management service.
//! This crate contains the record model, input normalization and the
//! repository port, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
