//! Churn dataset preparation common types, IDs, and errors.
//!
//! This crate provides foundational types shared by the labeler and the
//! series extractor:
//! - Customer, article and customer-product identity types
//! - Run identifiers and schema versioning
//! - Default column names of the order and label tables
//! - Common error types
//! - Output format specifications

pub mod error;
pub mod id;
pub mod output;
pub mod schema;

pub use error::{Error, Result};
pub use id::{ArticleCode, CustomerCode, CustomerProductId, RunId};
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
