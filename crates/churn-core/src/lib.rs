//! Churn training-data preparation.
//!
//! Two batch runs over an in-memory order table:
//! - [`pipeline::run_labeler`] assigns customer-product ids and infers a
//!   churn label per id with article-adaptive thresholds
//! - [`pipeline::run_extractor`] writes one (optionally day-padded) series
//!   per labeled id into a churned/not_churned directory tree

pub mod cli;
pub mod codec;
pub mod exit_codes;
pub mod label;
pub mod logging;
pub mod pipeline;
pub mod series;
pub mod table;

pub use exit_codes::ExitCode;
pub use label::{infer_labels, LabelOutcome, LabelParams, LabelRecord};
pub use series::{extract_series, Padding, PriceChanges};
pub use table::{assign_ids, OrderRecord, OrderTable, TableLayout};
