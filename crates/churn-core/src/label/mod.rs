//! Churn label inference.
//!
//! A customer-product pair is churned when it has no order after the
//! churn threshold of its article. The threshold adapts to discontinued
//! articles (see [`threshold`]).

pub mod infer;
pub mod threshold;

pub use infer::{infer_labels, LabelOutcome, LabelParams, LabelRecord, RejectedId};
pub use threshold::{default_threshold, infer_threshold, threshold_rule, ArticleThresholds};
