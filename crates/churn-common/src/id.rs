//! Customer, article and run identity types.
//!
//! A customer-product combination is identified by a surrogate
//! [`CustomerProductId`] that is assigned per run; the natural key is the
//! (customer, article) pair.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer code as found in the order table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerCode(pub String);

impl fmt::Display for CustomerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CustomerCode {
    fn from(code: &str) -> Self {
        CustomerCode(code.to_string())
    }
}

/// Article (product) code as found in the order table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleCode(pub String);

impl fmt::Display for ArticleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ArticleCode {
    fn from(code: &str) -> Self {
        ArticleCode(code.to_string())
    }
}

/// Surrogate id of one (customer, article) combination.
///
/// Ids start at 1 and are stable within one run only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerProductId(pub u64);

impl CustomerProductId {
    /// Parse an id cell from a CSV file. Accepts `7` as well as `7.0`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(v) = s.parse::<u64>() {
            return Some(CustomerProductId(v));
        }
        match s.parse::<f64>() {
            Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => {
                Some(CustomerProductId(v as u64))
            }
            _ => None,
        }
    }
}

impl fmt::Display for CustomerProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CustomerProductId {
    fn from(id: u64) -> Self {
        CustomerProductId(id)
    }
}

/// Run ID attached to the log span of one pipeline invocation.
///
/// Format: `run-<date>-<time>-<random>`
/// Example: `run-20260115-143022-abc123`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new run ID.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        let random: String = uuid::Uuid::new_v4()
            .to_string()
            .chars()
            .take(6)
            .collect();
        RunId(format!("run-{}-{}", now.format("%Y%m%d-%H%M%S"), random))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_format() {
        let rid = RunId::new();
        assert!(rid.0.starts_with("run-"));
        assert_eq!(rid.0.len(), "run-20260115-143022-abc123".len());
        assert_ne!(rid, RunId::new());
    }

    #[test]
    fn test_customer_product_id_parse() {
        assert_eq!(CustomerProductId::parse("42"), Some(CustomerProductId(42)));
        assert_eq!(CustomerProductId::parse(" 7.0 "), Some(CustomerProductId(7)));
        assert_eq!(CustomerProductId::parse("7.5"), None);
        assert_eq!(CustomerProductId::parse("-1"), None);
        assert_eq!(CustomerProductId::parse("abc"), None);
    }

    #[test]
    fn test_codes_display_verbatim() {
        assert_eq!(ArticleCode::from("0042").to_string(), "0042");
        assert_eq!(CustomerCode::from("K-1").to_string(), "K-1");
    }
}
