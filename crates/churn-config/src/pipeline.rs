//! Pipeline configuration types.
//!
//! Every field has a default so that a config file only needs to name
//! what it changes.

use churn_common::schema;
use serde::{Deserialize, Serialize};

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub schema_version: Option<String>,

    #[serde(default)]
    pub labeler: LabelerConfig,

    #[serde(default)]
    pub extractor: ExtractorConfig,

    #[serde(default)]
    pub csv: CsvFormat,

    #[serde(default)]
    pub columns: ColumnNames,
}

/// Options of the label inference run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelerConfig {
    /// Days of inactivity after which a customer-product pair is churned.
    #[serde(default = "default_churn_window_days")]
    pub churn_window_days: u32,

    /// Minimum number of orders a pair needs to be labeled at all.
    #[serde(default = "default_inclusion_threshold")]
    pub inclusion_threshold: usize,

    /// Decimal separator of the raw order export.
    #[serde(default = "default_labeler_decimal")]
    pub input_decimal: DecimalSeparator,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            churn_window_days: default_churn_window_days(),
            inclusion_threshold: default_inclusion_threshold(),
            input_decimal: default_labeler_decimal(),
        }
    }
}

fn default_churn_window_days() -> u32 {
    365
}

fn default_inclusion_threshold() -> usize {
    10
}

fn default_labeler_decimal() -> DecimalSeparator {
    DecimalSeparator::Comma
}

/// Options of the series extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Pad every series to one row per calendar day.
    #[serde(default)]
    pub pad: bool,

    /// Decimal separator of the labeled order table.
    #[serde(default = "default_extractor_decimal")]
    pub input_decimal: DecimalSeparator,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            pad: false,
            input_decimal: default_extractor_decimal(),
        }
    }
}

fn default_extractor_decimal() -> DecimalSeparator {
    DecimalSeparator::Point
}

/// Decimal separator used when parsing prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalSeparator {
    /// `12,50`
    Comma,
    /// `12.50`
    Point,
}

impl std::fmt::Display for DecimalSeparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecimalSeparator::Comma => write!(f, "comma"),
            DecimalSeparator::Point => write!(f, "point"),
        }
    }
}

/// CSV dialect shared by all input and output files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvFormat {
    /// Field delimiter; must be a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

impl CsvFormat {
    /// Delimiter as the byte the csv crate expects. Only meaningful after
    /// validation has confirmed the delimiter is ASCII.
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}

fn default_delimiter() -> char {
    ','
}

/// Column names of the order and label tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNames {
    #[serde(default = "default_date")]
    pub date: String,
    #[serde(default = "default_article")]
    pub article: String,
    #[serde(default = "default_customer")]
    pub customer: String,
    #[serde(default = "default_quantity")]
    pub quantity: String,
    #[serde(default = "default_price")]
    pub price: String,
    #[serde(default = "default_id")]
    pub id: String,
    #[serde(default = "default_label")]
    pub label: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: default_date(),
            article: default_article(),
            customer: default_customer(),
            quantity: default_quantity(),
            price: default_price(),
            id: default_id(),
            label: default_label(),
        }
    }
}

impl ColumnNames {
    /// All configured names paired with the setting they come from.
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("date", self.date.as_str()),
            ("article", self.article.as_str()),
            ("customer", self.customer.as_str()),
            ("quantity", self.quantity.as_str()),
            ("price", self.price.as_str()),
            ("id", self.id.as_str()),
            ("label", self.label.as_str()),
        ]
    }
}

fn default_date() -> String {
    schema::DATE_COLUMN.to_string()
}
fn default_article() -> String {
    schema::ARTICLE_COLUMN.to_string()
}
fn default_customer() -> String {
    schema::CUSTOMER_COLUMN.to_string()
}
fn default_quantity() -> String {
    schema::QUANTITY_COLUMN.to_string()
}
fn default_price() -> String {
    schema::PRICE_COLUMN.to_string()
}
fn default_id() -> String {
    schema::ID_COLUMN.to_string()
}
fn default_label() -> String {
    schema::LABEL_COLUMN.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_order_export() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.labeler.churn_window_days, 365);
        assert_eq!(cfg.labeler.inclusion_threshold, 10);
        assert_eq!(cfg.labeler.input_decimal, DecimalSeparator::Comma);
        assert_eq!(cfg.extractor.input_decimal, DecimalSeparator::Point);
        assert!(!cfg.extractor.pad);
        assert_eq!(cfg.columns.date, "DOKDATUM");
        assert_eq!(cfg.csv.delimiter_byte(), b',');
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let cfg: PipelineConfig = serde_json::from_str(
            r#"{ "labeler": { "churn_window_days": 90 }, "columns": { "price": "PRICE" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.labeler.churn_window_days, 90);
        assert_eq!(cfg.labeler.inclusion_threshold, 10);
        assert_eq!(cfg.columns.price, "PRICE");
        assert_eq!(cfg.columns.quantity, "ANTAL");
    }

    #[test]
    fn test_decimal_separator_names() {
        let d: DecimalSeparator = serde_json::from_str("\"point\"").unwrap();
        assert_eq!(d, DecimalSeparator::Point);
        assert_eq!(DecimalSeparator::Comma.to_string(), "comma");
    }
}
