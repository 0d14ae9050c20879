//! Schema versioning and default table layout.

/// Current schema version for JSON run summaries.
///
/// Follows semver: MAJOR.MINOR.PATCH
/// - MAJOR: Breaking changes (field removals, type changes)
/// - MINOR: Additive changes (new optional fields)
/// - PATCH: Bug fixes, documentation
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default name of the order date column.
pub const DATE_COLUMN: &str = "DOKDATUM";

/// Default name of the article code column.
pub const ARTICLE_COLUMN: &str = "ARTNR";

/// Default name of the customer code column.
pub const CUSTOMER_COLUMN: &str = "KUNDNR";

/// Default name of the ordered quantity column.
pub const QUANTITY_COLUMN: &str = "ANTAL";

/// Default name of the unit price column.
pub const PRICE_COLUMN: &str = "UTPRIS";

/// Default name of the customer-product id column added by the labeler.
pub const ID_COLUMN: &str = "user_product_id";

/// Default name of the label column in the label file.
pub const LABEL_COLUMN: &str = "label";

/// Default name of the occurrence-count column in the rejected-ids report.
pub const OCCURRENCES_COLUMN: &str = "occurrences";

/// Subdirectory receiving series of churned ids.
pub const CHURNED_DIR: &str = "churned";

/// Subdirectory receiving series of ids that did not churn.
pub const NOT_CHURNED_DIR: &str = "not_churned";
