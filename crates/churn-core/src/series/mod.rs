//! Per-id time series extraction.
//!
//! Selection, duplicate-date merging, daily padding with price
//! correction, and the churned/not-churned output partitions.

pub mod extract;
pub mod merge;
pub mod pad;
pub mod partition;
pub mod price;

pub use extract::{extract_series, Padding, SeriesExtractor};
pub use merge::merge_duplicate_dates;
pub use pad::pad_daily;
pub use partition::SeriesWriter;
pub use price::{PriceChange, PriceChanges};
