//! Series selection for one customer-product id.

use super::merge::merge_duplicate_dates;
use super::pad::pad_daily;
use super::price::PriceChanges;
use crate::table::{OrderRecord, OrderTable};
use churn_common::CustomerProductId;
use std::collections::HashMap;

/// Whether series are padded to one row per day.
#[derive(Debug, Clone, Copy)]
pub enum Padding<'a> {
    /// Raw orders sorted by date.
    Off,
    /// Merged and padded, prices taken from the given events.
    Daily(&'a PriceChanges),
}

/// Sort a copy of an id's rows by date and pad when requested.
fn build_series(mut rows: Vec<OrderRecord>, padding: Padding<'_>) -> Vec<OrderRecord> {
    rows.sort_by_key(|r| r.date);
    match padding {
        Padding::Off => rows,
        Padding::Daily(prices) => pad_daily(&merge_duplicate_dates(rows), prices),
    }
}

/// Extract the series of `id` from `table` by scanning every row.
///
/// An id without rows yields an empty series.
pub fn extract_series(
    table: &OrderTable,
    id: CustomerProductId,
    padding: Padding<'_>,
) -> Vec<OrderRecord> {
    let rows = table
        .rows
        .iter()
        .filter(|r| r.id == Some(id))
        .cloned()
        .collect();
    build_series(rows, padding)
}

/// Extracts many series from one table using a prebuilt id index.
pub struct SeriesExtractor<'a> {
    table: &'a OrderTable,
    index: HashMap<CustomerProductId, Vec<usize>>,
    padding: Padding<'a>,
}

impl<'a> SeriesExtractor<'a> {
    pub fn new(table: &'a OrderTable, padding: Padding<'a>) -> Self {
        let (_, index) = table.index_by_id();
        Self {
            table,
            index,
            padding,
        }
    }

    /// Whether the table has any row for `id`.
    pub fn contains(&self, id: CustomerProductId) -> bool {
        self.index.contains_key(&id)
    }

    /// Same result as [`extract_series`] for this table and padding.
    pub fn extract(&self, id: CustomerProductId) -> Vec<OrderRecord> {
        let rows = self
            .index
            .get(&id)
            .map(|indices| indices.iter().map(|&i| self.table.rows[i].clone()).collect())
            .unwrap_or_default();
        build_series(rows, self.padding)
    }
}
