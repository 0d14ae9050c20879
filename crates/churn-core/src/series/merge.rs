//! Collapse same-day orders of one series.

use crate::table::OrderRecord;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Merge rows sharing a date into the first of them, summing quantities.
///
/// The first pass picks a representative per date and sums its quantity;
/// the second keeps only representatives with a non-zero total. Relative
/// order of the kept rows is preserved.
pub fn merge_duplicate_dates(rows: Vec<OrderRecord>) -> Vec<OrderRecord> {
    let mut totals: HashMap<NaiveDate, (usize, i64)> = HashMap::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        totals
            .entry(row.date)
            .and_modify(|(_, sum)| *sum += row.quantity)
            .or_insert((i, row.quantity));
    }

    rows.into_iter()
        .enumerate()
        .filter_map(|(i, mut row)| {
            let (representative, sum) = totals[&row.date];
            if representative != i || sum == 0 {
                return None;
            }
            row.quantity = sum;
            Some(row)
        })
        .collect()
}
