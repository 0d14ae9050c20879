//! Daily padding of a merged series.

use super::price::PriceChanges;
use crate::table::OrderRecord;

/// Expand `rows` to one row per calendar day between the first and last date.
///
/// `rows` must be sorted by date with unique dates. Inserted days copy the
/// preceding real row with a zero quantity. Every day then takes the price
/// in effect for the series' article, which corrects prices carried across
/// a change that happened between two orders of this series.
pub fn pad_daily(rows: &[OrderRecord], prices: &PriceChanges) -> Vec<OrderRecord> {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Vec::new();
    };
    debug_assert!(
        rows.windows(2).all(|w| w[0].date < w[1].date),
        "pad_daily needs sorted unique dates"
    );
    let article = &first.article;

    let span = last.date.signed_duration_since(first.date).num_days();
    let mut padded = Vec::with_capacity(usize::try_from(span).unwrap_or(0) + 1);
    let mut next = 0;
    let mut carried = first;
    for day in first.date.iter_days().take_while(|d| *d <= last.date) {
        let mut row = if next < rows.len() && rows[next].date == day {
            carried = &rows[next];
            next += 1;
            carried.clone()
        } else {
            let mut filler = carried.clone();
            filler.date = day;
            filler.quantity = 0;
            filler.line = 0;
            filler
        };
        if let Some(price) = prices.price_at(article, day) {
            row.price = price;
        }
        padded.push(row);
    }
    padded
}
