//! Price-change events per article.

use crate::table::OrderTable;
use chrono::NaiveDate;
use churn_common::ArticleCode;
use std::collections::HashMap;

/// The first day a new price was observed for an article.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub date: NaiveDate,
    pub price: f64,
}

/// Chronological price-change events of every article.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceChanges {
    by_article: HashMap<ArticleCode, Vec<PriceChange>>,
}

impl PriceChanges {
    /// Scan each article's orders by date (stable for equal dates) and record
    /// every row whose price differs from the previous row. The first row of
    /// an article always counts as a change.
    pub fn from_table(table: &OrderTable) -> Self {
        let mut rows_by_article: HashMap<&ArticleCode, Vec<usize>> = HashMap::new();
        for (i, row) in table.rows.iter().enumerate() {
            rows_by_article.entry(&row.article).or_default().push(i);
        }

        let mut by_article = HashMap::with_capacity(rows_by_article.len());
        for (article, mut indices) in rows_by_article {
            indices.sort_by_key(|&i| table.rows[i].date);
            let mut events = Vec::new();
            let mut previous: Option<f64> = None;
            for i in indices {
                let row = &table.rows[i];
                if previous != Some(row.price) {
                    events.push(PriceChange {
                        date: row.date,
                        price: row.price,
                    });
                }
                previous = Some(row.price);
            }
            by_article.insert(article.clone(), events);
        }
        Self { by_article }
    }

    /// Events of one article in chronological order.
    pub fn events(&self, article: &ArticleCode) -> &[PriceChange] {
        self.by_article
            .get(article)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Price in effect on `date`: the latest event on or before that day.
    /// Among events sharing a date the last one wins.
    pub fn price_at(&self, article: &ArticleCode, date: NaiveDate) -> Option<f64> {
        let events = self.events(article);
        let idx = events.partition_point(|e| e.date <= date);
        idx.checked_sub(1).map(|i| events[i].price)
    }

    pub fn articles(&self) -> usize {
        self.by_article.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_support::*;

    #[test]
    fn test_first_row_counts_as_change() {
        let table = raw_table(vec![order("c1", "a", "2020-01-03", 1, 5.0)]);
        let changes = PriceChanges::from_table(&table);
        assert_eq!(
            changes.events(&ArticleCode::from("a")),
            &[PriceChange {
                date: date("2020-01-03"),
                price: 5.0
            }]
        );
    }

    #[test]
    fn test_changes_scanned_across_customers_by_date() {
        let table = raw_table(vec![
            order("c1", "a", "2020-01-10", 1, 12.0),
            order("c2", "a", "2020-01-01", 1, 10.0),
            order("c2", "a", "2020-01-04", 1, 10.0),
            order("c3", "a", "2020-01-07", 1, 11.0),
            order("c3", "b", "2020-01-07", 1, 99.0),
        ]);
        let changes = PriceChanges::from_table(&table);
        let a: Vec<(NaiveDate, f64)> = changes
            .events(&ArticleCode::from("a"))
            .iter()
            .map(|e| (e.date, e.price))
            .collect();
        assert_eq!(
            a,
            vec![
                (date("2020-01-01"), 10.0),
                (date("2020-01-07"), 11.0),
                (date("2020-01-10"), 12.0),
            ]
        );
        assert_eq!(changes.articles(), 2);
    }

    #[test]
    fn test_price_at_lookup() {
        let table = raw_table(vec![
            order("c1", "a", "2020-01-01", 1, 10.0),
            order("c2", "a", "2020-01-05", 1, 12.0),
        ]);
        let changes = PriceChanges::from_table(&table);
        let a = ArticleCode::from("a");
        assert_eq!(changes.price_at(&a, date("2019-12-31")), None);
        assert_eq!(changes.price_at(&a, date("2020-01-01")), Some(10.0));
        assert_eq!(changes.price_at(&a, date("2020-01-04")), Some(10.0));
        assert_eq!(changes.price_at(&a, date("2020-01-05")), Some(12.0));
        assert_eq!(changes.price_at(&a, date("2020-02-01")), Some(12.0));
        assert_eq!(changes.price_at(&ArticleCode::from("b"), date("2020-01-05")), None);
    }

    #[test]
    fn test_same_day_price_changes_last_wins() {
        let table = raw_table(vec![
            order("c1", "a", "2020-01-01", 1, 10.0),
            order("c2", "a", "2020-01-01", 1, 11.0),
        ]);
        let changes = PriceChanges::from_table(&table);
        assert_eq!(changes.events(&ArticleCode::from("a")).len(), 2);
        assert_eq!(
            changes.price_at(&ArticleCode::from("a"), date("2020-01-01")),
            Some(11.0)
        );
    }
}
