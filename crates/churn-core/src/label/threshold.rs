//! Per-article churn thresholds.
//!
//! The global threshold is the latest order date in the data minus the
//! churn window. An article whose own latest order is not after that date
//! is treated as discontinued and gets a threshold relative to its own
//! latest order instead, so its buyers are not all labeled churned.

use crate::table::OrderTable;
use chrono::{Days, NaiveDate};
use churn_common::ArticleCode;
use std::collections::HashMap;
use tracing::debug;

/// `date - window_days`, saturating at the earliest representable date.
fn days_before(date: NaiveDate, window_days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Threshold applied to articles that are still sold.
pub fn default_threshold(latest_order: NaiveDate, churn_window_days: u32) -> NaiveDate {
    days_before(latest_order, churn_window_days)
}

/// Threshold of an article given its latest order date.
pub fn threshold_rule(
    article_latest: NaiveDate,
    default_threshold: NaiveDate,
    churn_window_days: u32,
) -> NaiveDate {
    if article_latest > default_threshold {
        default_threshold
    } else {
        days_before(article_latest, churn_window_days)
    }
}

/// Threshold of one article, scanning the whole table for its latest order.
///
/// Returns `None` when the article never occurs.
pub fn infer_threshold(
    table: &OrderTable,
    article: &ArticleCode,
    default_threshold: NaiveDate,
    churn_window_days: u32,
) -> Option<NaiveDate> {
    table
        .rows
        .iter()
        .filter(|r| &r.article == article)
        .map(|r| r.date)
        .max()
        .map(|latest| threshold_rule(latest, default_threshold, churn_window_days))
}

/// Memoized article thresholds for one run.
///
/// Latest order dates are indexed in a single pass on construction;
/// thresholds are computed on first request and reused afterwards.
#[derive(Debug)]
pub struct ArticleThresholds {
    default_threshold: NaiveDate,
    churn_window_days: u32,
    latest: HashMap<ArticleCode, NaiveDate>,
    cache: HashMap<ArticleCode, NaiveDate>,
}

impl ArticleThresholds {
    pub fn new(table: &OrderTable, default_threshold: NaiveDate, churn_window_days: u32) -> Self {
        let mut latest: HashMap<ArticleCode, NaiveDate> = HashMap::new();
        for row in &table.rows {
            latest
                .entry(row.article.clone())
                .and_modify(|d| *d = (*d).max(row.date))
                .or_insert(row.date);
        }
        Self {
            default_threshold,
            churn_window_days,
            latest,
            cache: HashMap::new(),
        }
    }

    /// Threshold of `article`, or `None` if it has no orders.
    pub fn threshold_for(&mut self, article: &ArticleCode) -> Option<NaiveDate> {
        if let Some(t) = self.cache.get(article) {
            return Some(*t);
        }
        let latest = *self.latest.get(article)?;
        let threshold = threshold_rule(latest, self.default_threshold, self.churn_window_days);
        if threshold != self.default_threshold {
            debug!(%article, %latest, %threshold, "article treated as discontinued");
        }
        self.cache.insert(article.clone(), threshold);
        Some(threshold)
    }

    /// Articles whose threshold has been computed so far.
    pub fn computed(&self) -> usize {
        self.cache.len()
    }

    /// Computed thresholds that differ from the default.
    pub fn discontinued(&self) -> usize {
        self.cache
            .values()
            .filter(|t| **t != self.default_threshold)
            .count()
    }
}
