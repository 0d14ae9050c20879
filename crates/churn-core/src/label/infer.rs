//! Label inference over customer-product groups.

use super::threshold::{default_threshold, ArticleThresholds};
use crate::table::OrderTable;
use chrono::NaiveDate;
use churn_common::{ArticleCode, CustomerProductId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Parameters of label inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelParams {
    /// Days of inactivity after which a pair counts as churned.
    pub churn_window_days: u32,
    /// Orders a pair needs before it is labeled at all.
    pub inclusion_threshold: usize,
}

impl Default for LabelParams {
    fn default() -> Self {
        Self {
            churn_window_days: 365,
            inclusion_threshold: 10,
        }
    }
}

/// Label of one customer-product id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub id: CustomerProductId,
    pub churned: bool,
}

/// An id left out of the labels for having too few orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedId {
    pub id: CustomerProductId,
    pub occurrences: usize,
}

/// Result of label inference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelOutcome {
    /// Labels in order of first appearance of each id.
    pub labels: Vec<LabelRecord>,
    /// Excluded ids in order of first appearance.
    pub rejected: Vec<RejectedId>,
    /// Threshold applied to articles that are still sold.
    pub default_threshold: Option<NaiveDate>,
    /// Labeled articles that were treated as discontinued.
    pub discontinued_articles: usize,
}

impl LabelOutcome {
    pub fn churned(&self) -> usize {
        self.labels.iter().filter(|l| l.churned).count()
    }

    /// Whether `id` received a label.
    pub fn label_of(&self, id: CustomerProductId) -> Option<bool> {
        self.labels.iter().find(|l| l.id == id).map(|l| l.churned)
    }
}

struct Group {
    occurrences: usize,
    article: ArticleCode,
    latest: NaiveDate,
}

/// Label every customer-product id of `table`.
///
/// Rows without an id are ignored. An empty table yields an empty outcome.
pub fn infer_labels(table: &OrderTable, params: LabelParams) -> LabelOutcome {
    let Some(latest_overall) = table.latest_date() else {
        return LabelOutcome::default();
    };
    let default = default_threshold(latest_overall, params.churn_window_days);
    let mut thresholds = ArticleThresholds::new(table, default, params.churn_window_days);

    let mut order = Vec::new();
    let mut groups: HashMap<CustomerProductId, Group> = HashMap::new();
    for row in &table.rows {
        let Some(id) = row.id else { continue };
        groups
            .entry(id)
            .and_modify(|g| {
                g.occurrences += 1;
                g.latest = g.latest.max(row.date);
            })
            .or_insert_with(|| {
                order.push(id);
                Group {
                    occurrences: 1,
                    article: row.article.clone(),
                    latest: row.date,
                }
            });
    }

    let mut outcome = LabelOutcome {
        default_threshold: Some(default),
        ..LabelOutcome::default()
    };
    for id in order {
        let group = &groups[&id];
        if group.occurrences < params.inclusion_threshold {
            outcome.rejected.push(RejectedId {
                id,
                occurrences: group.occurrences,
            });
            continue;
        }
        let Some(threshold) = thresholds.threshold_for(&group.article) else {
            continue;
        };
        // Churned iff no order falls strictly after the threshold.
        let churned = group.latest <= threshold;
        debug!(%id, article = %group.article, %threshold, churned, "labeled");
        outcome.labels.push(LabelRecord { id, churned });
    }
    outcome.discontinued_articles = thresholds.discontinued();

    info!(
        %default,
        labeled = outcome.labels.len(),
        churned = outcome.churned(),
        rejected = outcome.rejected.len(),
        discontinued_articles = outcome.discontinued_articles,
        "labels inferred"
    );
    outcome
}
