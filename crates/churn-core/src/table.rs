//! In-memory order table.
//!
//! Required columns are parsed into typed fields of [`OrderRecord`]; every
//! cell is also kept verbatim so that columns the pipeline does not
//! interpret pass through unchanged.

use chrono::NaiveDate;
use churn_common::{ArticleCode, CustomerCode, CustomerProductId};
use std::collections::HashMap;

/// Output format of dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header of an order table and the positions of the typed columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub columns: Vec<String>,
    pub date: usize,
    pub article: usize,
    pub customer: usize,
    pub quantity: usize,
    pub price: usize,
    pub id: Option<usize>,
}

impl TableLayout {
    /// Name of the date column.
    pub fn date_column(&self) -> &str {
        &self.columns[self.date]
    }

    /// Header of an extracted series: date first, then every other column
    /// in its original order.
    pub fn series_header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.columns.len());
        header.push(self.columns[self.date].clone());
        header.extend(
            self.columns
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != self.date)
                .map(|(_, c)| c.clone()),
        );
        header
    }

    fn insert_leading(&mut self, name: &str) {
        self.columns.insert(0, name.to_string());
        self.date += 1;
        self.article += 1;
        self.customer += 1;
        self.quantity += 1;
        self.price += 1;
        self.id = Some(0);
    }
}

/// One order event.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// 1-based line in the source file, 0 for rows built in memory.
    pub line: u64,
    pub id: Option<CustomerProductId>,
    pub customer: CustomerCode,
    pub article: ArticleCode,
    pub date: NaiveDate,
    pub quantity: i64,
    pub price: f64,
    /// Raw cells of every column, in header order.
    pub cells: Vec<String>,
}

impl OrderRecord {
    /// Cells in header order with the typed fields written back.
    pub fn render(&self, layout: &TableLayout) -> Vec<String> {
        let mut cells = self.cells.clone();
        cells.resize(layout.columns.len(), String::new());
        cells[layout.date] = self.date.format(DATE_FORMAT).to_string();
        cells[layout.quantity] = self.quantity.to_string();
        cells[layout.price] = format_price(self.price);
        if let (Some(idx), Some(id)) = (layout.id, self.id) {
            cells[idx] = id.to_string();
        }
        cells
    }

    /// Cells in [`TableLayout::series_header`] order.
    pub fn render_series(&self, layout: &TableLayout) -> Vec<String> {
        let mut cells = self.render(layout);
        let date = cells.remove(layout.date);
        cells.insert(0, date);
        cells
    }
}

/// Render a price with a decimal point and no superfluous digits.
pub fn format_price(price: f64) -> String {
    format!("{price}")
}

/// Orders plus the header they were read with.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTable {
    pub layout: TableLayout,
    pub rows: Vec<OrderRecord>,
}

impl OrderTable {
    pub fn new(layout: TableLayout, rows: Vec<OrderRecord>) -> Self {
        Self { layout, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent order date across the whole table.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.date).max()
    }

    /// Drop rows with a zero quantity. Returns how many were removed.
    pub fn drop_zero_quantity(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|r| r.quantity != 0);
        before - self.rows.len()
    }

    /// Keep only rows whose id satisfies `keep`; rows without an id are dropped.
    pub fn retain_ids(&mut self, mut keep: impl FnMut(CustomerProductId) -> bool) {
        self.rows.retain(|r| r.id.is_some_and(&mut keep));
    }

    /// Row indices of every id, ids in order of first appearance.
    pub fn index_by_id(&self) -> (Vec<CustomerProductId>, HashMap<CustomerProductId, Vec<usize>>) {
        let mut order = Vec::new();
        let mut groups: HashMap<CustomerProductId, Vec<usize>> = HashMap::new();
        for (i, row) in self.rows.iter().enumerate() {
            let Some(id) = row.id else { continue };
            groups
                .entry(id)
                .or_insert_with(|| {
                    order.push(id);
                    Vec::new()
                })
                .push(i);
        }
        (order, groups)
    }
}

/// Assigns sequential customer-product ids in first-seen order.
#[derive(Debug, Default)]
pub struct CustomerProductIds {
    ids: HashMap<(CustomerCode, ArticleCode), CustomerProductId>,
    next: u64,
}

impl CustomerProductIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the pair, assigning the next free one if the pair is new.
    pub fn get_or_assign(&mut self, customer: &CustomerCode, article: &ArticleCode) -> CustomerProductId {
        if let Some(id) = self.ids.get(&(customer.clone(), article.clone())) {
            return *id;
        }
        self.next += 1;
        let id = CustomerProductId(self.next);
        self.ids.insert((customer.clone(), article.clone()), id);
        id
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Give every row the id of its (customer, article) pair and make the id the
/// leading column of the table. An existing id column is overwritten in place.
pub fn assign_ids(table: &mut OrderTable, id_column: &str) -> CustomerProductIds {
    let mut ids = CustomerProductIds::new();
    let existing = table.layout.id;
    if existing.is_none() {
        table.layout.insert_leading(id_column);
    }
    for row in &mut table.rows {
        let id = ids.get_or_assign(&row.customer, &row.article);
        row.id = Some(id);
        match existing {
            Some(idx) => {
                if let Some(cell) = row.cells.get_mut(idx) {
                    *cell = id.to_string();
                }
            }
            None => row.cells.insert(0, id.to_string()),
        }
    }
    ids
}
