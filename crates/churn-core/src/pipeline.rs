//! The two batch runs: labeling and series extraction.

use crate::codec::{self, ReadOptions};
use crate::label::{infer_labels, LabelParams};
use crate::series::{Padding, PriceChanges, SeriesExtractor, SeriesWriter};
use crate::table::assign_ids;
use churn_common::{Result, RunId, SCHEMA_VERSION};
use churn_config::{ColumnNames, DecimalSeparator};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, info_span, warn};

/// Inputs and outputs of one labeling run.
#[derive(Debug, Clone)]
pub struct LabelJob {
    pub input: PathBuf,
    pub data_out: PathBuf,
    pub label_out: PathBuf,
    pub rejected_out: Option<PathBuf>,
    pub params: LabelParams,
    pub columns: ColumnNames,
    pub delimiter: u8,
    pub decimal: DecimalSeparator,
}

/// Counts reported after a labeling run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSummary {
    pub schema_version: String,
    pub run_id: RunId,
    pub input_rows: usize,
    pub zero_quantity_rows: usize,
    pub customer_product_pairs: usize,
    pub labeled: usize,
    pub churned: usize,
    pub rejected: usize,
    pub discontinued_articles: usize,
    pub output_rows: usize,
}

impl fmt::Display for LabelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "labeled {} of {} customer-product ids ({} churned, {} rejected, {} discontinued articles); {} order rows written",
            self.labeled,
            self.customer_product_pairs,
            self.churned,
            self.rejected,
            self.discontinued_articles,
            self.output_rows
        )
    }
}

/// Read raw orders, assign ids, infer labels and write both output tables.
pub fn run_labeler(job: &LabelJob, run_id: &RunId) -> Result<LabelSummary> {
    let _span = info_span!("label", run_id = %run_id).entered();
    info!(input = %job.input.display(), "reading orders");
    let mut table = codec::read_orders(
        &job.input,
        &ReadOptions {
            columns: &job.columns,
            delimiter: job.delimiter,
            decimal: job.decimal,
            require_id: false,
        },
    )?;
    let input_rows = table.len();
    let ids = assign_ids(&mut table, &job.columns.id);
    let zero_quantity_rows = table.drop_zero_quantity();
    info!(
        input_rows,
        zero_quantity_rows,
        pairs = ids.len(),
        "customer-product ids assigned"
    );

    let outcome = infer_labels(&table, job.params);
    let labeled: HashSet<_> = outcome.labels.iter().map(|l| l.id).collect();
    table.retain_ids(|id| labeled.contains(&id));

    codec::write_orders(&job.data_out, &table, job.delimiter)?;
    codec::write_labels(&job.label_out, &outcome.labels, &job.columns, job.delimiter)?;
    if let Some(path) = &job.rejected_out {
        codec::write_rejected(path, &outcome.rejected, &job.columns, job.delimiter)?;
    }
    info!(
        data = %job.data_out.display(),
        labels = %job.label_out.display(),
        "outputs written"
    );

    Ok(LabelSummary {
        schema_version: SCHEMA_VERSION.to_string(),
        run_id: run_id.clone(),
        input_rows,
        zero_quantity_rows,
        customer_product_pairs: ids.len(),
        labeled: outcome.labels.len(),
        churned: outcome.churned(),
        rejected: outcome.rejected.len(),
        discontinued_articles: outcome.discontinued_articles,
        output_rows: table.len(),
    })
}

/// Inputs and outputs of one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractJob {
    pub input: PathBuf,
    pub labels: PathBuf,
    pub out_dir: PathBuf,
    pub pad: bool,
    pub columns: ColumnNames,
    pub delimiter: u8,
    pub decimal: DecimalSeparator,
}

/// Counts reported after an extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    pub schema_version: String,
    pub run_id: RunId,
    pub padded: bool,
    pub series_written: usize,
    pub churned: usize,
    pub not_churned: usize,
    pub empty_series: usize,
    pub rows_written: usize,
}

impl fmt::Display for ExtractSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wrote {} series ({} churned, {} not churned, {} empty), {} rows{}",
            self.series_written,
            self.churned,
            self.not_churned,
            self.empty_series,
            self.rows_written,
            if self.padded { ", padded daily" } else { "" }
        )
    }
}

/// Write one series file per labeled id into the label partitions.
pub fn run_extractor(job: &ExtractJob, run_id: &RunId) -> Result<ExtractSummary> {
    let _span = info_span!("extract", run_id = %run_id).entered();
    info!(input = %job.input.display(), labels = %job.labels.display(), "reading inputs");
    let table = codec::read_orders(
        &job.input,
        &ReadOptions {
            columns: &job.columns,
            delimiter: job.delimiter,
            decimal: job.decimal,
            require_id: true,
        },
    )?;
    let labels = codec::read_labels(&job.labels, &job.columns, job.delimiter)?;

    let prices = job.pad.then(|| PriceChanges::from_table(&table));
    let padding = match &prices {
        Some(p) => {
            info!(articles = p.articles(), "price-change events derived");
            Padding::Daily(p)
        }
        None => Padding::Off,
    };
    let extractor = SeriesExtractor::new(&table, padding);
    let mut writer = SeriesWriter::new(&job.out_dir, &table.layout, job.delimiter);

    let mut summary = ExtractSummary {
        schema_version: SCHEMA_VERSION.to_string(),
        run_id: run_id.clone(),
        padded: job.pad,
        series_written: 0,
        churned: 0,
        not_churned: 0,
        empty_series: 0,
        rows_written: 0,
    };
    for label in &labels {
        if !extractor.contains(label.id) {
            warn!(id = %label.id, "labeled id has no orders");
        }
        let series = extractor.extract(label.id);
        if series.is_empty() {
            summary.empty_series += 1;
        }
        writer.write(label.id, label.churned, &series)?;
        summary.series_written += 1;
        summary.rows_written += series.len();
        if label.churned {
            summary.churned += 1;
        } else {
            summary.not_churned += 1;
        }
    }
    info!(
        root = %writer.root().display(),
        series = summary.series_written,
        empty = summary.empty_series,
        "series written"
    );
    Ok(summary)
}
