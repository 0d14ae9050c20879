//! CSV reading and writing of order, label and report tables.

use crate::label::{LabelRecord, RejectedId};
use crate::table::{OrderRecord, OrderTable, TableLayout};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use churn_common::{ArticleCode, CustomerCode, CustomerProductId, Error, Result};
use churn_config::{ColumnNames, DecimalSeparator};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// How to read an order table.
#[derive(Debug, Clone)]
pub struct ReadOptions<'a> {
    pub columns: &'a ColumnNames,
    pub delimiter: u8,
    pub decimal: DecimalSeparator,
    /// Fail when the id column is absent.
    pub require_id: bool,
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

/// Parse an order date. Date-times are accepted only at midnight.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
                .filter(|dt| dt.time() == NaiveTime::MIN)
                .map(|dt| dt.date())
        })
}

/// Parse a decimal number written with the given separator.
///
/// With a comma separator, `12,5` and `12.5` are both accepted; with a
/// point separator a comma is malformed.
pub fn parse_decimal(value: &str, decimal: DecimalSeparator) -> Option<f64> {
    let value = value.trim();
    let parsed = match decimal {
        DecimalSeparator::Point => value.parse::<f64>().ok(),
        DecimalSeparator::Comma => {
            if value.matches(',').count() > 1 || (value.contains(',') && value.contains('.')) {
                None
            } else {
                value.replacen(',', ".", 1).parse::<f64>().ok()
            }
        }
    };
    parsed.filter(|v| v.is_finite())
}

/// Parse an ordered quantity; integral decimals such as `3,0` are accepted.
pub fn parse_quantity(value: &str, decimal: DecimalSeparator) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(q) = trimmed.parse::<i64>() {
        return Some(q);
    }
    parse_decimal(trimmed, decimal)
        .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
        .map(|v| v as i64)
}

/// Parse a label cell: `1`/`0`, `True`/`False` in any case.
pub fn parse_label(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::MissingColumn {
            column: name.to_string(),
        })
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn cell<'r>(record: &'r csv::StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("")
}

/// Read an order table from a file.
pub fn read_orders(path: &Path, options: &ReadOptions<'_>) -> Result<OrderTable> {
    let file = File::open(path)?;
    let table = read_orders_from(file, options)?;
    debug!(path = %path.display(), rows = table.len(), "order table read");
    Ok(table)
}

/// Read an order table from any reader.
pub fn read_orders_from<R: Read>(reader: R, options: &ReadOptions<'_>) -> Result<OrderTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let names = options.columns;

    let id = match column_index(&headers, &names.id) {
        Ok(idx) => Some(idx),
        Err(e) if options.require_id => return Err(e),
        Err(_) => None,
    };
    let layout = TableLayout {
        columns: headers.iter().map(str::to_string).collect(),
        date: column_index(&headers, &names.date)?,
        article: column_index(&headers, &names.article)?,
        customer: column_index(&headers, &names.customer)?,
        quantity: column_index(&headers, &names.quantity)?,
        price: column_index(&headers, &names.price)?,
        id,
    };

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = line_of(&record);

        let raw_date = cell(&record, layout.date);
        let date = parse_date(raw_date).ok_or_else(|| Error::InvalidDate {
            line,
            value: raw_date.to_string(),
        })?;
        let raw_quantity = cell(&record, layout.quantity);
        let quantity =
            parse_quantity(raw_quantity, options.decimal).ok_or_else(|| Error::InvalidNumber {
                line,
                column: names.quantity.clone(),
                value: raw_quantity.to_string(),
            })?;
        let raw_price = cell(&record, layout.price);
        let price =
            parse_decimal(raw_price, options.decimal).ok_or_else(|| Error::InvalidNumber {
                line,
                column: names.price.clone(),
                value: raw_price.to_string(),
            })?;
        let id = match layout.id {
            Some(idx) => {
                let raw = cell(&record, idx);
                Some(
                    CustomerProductId::parse(raw).ok_or_else(|| Error::InvalidNumber {
                        line,
                        column: names.id.clone(),
                        value: raw.to_string(),
                    })?,
                )
            }
            None => None,
        };

        rows.push(OrderRecord {
            line,
            id,
            customer: CustomerCode::from(cell(&record, layout.customer)),
            article: ArticleCode::from(cell(&record, layout.article)),
            date,
            quantity,
            price,
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    Ok(OrderTable::new(layout, rows))
}

fn writer_for<W: Write>(writer: W, delimiter: u8) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer)
}

/// Write an order table with its full header.
pub fn write_orders(path: &Path, table: &OrderTable, delimiter: u8) -> Result<()> {
    let mut wtr = writer_for(File::create(path)?, delimiter);
    wtr.write_record(&table.layout.columns)?;
    for row in &table.rows {
        wtr.write_record(row.render(&table.layout))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write one extracted series: date first, then the remaining columns.
pub fn write_series<W: Write>(
    writer: W,
    layout: &TableLayout,
    rows: &[OrderRecord],
    delimiter: u8,
) -> Result<()> {
    let mut wtr = writer_for(writer, delimiter);
    wtr.write_record(layout.series_header())?;
    for row in rows {
        wtr.write_record(row.render_series(layout))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read the label table written by the labeler.
pub fn read_labels(path: &Path, columns: &ColumnNames, delimiter: u8) -> Result<Vec<LabelRecord>> {
    read_labels_from(File::open(path)?, columns, delimiter)
}

/// Read a label table from any reader.
pub fn read_labels_from<R: Read>(
    reader: R,
    columns: &ColumnNames,
    delimiter: u8,
) -> Result<Vec<LabelRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let id_idx = column_index(&headers, &columns.id)?;
    let label_idx = column_index(&headers, &columns.label)?;

    let mut labels = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = line_of(&record);
        let raw_id = cell(&record, id_idx);
        let id = CustomerProductId::parse(raw_id).ok_or_else(|| Error::InvalidNumber {
            line,
            column: columns.id.clone(),
            value: raw_id.to_string(),
        })?;
        let raw_label = cell(&record, label_idx);
        let churned = parse_label(raw_label).ok_or_else(|| Error::InvalidLabel {
            line,
            value: raw_label.to_string(),
        })?;
        labels.push(LabelRecord { id, churned });
    }
    Ok(labels)
}

/// Write the label table; labels are rendered as `True`/`False`.
pub fn write_labels(
    path: &Path,
    labels: &[LabelRecord],
    columns: &ColumnNames,
    delimiter: u8,
) -> Result<()> {
    let mut wtr = writer_for(File::create(path)?, delimiter);
    wtr.write_record([columns.id.as_str(), columns.label.as_str()])?;
    for label in labels {
        let flag = if label.churned { "True" } else { "False" };
        wtr.write_record([label.id.to_string().as_str(), flag])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the ids dropped for having too few orders.
pub fn write_rejected(
    path: &Path,
    rejected: &[RejectedId],
    columns: &ColumnNames,
    delimiter: u8,
) -> Result<()> {
    let mut wtr = writer_for(File::create(path)?, delimiter);
    wtr.write_record([columns.id.as_str(), churn_common::schema::OCCURRENCES_COLUMN])?;
    for r in rejected {
        wtr.write_record([r.id.to_string(), r.occurrences.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_options(columns: &ColumnNames) -> ReadOptions<'_> {
        ReadOptions {
            columns,
            delimiter: b',',
            decimal: DecimalSeparator::Comma,
            require_id: false,
        }
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 5).unwrap();
        for raw in [
            "2020-01-05",
            "2020/01/05",
            "20200105",
            "05.01.2020",
            "2020-01-05 00:00:00",
            " 2020-01-05T00:00:00 ",
        ] {
            assert_eq!(parse_date(raw), Some(expected), "{raw}");
        }
        assert_eq!(parse_date("2020-13-01"), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2020-01-05 13:45:00"), None);
        assert_eq!(parse_date("05.01.2020 00:00:01"), None);
    }

    #[test]
    fn test_parse_decimal_comma_locale() {
        assert_eq!(parse_decimal("12,5", DecimalSeparator::Comma), Some(12.5));
        assert_eq!(parse_decimal("12.5", DecimalSeparator::Comma), Some(12.5));
        assert_eq!(parse_decimal("10", DecimalSeparator::Comma), Some(10.0));
        assert_eq!(parse_decimal("1.234,5", DecimalSeparator::Comma), None);
        assert_eq!(parse_decimal("1,2,3", DecimalSeparator::Comma), None);
        assert_eq!(parse_decimal("12,5", DecimalSeparator::Point), None);
        assert_eq!(parse_decimal("NaN", DecimalSeparator::Point), None);
    }

    #[test]
    fn test_parse_quantity_and_label() {
        assert_eq!(parse_quantity("3", DecimalSeparator::Comma), Some(3));
        assert_eq!(parse_quantity("3,0", DecimalSeparator::Comma), Some(3));
        assert_eq!(parse_quantity("-2", DecimalSeparator::Point), Some(-2));
        assert_eq!(parse_quantity("2.5", DecimalSeparator::Point), None);
        assert_eq!(parse_label("True"), Some(true));
        assert_eq!(parse_label("0"), Some(false));
        assert_eq!(parse_label("maybe"), None);
    }

    #[test]
    fn test_read_raw_orders_with_quoted_comma_prices() {
        let columns = ColumnNames::default();
        let csv = "KUNDNR,ARTNR,DOKDATUM,ANTAL,UTPRIS,LAGER\n\
                   1,9,2020-01-01,2,\"10,5\",north\n\
                   1,9,2020-01-05,1,12,south\n";
        let table = read_orders_from(csv.as_bytes(), &raw_options(&columns)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.layout.id, None);
        assert_eq!(table.rows[0].price, 10.5);
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[1].cells[5], "south");
    }

    #[test]
    fn test_missing_column_is_reported() {
        let columns = ColumnNames::default();
        let csv = "KUNDNR,ARTNR,DOKDATUM,ANTAL\n1,9,2020-01-01,2\n";
        let err = read_orders_from(csv.as_bytes(), &raw_options(&columns)).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column } if column == "UTPRIS"));
    }

    #[test]
    fn test_bad_date_reports_line() {
        let columns = ColumnNames::default();
        let csv = "KUNDNR,ARTNR,DOKDATUM,ANTAL,UTPRIS\n1,9,2020-01-01,2,1\n1,9,someday,2,1\n";
        let err = read_orders_from(csv.as_bytes(), &raw_options(&columns)).unwrap_err();
        match err {
            Error::InvalidDate { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "someday");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_time_of_day_is_invalid_date() {
        let columns = ColumnNames::default();
        let csv = "KUNDNR,ARTNR,DOKDATUM,ANTAL,UTPRIS\n1,9,2020-01-01 08:30:00,2,1\n";
        let err = read_orders_from(csv.as_bytes(), &raw_options(&columns)).unwrap_err();
        assert!(matches!(err, Error::InvalidDate { line: 2, .. }));
    }

    #[test]
    fn test_id_column_required_for_labeled_input() {
        let columns = ColumnNames::default();
        let csv = "KUNDNR,ARTNR,DOKDATUM,ANTAL,UTPRIS\n1,9,2020-01-01,2,1\n";
        let mut options = raw_options(&columns);
        options.require_id = true;
        assert!(matches!(
            read_orders_from(csv.as_bytes(), &options),
            Err(Error::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_read_labels_accepts_both_encodings() {
        let columns = ColumnNames::default();
        let csv = "user_product_id,label\n1,True\n2,0\n3,false\n";
        let labels = read_labels_from(csv.as_bytes(), &columns, b',').unwrap();
        let flags: Vec<(u64, bool)> = labels.iter().map(|l| (l.id.0, l.churned)).collect();
        assert_eq!(flags, vec![(1, true), (2, false), (3, false)]);

        let bad = "user_product_id,label\n1,perhaps\n";
        assert!(matches!(
            read_labels_from(bad.as_bytes(), &columns, b','),
            Err(Error::InvalidLabel { line: 2, .. })
        ));
    }

    #[test]
    fn test_write_series_layout() {
        use crate::table::test_support::*;
        let table = labeled_table(vec![order("c1", "a1", "2020-01-01", 2, 10.0)]);
        let mut out = Vec::new();
        write_series(&mut out, &table.layout, &table.rows, b',').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "DOKDATUM,user_product_id,KUNDNR,ARTNR,ANTAL,UTPRIS,LAGER\n\
             2020-01-01,1,c1,a1,2,10,north\n"
        );
    }
}
