//! Output tree of extracted series: one directory per label value.

use crate::codec::write_series;
use crate::table::{OrderRecord, TableLayout};
use churn_common::schema::{CHURNED_DIR, NOT_CHURNED_DIR};
use churn_common::{CustomerProductId, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes series files below `root/churned` and `root/not_churned`.
pub struct SeriesWriter<'a> {
    root: PathBuf,
    layout: &'a TableLayout,
    delimiter: u8,
    created: [bool; 2],
}

impl<'a> SeriesWriter<'a> {
    pub fn new(root: impl Into<PathBuf>, layout: &'a TableLayout, delimiter: u8) -> Self {
        Self {
            root: root.into(),
            layout,
            delimiter,
            created: [false; 2],
        }
    }

    /// Directory receiving series with the given label.
    pub fn partition_dir(&self, churned: bool) -> PathBuf {
        self.root
            .join(if churned { CHURNED_DIR } else { NOT_CHURNED_DIR })
    }

    fn ensure_dir(&mut self, churned: bool) -> Result<PathBuf> {
        let dir = self.partition_dir(churned);
        let slot = usize::from(churned);
        if !self.created[slot] {
            fs::create_dir_all(&dir)?;
            debug!(dir = %dir.display(), "partition directory ready");
            self.created[slot] = true;
        }
        Ok(dir)
    }

    /// Write `<partition>/<id>.csv` and return its path.
    pub fn write(
        &mut self,
        id: CustomerProductId,
        churned: bool,
        rows: &[OrderRecord],
    ) -> Result<PathBuf> {
        let path = self.ensure_dir(churned)?.join(format!("{id}.csv"));
        let file = BufWriter::new(File::create(&path)?);
        write_series(file, self.layout, rows, self.delimiter)?;
        Ok(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_support::*;
    use tempfile::tempdir;

    #[test]
    fn test_series_land_in_label_partitions() {
        let dir = tempdir().unwrap();
        let table = labeled_table(vec![order("c1", "a1", "2020-01-01", 2, 10.0)]);
        let mut writer = SeriesWriter::new(dir.path(), &table.layout, b',');

        let churned = writer
            .write(CustomerProductId(1), true, &table.rows)
            .unwrap();
        assert_eq!(churned, dir.path().join("churned").join("1.csv"));
        let kept = writer.write(CustomerProductId(2), false, &[]).unwrap();
        assert_eq!(kept, dir.path().join("not_churned").join("2.csv"));

        let empty = fs::read_to_string(kept).unwrap();
        assert_eq!(
            empty,
            "DOKDATUM,user_product_id,KUNDNR,ARTNR,ANTAL,UTPRIS,LAGER\n"
        );
        let content = fs::read_to_string(churned).unwrap();
        assert!(content.ends_with("2020-01-01,1,c1,a1,2,10,north\n"));
    }
}
