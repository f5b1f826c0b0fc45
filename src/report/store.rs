//! CSV-backed report store.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::validate::ValidationReport;

use super::schema::ReportSchema;

/// File recording the path of the most recently used report.
pub const STATE_FILE: &str = "latest_report.txt";

/// Append-only report of validation verdicts.
///
/// The store owns the file: all writes go through `&mut self`, so one store
/// is one writer. Rows are cached in memory to answer
/// [`contains`](Self::contains) and to rewrite the file when the layout grows.
#[derive(Debug)]
pub struct ReportStore {
    path: PathBuf,
    schema: ReportSchema,
    rows: Vec<Vec<String>>,
}

impl ReportStore {
    /// Open a report, creating it with a bare header if it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let exists = fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false);
        if !exists {
            let store = Self {
                path,
                schema: ReportSchema::default(),
                rows: Vec::new(),
            };
            store.rewrite()?;
            return Ok(store);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;
        let mut records = reader.records();

        let header: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(String::from).collect(),
            None => Vec::new(),
        };
        let schema = ReportSchema::from_header(&header)?;

        let mut rows = Vec::new();
        for record in records {
            rows.push(record?.iter().map(String::from).collect());
        }

        log::debug!(
            "Opened report {} ({} rows, {} supplemental pairs)",
            path.display(),
            rows.len(),
            schema.supplemental_groups()
        );
        Ok(Self { path, schema, rows })
    }

    /// Open a report and record its path in the state file at `state_path`.
    ///
    /// Both files exist afterwards even if no document is ever appended.
    pub fn open_recorded<P: AsRef<Path>, Q: AsRef<Path>>(path: P, state_path: Q) -> Result<Self> {
        let store = Self::open(path)?;
        write_state_file(state_path, &store.path)?;
        Ok(store)
    }

    /// Path of the report file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current column layout.
    pub fn schema(&self) -> ReportSchema {
        self.schema
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the report has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows, without the header.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Check whether a document with this file name was already recorded.
    pub fn contains(&self, filename: &str) -> bool {
        let column = self.schema.filename_column();
        self.rows
            .iter()
            .any(|row| row.get(column).map(String::as_str) == Some(filename))
    }

    /// File names already recorded, in row order.
    pub fn filenames(&self) -> Vec<&str> {
        let column = self.schema.filename_column();
        self.rows
            .iter()
            .filter_map(|row| row.get(column).map(String::as_str))
            .collect()
    }

    /// Serial number the next row will get.
    pub fn next_serial(&self) -> u64 {
        self.rows.len() as u64 + 1
    }

    /// Append a verdict, widening the layout first if needed.
    ///
    /// Returns the row's serial number, or `None` if the file name is already
    /// in the report and nothing was written.
    pub fn append(&mut self, report: &ValidationReport) -> Result<Option<u64>> {
        if self.contains(&report.filename) {
            log::info!("{} already in report, not appending", report.filename);
            return Ok(None);
        }

        let required = report.supplemental_width().max(1);
        if required > self.schema.supplemental_groups() {
            let rows = std::mem::take(&mut self.rows);
            let (schema, rows) = self.schema.grow(rows, required);
            log::info!(
                "Widening report {} to {} supplemental pairs",
                self.path.display(),
                required
            );
            self.schema = schema;
            self.rows = rows;
            self.rewrite()?;
        }

        let serial = self.next_serial();
        let row = report.to_row(serial, self.schema.supplemental_groups());

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(file);
        writer.write_record(&row)?;
        writer.flush()?;

        self.rows.push(row);
        Ok(Some(serial))
    }

    fn rewrite(&self) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        writer.write_record(self.schema.header())?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Default report location for a folder: `<folder name>.csv` in the
/// current directory, or `pdf.csv` if the folder has no usable name.
pub fn default_report_path<P: AsRef<Path>>(folder: P) -> PathBuf {
    let folder = folder.as_ref();
    let resolved = fs::canonicalize(folder).unwrap_or_else(|_| folder.to_path_buf());
    let base = resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "pdf".to_string());
    PathBuf::from(format!("{}.csv", base))
}

/// Record which report was used last.
pub fn write_state_file<P: AsRef<Path>, Q: AsRef<Path>>(state_path: P, report_path: Q) -> Result<()> {
    fs::write(state_path, report_path.as_ref().to_string_lossy().as_bytes())?;
    Ok(())
}
