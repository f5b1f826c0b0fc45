//! Report column layout.

use crate::error::{Error, Result};
use crate::model::PLACEHOLDER;

/// Leading columns, in order.
pub const BASE_COLUMNS: [&str; 6] = [
    "s.no",
    "filename",
    "md5",
    "total_pages",
    "expected_barcode",
    "decoded_barcode",
];

/// Columns that always close a row.
pub const TRAILING_COLUMNS: [&str; 2] = ["status", "issue"];

const SUPP_EXPECTED_PREFIX: &str = "supp_expected_barcode_";
const SUPP_DECODED_PREFIX: &str = "supp_decoded_barcode_";

/// Column layout of a report, versioned by its supplemental pair count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSchema {
    supplemental_groups: usize,
}

impl ReportSchema {
    /// Layout with `supplemental_groups` column pairs.
    pub fn new(supplemental_groups: usize) -> Self {
        Self {
            supplemental_groups,
        }
    }

    /// Number of supplemental column pairs.
    pub fn supplemental_groups(&self) -> usize {
        self.supplemental_groups
    }

    /// Total number of columns.
    pub fn width(&self) -> usize {
        BASE_COLUMNS.len() + 2 * self.supplemental_groups + TRAILING_COLUMNS.len()
    }

    /// Index of the `filename` column.
    pub fn filename_column(&self) -> usize {
        1
    }

    /// Header row.
    pub fn header(&self) -> Vec<String> {
        let mut header: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
        for i in 1..=self.supplemental_groups {
            header.push(format!("{}{}", SUPP_EXPECTED_PREFIX, i));
            header.push(format!("{}{}", SUPP_DECODED_PREFIX, i));
        }
        header.extend(TRAILING_COLUMNS.iter().map(|c| c.to_string()));
        header
    }

    /// Recover the layout from an existing header row.
    ///
    /// The pair count is the highest `supp_expected_barcode_N` index found.
    pub fn from_header(header: &[String]) -> Result<Self> {
        if header.first().map(String::as_str) != Some(BASE_COLUMNS[0])
            || header.get(1).map(String::as_str) != Some(BASE_COLUMNS[1])
        {
            return Err(Error::InvalidReport(format!(
                "unexpected header: {}",
                header.join(",")
            )));
        }

        let groups = header
            .iter()
            .filter_map(|column| column.strip_prefix(SUPP_EXPECTED_PREFIX))
            .filter_map(|index| index.parse::<usize>().ok())
            .max()
            .unwrap_or(0);
        Ok(Self::new(groups))
    }

    /// Widen the layout to at least `required` pairs.
    ///
    /// Rows written under this layout get `-` pairs inserted before the
    /// trailing `status, issue` columns, so every existing value keeps its
    /// column. Rows of any other width are padded or cut to the new width.
    /// The layout never shrinks.
    pub fn grow(&self, rows: Vec<Vec<String>>, required: usize) -> (Self, Vec<Vec<String>>) {
        if required <= self.supplemental_groups {
            return (*self, rows);
        }

        let grown = Self::new(required);
        let insert_at = BASE_COLUMNS.len() + 2 * self.supplemental_groups;
        let added = 2 * (required - self.supplemental_groups);

        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() == self.width() {
                    row.splice(
                        insert_at..insert_at,
                        std::iter::repeat(PLACEHOLDER.to_string()).take(added),
                    );
                } else {
                    log::warn!(
                        "Report row has {} columns, expected {}; padding to {}",
                        row.len(),
                        self.width(),
                        grown.width()
                    );
                    row.resize(grown.width(), PLACEHOLDER.to_string());
                }
                row
            })
            .collect();

        (grown, rows)
    }
}
