//! Per-document verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{Document, PLACEHOLDER};

use super::consensus::{GroupConsensus, GroupIssue, MainCheck};

/// Issue text recorded for documents that could not be opened.
pub const CANNOT_OPEN: &str = "Cannot open PDF";

/// Overall document verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Every page carried the right identifier
    Match,
    /// At least one discrepancy
    Mismatch,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Match => f.write_str("match"),
            Status::Mismatch => f.write_str("mismatch"),
        }
    }
}

/// The (expected, decoded) pair reported for one supplemental group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementalSummary {
    /// Identifier the group is taken to carry
    pub expected: String,
    /// Distinct identifiers observed
    pub decoded: String,
}

impl SupplementalSummary {
    /// The `-`/`-` pair used when a cell has nothing to report.
    pub fn placeholder() -> Self {
        Self {
            expected: PLACEHOLDER.to_string(),
            decoded: PLACEHOLDER.to_string(),
        }
    }
}

/// Verdict for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// File name including extension
    pub filename: String,

    /// Hex MD5 of the file
    pub content_digest: String,

    /// Total pages (0 if the file could not be opened)
    pub total_pages: u32,

    /// Identifier derived from the file name
    pub expected_identifier: String,

    /// Majority identifier over the main section
    pub decoded_identifier: String,

    /// One pair per supplemental group
    pub supplemental: Vec<SupplementalSummary>,

    /// Main pages with the wrong identifier
    pub main_mismatches: Vec<u32>,

    /// Main pages with no identifier
    pub main_missing: Vec<u32>,

    /// Flagged supplemental groups, by group number
    pub supplemental_issues: Vec<(usize, GroupIssue)>,

    /// Overall verdict
    pub status: Status,

    /// Human-readable summary of every discrepancy, or `-`
    pub issue_detail: String,
}

impl ValidationReport {
    /// Assemble the verdict from the main-section check and group votes.
    pub fn assemble(
        document: &Document,
        decoded_identifier: Option<String>,
        main: MainCheck,
        groups: &[GroupConsensus],
    ) -> Self {
        let supplemental = if groups.is_empty() {
            vec![SupplementalSummary::placeholder()]
        } else {
            groups
                .iter()
                .map(|g| SupplementalSummary {
                    expected: g.expected.clone(),
                    decoded: g.decoded.clone(),
                })
                .collect()
        };

        let supplemental_issues: Vec<(usize, GroupIssue)> = groups
            .iter()
            .filter_map(|g| g.issue.clone().map(|issue| (g.group_index, issue)))
            .collect();

        let status = if main.is_clean() && supplemental_issues.is_empty() {
            Status::Match
        } else {
            Status::Mismatch
        };

        let issue_detail = issue_detail(&main, &supplemental_issues);

        Self {
            filename: document.filename.clone(),
            content_digest: document.content_digest.clone(),
            total_pages: document.page_count,
            expected_identifier: document.expected_identifier.clone(),
            decoded_identifier: decoded_identifier.unwrap_or_else(|| PLACEHOLDER.to_string()),
            supplemental,
            main_mismatches: main.mismatched,
            main_missing: main.missing,
            supplemental_issues,
            status,
            issue_detail,
        }
    }

    /// Verdict for a document that could not be opened.
    pub fn unopenable(document: &Document) -> Self {
        Self {
            filename: document.filename.clone(),
            content_digest: String::new(),
            total_pages: 0,
            expected_identifier: document.expected_identifier.clone(),
            decoded_identifier: String::new(),
            supplemental: Vec::new(),
            main_mismatches: Vec::new(),
            main_missing: Vec::new(),
            supplemental_issues: Vec::new(),
            status: Status::Mismatch,
            issue_detail: CANNOT_OPEN.to_string(),
        }
    }

    /// Check whether the document passed.
    pub fn is_match(&self) -> bool {
        self.status == Status::Match
    }

    /// Number of supplemental column pairs this report needs.
    pub fn supplemental_width(&self) -> usize {
        self.supplemental.len()
    }

    /// Flatten into a report row with `groups` supplemental pairs.
    ///
    /// Missing pairs are filled with `-`; `groups` must be at least
    /// [`supplemental_width`](Self::supplemental_width).
    pub fn to_row(&self, serial: u64, groups: usize) -> Vec<String> {
        let mut row = vec![
            serial.to_string(),
            self.filename.clone(),
            self.content_digest.clone(),
            self.total_pages.to_string(),
            self.expected_identifier.clone(),
            self.decoded_identifier.clone(),
        ];
        for i in 0..groups {
            match self.supplemental.get(i) {
                Some(pair) => {
                    row.push(pair.expected.clone());
                    row.push(pair.decoded.clone());
                }
                None => {
                    row.push(PLACEHOLDER.to_string());
                    row.push(PLACEHOLDER.to_string());
                }
            }
        }
        row.push(self.status.to_string());
        row.push(self.issue_detail.clone());
        row
    }
}

fn issue_detail(main: &MainCheck, supplemental: &[(usize, GroupIssue)]) -> String {
    let mut sections = Vec::new();
    if !main.mismatched.is_empty() {
        sections.push(format!("Main mismatches: {}", page_list(&main.mismatched)));
    }
    if !main.missing.is_empty() {
        sections.push(format!("Main missing: {}", page_list(&main.missing)));
    }
    if !supplemental.is_empty() {
        let entries: Vec<String> = supplemental
            .iter()
            .map(|(set, issue)| match issue {
                GroupIssue::AllMissing => format!("set {}: all missing", set),
                GroupIssue::Divergent { decoded } => format!("set {}: decoded {}", set, decoded),
            })
            .collect();
        sections.push(format!("Supp issues: [{}]", entries.join(", ")));
    }

    if sections.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        sections.join("; ")
    }
}

fn page_list(pages: &[u32]) -> String {
    let items: Vec<String> = pages.iter().map(u32::to_string).collect();
    format!("[{}]", items.join(", "))
}
