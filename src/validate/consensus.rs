//! Majority votes over decoded identifiers.
//!
//! Two independent votes are taken:
//!
//! - per supplemental group, over the *distinct* identifiers seen in the
//!   group, so every value counts once and the tie is broken by ascending
//!   lexicographic order;
//! - per document, over every main-section decode, ties broken by first
//!   occurrence in page order.
//!
//! Main-section correctness is not a vote: each page is compared against the
//! expected identifier directly (see [`check_main`]).

use serde::{Deserialize, Serialize};

use crate::model::{PageResult, PLACEHOLDER};

use super::classify::SupplementalGroup;

/// Why a supplemental group was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupIssue {
    /// No page in the group decoded anything
    AllMissing,
    /// The chosen identifier is not among the decoded values
    Divergent {
        /// Comma-joined decoded values
        decoded: String,
    },
}

/// Vote outcome for one supplemental group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConsensus {
    /// Group number (1-indexed)
    pub group_index: usize,

    /// Identifier the group is taken to carry, or `-`
    pub expected: String,

    /// Sorted distinct identifiers, comma-joined, or `-`
    pub decoded: String,

    /// Issue, if the group is flagged
    pub issue: Option<GroupIssue>,
}

impl GroupConsensus {
    /// Check whether the group was flagged.
    pub fn has_issue(&self) -> bool {
        self.issue.is_some()
    }
}

/// Per-page comparison of the main section against the expected identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainCheck {
    /// Pages whose identifier differs from the expected one
    pub mismatched: Vec<u32>,

    /// Pages where nothing was decoded
    pub missing: Vec<u32>,
}

impl MainCheck {
    /// Check whether every main page carried the expected identifier.
    pub fn is_clean(&self) -> bool {
        self.mismatched.is_empty() && self.missing.is_empty()
    }
}

/// Most frequent value, ties going to the value seen first.
pub fn majority<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&'a str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Vote on one supplemental group.
pub fn group_consensus(group: &SupplementalGroup) -> GroupConsensus {
    let distinct = group.distinct_identifiers();

    // Each distinct value counts once and they arrive sorted, so the vote
    // lands on the lexicographically smallest.
    let Some(expected) = majority(distinct.iter().map(String::as_str)).map(str::to_string) else {
        return GroupConsensus {
            group_index: group.group_index,
            expected: PLACEHOLDER.to_string(),
            decoded: PLACEHOLDER.to_string(),
            issue: Some(GroupIssue::AllMissing),
        };
    };

    let decoded = distinct.join(",");
    let issue = if distinct.contains(&expected) {
        None
    } else {
        Some(GroupIssue::Divergent {
            decoded: decoded.clone(),
        })
    };

    GroupConsensus {
        group_index: group.group_index,
        expected,
        decoded,
        issue,
    }
}

/// Document-level identifier: majority over the main pages that decoded.
pub fn document_identifier(main: &[PageResult]) -> Option<String> {
    majority(main.iter().filter_map(PageResult::identifier)).map(str::to_string)
}

/// Compare each main page against the expected identifier.
pub fn check_main(main: &[PageResult], expected: &str) -> MainCheck {
    let mut check = MainCheck::default();
    for page in main {
        match page.identifier() {
            None => check.missing.push(page.page_index),
            Some(id) if id != expected => check.mismatched.push(page.page_index),
            Some(_) => {}
        }
    }
    check
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(values: &[Option<&str>]) -> SupplementalGroup {
        SupplementalGroup {
            group_index: 1,
            first_page: 35,
            last_page: 34 + values.len() as u32,
            members: values
                .iter()
                .enumerate()
                .map(|(i, v)| PageResult::new(35 + i as u32, v.map(str::to_string)))
                .collect(),
        }
    }

    #[test]
    fn test_majority_tie_goes_to_first_seen() {
        assert_eq!(majority(["B", "A", "A", "B"]), Some("B"));
        assert_eq!(majority(["B", "A", "A"]), Some("A"));
        assert_eq!(majority(std::iter::empty()), None);
    }

    #[test]
    fn test_group_vote_uses_distinct_values() {
        let consensus = group_consensus(&group(&[
            Some("A123"),
            Some("A123"),
            Some("B999"),
            Some("A123"),
        ]));
        assert_eq!(consensus.expected, "A123");
        assert_eq!(consensus.decoded, "A123,B999");
        assert!(!consensus.has_issue());
    }

    #[test]
    fn test_group_vote_ignores_frequency() {
        // B999 is seen three times but each distinct value counts once
        let consensus = group_consensus(&group(&[
            Some("B999"),
            Some("B999"),
            Some("B999"),
            Some("A123"),
        ]));
        assert_eq!(consensus.expected, "A123");
        assert_eq!(consensus.decoded, "A123,B999");
        assert!(!consensus.has_issue());
    }

    #[test]
    fn test_group_all_missing() {
        let consensus = group_consensus(&group(&[None, None, None]));
        assert_eq!(consensus.expected, "-");
        assert_eq!(consensus.decoded, "-");
        assert_eq!(consensus.issue, Some(GroupIssue::AllMissing));
    }

    #[test]
    fn test_group_partial_missing_is_fine() {
        let consensus = group_consensus(&group(&[None, Some("c5"), None, None]));
        assert_eq!(consensus.expected, "C5");
        assert_eq!(consensus.decoded, "C5");
        assert!(!consensus.has_issue());
    }

    #[test]
    fn test_document_identifier() {
        let main = vec![
            PageResult::new(1, Some("X".into())),
            PageResult::new(2, Some("Y".into())),
            PageResult::missing(3),
            PageResult::new(4, Some("Y".into())),
        ];
        assert_eq!(document_identifier(&main), Some("Y".to_string()));
        assert_eq!(document_identifier(&main[..2]), Some("X".to_string()));
        assert_eq!(document_identifier(&[PageResult::missing(1)]), None);
    }

    #[test]
    fn test_check_main() {
        let main = vec![
            PageResult::new(1, Some("DOC007".into())),
            PageResult::new(2, Some("DOC0O7".into())),
            PageResult::missing(3),
        ];
        let check = check_main(&main, "DOC007");
        assert_eq!(check.mismatched, vec![2]);
        assert_eq!(check.missing, vec![3]);
        assert!(!check.is_clean());
        assert!(check_main(&main[..1], "DOC007").is_clean());
    }
}
