//! Splitting page results into the main section and supplemental groups.

use crate::model::PageResult;

use super::options::ValidationConfig;

/// A contiguous run of supplemental pages re-scanned from one physical item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplementalGroup {
    /// Group number (1-indexed)
    pub group_index: usize,

    /// First page covered by the group
    pub first_page: u32,

    /// Last page covered by the group (may exceed the document for a short final group)
    pub last_page: u32,

    /// Results for the pages of this group, in page order
    pub members: Vec<PageResult>,
}

impl SupplementalGroup {
    /// Distinct decoded identifiers, sorted ascending.
    pub fn distinct_identifiers(&self) -> Vec<String> {
        let mut values: Vec<String> = self
            .members
            .iter()
            .filter_map(|p| p.decoded.clone())
            .collect();
        values.sort();
        values.dedup();
        values
    }
}

/// A document's page results split by section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Pages `1..=main_page_count`
    pub main: Vec<PageResult>,

    /// Supplemental groups in page order
    pub groups: Vec<SupplementalGroup>,
}

/// Partitions page results using the configured section sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageClassifier {
    main_page_count: u32,
    suppl_set_size: u32,
}

impl PageClassifier {
    /// Create a classifier. A set size of 0 is treated as 1.
    pub fn new(main_page_count: u32, suppl_set_size: u32) -> Self {
        Self {
            main_page_count,
            suppl_set_size: suppl_set_size.max(1),
        }
    }

    /// Create a classifier from validation options.
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(config.main_page_count, config.suppl_set_size)
    }

    /// Check whether a page belongs to the main section.
    pub fn is_main(&self, page_index: u32) -> bool {
        page_index <= self.main_page_count
    }

    /// Number of supplemental groups for a document of `page_count` pages.
    pub fn group_count(&self, page_count: u32) -> usize {
        let extra = page_count.saturating_sub(self.main_page_count);
        extra.div_ceil(self.suppl_set_size) as usize
    }

    /// Split results into the main section and supplemental groups.
    ///
    /// Results may arrive in any order; each lands in exactly one section.
    pub fn classify(&self, page_count: u32, results: &[PageResult]) -> Classification {
        let mut ordered = results.to_vec();
        ordered.sort_by_key(|r| r.page_index);

        let (main, supplemental): (Vec<PageResult>, Vec<PageResult>) =
            ordered.into_iter().partition(|r| self.is_main(r.page_index));

        let groups = (0..self.group_count(page_count))
            .map(|i| {
                let first_page = self.main_page_count + 1 + i as u32 * self.suppl_set_size;
                let last_page = first_page + self.suppl_set_size - 1;
                let members = supplemental
                    .iter()
                    .filter(|r| (first_page..=last_page).contains(&r.page_index))
                    .cloned()
                    .collect();
                SupplementalGroup {
                    group_index: i + 1,
                    first_page,
                    last_page,
                    members,
                }
            })
            .collect();

        Classification { main, groups }
    }
}
