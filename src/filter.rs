//! Search, selection and "load more" paging over an already listed catalog.
use serde::Deserialize;

use crate::models::Ingredient;

/// Records revealed per "load more" step.
pub(crate) const PAGE_SIZE: usize = 12;

const SELECT_ALL: &str = "all";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    pub q: Option<String>,
    pub filter: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl ListParams {
    pub(crate) fn is_empty(&self) -> bool {
        self.q.is_none() && self.filter.is_none() && self.page.is_none() && self.limit.is_none()
    }

    /// `limit` wins over `page`; neither means no truncation.
    pub(crate) fn visible_limit(&self) -> Option<usize> {
        self.limit.or_else(|| self.page.map(page_limit))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Selection {
    All,
    Named(String),
}

impl Selection {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some(SELECT_ALL) => Selection::All,
            Some(name) => Selection::Named(name.to_string()),
        }
    }

    fn matches(&self, record: &Ingredient) -> bool {
        match self {
            Selection::All => true,
            // exact category, or a nutrient name ignoring case
            Selection::Named(name) => {
                let lowered = name.to_lowercase();
                record.category_str() == name
                    || record
                        .nutrients
                        .iter()
                        .any(|n| n.name.to_lowercase() == lowered)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CatalogFilter {
    search: String,
    selection: Selection,
}

impl CatalogFilter {
    pub(crate) fn new(search: &str, selection: Selection) -> Self {
        Self {
            search: search.to_lowercase(),
            selection,
        }
    }

    pub(crate) fn from_params(params: &ListParams) -> Self {
        Self::new(
            params.q.as_deref().unwrap_or(""),
            Selection::parse(params.filter.as_deref()),
        )
    }

    // substring of title, category or any nutrient name, ignoring case
    fn matches_search(&self, record: &Ingredient) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.as_str();
        record.title.to_lowercase().contains(needle)
            || record.category_str().to_lowercase().contains(needle)
            || record
                .nutrients
                .iter()
                .any(|n| n.name.to_lowercase().contains(needle))
    }

    pub(crate) fn matches(&self, record: &Ingredient) -> bool {
        self.matches_search(record) && self.selection.matches(record)
    }

    pub(crate) fn apply(&self, records: Vec<Ingredient>) -> Vec<Ingredient> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Number of records shown after `pages` "load more" steps.
pub(crate) fn page_limit(pages: usize) -> usize {
    pages.max(1).saturating_mul(PAGE_SIZE)
}

pub(crate) fn visible(mut records: Vec<Ingredient>, limit: usize) -> Vec<Ingredient> {
    records.truncate(limit);
    records
}
