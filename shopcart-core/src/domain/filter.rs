//! Product filter domain model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, CatalogItem, Category};
use super::result::Error;

/// Category selector: everything, or a single category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Electronics,
    Clothing,
    Cosmetics,
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Electronics => category == Category::Electronics,
            CategoryFilter::Clothing => category == Category::Clothing,
            CategoryFilter::Cosmetics => category == Category::Cosmetics,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Electronics => "electronics",
            CategoryFilter::Clothing => "clothing",
            CategoryFilter::Cosmetics => "cosmetics",
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        match category {
            Category::Electronics => CategoryFilter::Electronics,
            Category::Clothing => CategoryFilter::Clothing,
            Category::Cosmetics => CategoryFilter::Cosmetics,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<Category>().map(CategoryFilter::from)
    }
}

/// Current search inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_term: String,
    pub category: CategoryFilter,
}

impl FilterState {
    pub fn new(search_term: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search_term: search_term.into(),
            category,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Restore the empty search and the `all` category
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.category.matches(item.category)
            && item
                .name
                .to_lowercase()
                .contains(&self.search_term.to_lowercase())
    }
}

/// Catalog items visible under `filter`, in catalog order
pub fn compute_visible<'a>(catalog: &'a Catalog, filter: &FilterState) -> Vec<&'a CatalogItem> {
    catalog
        .items()
        .iter()
        .filter(|item| filter.matches(item))
        .collect()
}
