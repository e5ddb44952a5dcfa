//! Catalog domain model
//!
//! The catalog is fixed at process start and never mutated.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::result::Error;

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Cosmetics,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Cosmetics => "cosmetics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electronics" => Ok(Category::Electronics),
            "clothing" => Ok(Category::Clothing),
            "cosmetics" => Ok(Category::Cosmetics),
            other => Err(Error::validation(format!("unknown category '{}'", other))),
        }
    }
}

/// A purchasable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub price: Decimal,
    pub category: Category,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, price: Decimal, category: Category) -> Self {
        Self {
            name: name.into(),
            price,
            category,
        }
    }
}

/// Read-only list of purchasable items, unique by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate names and negative prices
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, Error> {
        for (i, item) in items.iter().enumerate() {
            if item.price < Decimal::ZERO {
                return Err(Error::validation(format!(
                    "price of '{}' cannot be negative",
                    item.name
                )));
            }
            if items[..i].iter().any(|other| other.name == item.name) {
                return Err(Error::validation(format!(
                    "duplicate catalog item '{}'",
                    item.name
                )));
            }
        }
        Ok(Self { items })
    }

    /// The store's built-in product list
    pub fn builtin() -> Self {
        Self {
            items: vec![
                CatalogItem::new("Phone", Decimal::new(799, 0), Category::Electronics),
                CatalogItem::new("Headphones", Decimal::new(199, 0), Category::Electronics),
                CatalogItem::new("T-Shirt", Decimal::new(20, 0), Category::Clothing),
                CatalogItem::new("Jeans", Decimal::new(30, 0), Category::Clothing),
                CatalogItem::new("sunscreen", Decimal::new(15, 0), Category::Cosmetics),
                CatalogItem::new("moisturizer", Decimal::new(10, 0), Category::Cosmetics),
            ],
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Exact lookup by name
    pub fn get(&self, name: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Exact lookup, falling back to a case-insensitive match
    pub fn find(&self, name: &str) -> Option<&CatalogItem> {
        let name = name.trim();
        self.get(name).or_else(|| {
            let lower = name.to_lowercase();
            self.items.iter().find(|item| item.name.to_lowercase() == lower)
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get("Phone").unwrap().price, Decimal::new(799, 0));
        assert_eq!(catalog.get("Jeans").unwrap().category, Category::Clothing);
    }

    #[test]
    fn test_find_falls_back_to_case_insensitive() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.find("t-shirt").unwrap().name, "T-Shirt");
        assert_eq!(catalog.find(" Sunscreen ").unwrap().name, "sunscreen");
        assert!(catalog.get("t-shirt").is_none());
        assert!(catalog.find("laptop").is_none());
    }

    #[test]
    fn test_catalog_rejects_duplicates_and_negative_prices() {
        let dup = Catalog::new(vec![
            CatalogItem::new("Phone", Decimal::new(1, 0), Category::Electronics),
            CatalogItem::new("Phone", Decimal::new(2, 0), Category::Electronics),
        ]);
        assert!(dup.is_err());

        let negative = Catalog::new(vec![CatalogItem::new(
            "Refund",
            Decimal::new(-5, 0),
            Category::Clothing,
        )]);
        assert!(negative.is_err());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Clothing".parse::<Category>().unwrap(), Category::Clothing);
        assert_eq!(Category::Cosmetics.to_string(), "cosmetics");
        assert!("toys".parse::<Category>().is_err());
    }
}
