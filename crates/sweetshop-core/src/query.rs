//! # Query Engine
//!
//! Filtering and sorting over a snapshot of the collection.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /api/sweets/search?category=chocolate&max_price=3.20&sort=price    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  repository.list_all()          (or InventoryStore::get_all)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  filter(&sweets, &SearchFilter) ← predicates ANDed, order kept         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sort(&matches, field, order)   ← stable, case-insensitive strings     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither function mutates its input.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::types::{SearchFilter, SortField, SortOrder, Sweet, SweetQuery};

impl SearchFilter {
    /// True when `sweet` satisfies every present predicate.
    ///
    /// Blank `name` / `category` values impose no constraint, the same as
    /// an absent one.
    pub fn matches(&self, sweet: &Sweet) -> bool {
        if let Some(name) = non_blank(&self.name) {
            if !sweet.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = non_blank(&self.category) {
            if sweet.category != category {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if sweet.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if sweet.price > max {
                return false;
            }
        }
        true
    }

    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        non_blank(&self.name).is_none()
            && non_blank(&self.category).is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Returns the matching subsequence, preserving relative order.
pub fn filter(sweets: &[Sweet], predicates: &SearchFilter) -> Vec<Sweet> {
    sweets
        .iter()
        .filter(|sweet| predicates.matches(sweet))
        .cloned()
        .collect()
}

/// Returns a sorted copy.
///
/// `Vec::sort_by` is stable, and reversing the comparator (rather than the
/// output) keeps equal keys in their prior order for `Desc` as well.
pub fn sort(sweets: &[Sweet], field: SortField, order: SortOrder) -> Vec<Sweet> {
    let mut sorted = sweets.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_by(a, b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare_by(a: &Sweet, b: &Sweet, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
        SortField::Price => a.price.cmp(&b.price),
        SortField::InStock => a.in_stock.cmp(&b.in_stock),
    }
}

/// Runs a full search: filter, then sort when a sort field is given.
pub fn run(sweets: &[Sweet], query: &SweetQuery) -> Vec<Sweet> {
    let matches = filter(sweets, &query.filter());
    match query.sort {
        Some(field) => sort(&matches, field, query.order.unwrap_or_default()),
        None => matches,
    }
}

/// Distinct category labels, sorted.
pub fn categories(sweets: &[Sweet]) -> Vec<String> {
    sweets
        .iter()
        .map(|sweet| sweet.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::Utc;

    fn sweet(id: i64, name: &str, category: &str, cents: i64, in_stock: i64) -> Sweet {
        let now = Utc::now();
        Sweet {
            id,
            name: name.to_string(),
            category: category.to_string(),
            price: Money::from_cents(cents),
            in_stock,
            created_at: now,
            updated_at: now,
        }
    }

    fn fixture() -> Vec<Sweet> {
        vec![
            sweet(1, "Dark Chocolate Bar", "chocolate", 350, 10),
            sweet(2, "Milk Chocolate", "chocolate", 299, 15),
            sweet(3, "Gummy Bears", "candy", 199, 20),
            sweet(4, "lollipop", "candy", 100, 0),
            sweet(5, "Truffle Box", "chocolate", 450, 3),
        ]
    }

    fn names(sweets: &[Sweet]) -> Vec<&str> {
        sweets.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_name_filter_is_case_insensitive_substring() {
        let predicates = SearchFilter {
            name: Some("CHOCOLATE".to_string()),
            ..Default::default()
        };
        assert_eq!(
            names(&filter(&fixture(), &predicates)),
            vec!["Dark Chocolate Bar", "Milk Chocolate"]
        );
    }

    #[test]
    fn test_category_filter_is_exact() {
        let predicates = SearchFilter {
            category: Some("Chocolate".to_string()),
            ..Default::default()
        };
        assert!(filter(&fixture(), &predicates).is_empty());
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let predicates = SearchFilter {
            min_price: Some(Money::from_cents(200)),
            max_price: Some(Money::from_cents(400)),
            ..Default::default()
        };
        assert_eq!(
            names(&filter(&fixture(), &predicates)),
            vec!["Dark Chocolate Bar", "Milk Chocolate"]
        );

        let exact = SearchFilter {
            min_price: Some(Money::from_cents(199)),
            max_price: Some(Money::from_cents(199)),
            ..Default::default()
        };
        assert_eq!(names(&filter(&fixture(), &exact)), vec!["Gummy Bears"]);
    }

    #[test]
    fn test_predicates_are_anded() {
        let predicates = SearchFilter {
            category: Some("chocolate".to_string()),
            max_price: Some(Money::from_cents(320)),
            ..Default::default()
        };
        assert_eq!(names(&filter(&fixture(), &predicates)), vec!["Milk Chocolate"]);
    }

    #[test]
    fn test_blank_predicates_match_everything() {
        let predicates = SearchFilter {
            name: Some("  ".to_string()),
            category: Some(String::new()),
            ..Default::default()
        };
        assert!(predicates.is_empty());
        assert_eq!(filter(&fixture(), &predicates).len(), 5);
    }

    #[test]
    fn test_sort_strings_case_insensitive() {
        let sorted = sort(&fixture(), SortField::Name, SortOrder::Asc);
        assert_eq!(
            names(&sorted),
            vec![
                "Dark Chocolate Bar",
                "Gummy Bears",
                "lollipop",
                "Milk Chocolate",
                "Truffle Box"
            ]
        );
    }

    #[test]
    fn test_sort_numeric_desc() {
        let sorted = sort(&fixture(), SortField::InStock, SortOrder::Desc);
        let stock: Vec<i64> = sorted.iter().map(|s| s.in_stock).collect();
        assert_eq!(stock, vec![20, 15, 10, 3, 0]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let asc = sort(&fixture(), SortField::Category, SortOrder::Asc);
        let ids: Vec<i64> = asc.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 4, 1, 2, 5]);

        let desc = sort(&fixture(), SortField::Category, SortOrder::Desc);
        let ids: Vec<i64> = desc.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 5, 3, 4]);
    }

    #[test]
    fn test_sort_does_not_mutate_source() {
        let source = fixture();
        let before = source.clone();
        let sorted = sort(&source, SortField::Price, SortOrder::Asc);
        assert_eq!(source, before);
        assert_eq!(sorted.first().map(|s| s.id), Some(4));
    }

    #[test]
    fn test_run_filters_then_sorts() {
        let query = SweetQuery {
            category: Some("chocolate".to_string()),
            sort: Some(SortField::Price),
            order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(
            names(&run(&fixture(), &query)),
            vec!["Truffle Box", "Dark Chocolate Bar", "Milk Chocolate"]
        );
    }

    #[test]
    fn test_categories_sorted_unique() {
        assert_eq!(categories(&fixture()), vec!["candy", "chocolate"]);
        assert!(categories(&[]).is_empty());
    }
}
