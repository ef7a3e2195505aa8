//! Business search criteria and bulk selection.

use std::collections::BTreeSet;

use devlink_api_types::{Business, BusinessId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat record of optional search criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Country,
    City,
    Category,
    Search,
}

impl FilterField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::City => "city",
            Self::Category => "category",
            Self::Search => "search",
        }
    }
}

impl SearchFilters {
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let slot = match field {
            FilterField::Country => &mut self.country,
            FilterField::City => &mut self.city,
            FilterField::Category => &mut self.category,
            FilterField::Search => &mut self.search,
        };
        *slot = value.into();
    }

    /// Non-empty criteria in field order. Whitespace-only values count as empty.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        [
            (FilterField::Country, &self.country),
            (FilterField::City, &self.city),
            (FilterField::Category, &self.category),
            (FilterField::Search, &self.search),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| (field.key(), trimmed.to_string()))
        })
        .collect()
    }

    /// JSON object payload holding only the non-empty criteria.
    pub fn to_payload(&self) -> Value {
        let map = self
            .to_params()
            .into_iter()
            .map(|(key, value)| (key.to_string(), Value::String(value)))
            .collect::<Map<_, _>>();
        Value::Object(map)
    }

    pub fn is_empty(&self) -> bool {
        self.to_params().is_empty()
    }
}

/// Set of selected business ids for bulk actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<BusinessId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of a single id. Returns whether it is now selected.
    pub fn toggle(&mut self, id: BusinessId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Clear when everything in `results` is exactly the selection, otherwise
    /// select every result.
    pub fn toggle_all(&mut self, results: &[Business]) {
        let all = results.iter().map(|b| b.id).collect::<BTreeSet<_>>();
        if !all.is_empty() && self.ids == all {
            self.ids.clear();
        } else {
            self.ids = all;
        }
    }

    pub fn is_all_selected(&self, results: &[Business]) -> bool {
        !results.is_empty()
            && self.ids.len() == results.len()
            && results.iter().all(|b| self.ids.contains(&b.id))
    }

    pub fn contains(&self, id: BusinessId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = BusinessId> + '_ {
        self.ids.iter().copied()
    }

    /// Selected records in result order.
    pub fn pick<'a>(&self, results: &'a [Business]) -> Vec<&'a Business> {
        results.iter().filter(|b| self.ids.contains(&b.id)).collect()
    }

    /// Drop ids that are no longer part of `results`.
    pub fn retain_present(&mut self, results: &[Business]) {
        let present = results.iter().map(|b| b.id).collect::<BTreeSet<_>>();
        self.ids.retain(|id| present.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business(id: BusinessId) -> Business {
        Business {
            id,
            name: format!("Business {id}"),
            email: format!("b{id}@example.com"),
            phone: String::new(),
            website: String::new(),
            category: "restaurant".into(),
            country: "Italy".into(),
            city: "Pisa".into(),
            address: String::new(),
            created_at: None,
            rating: None,
            user_ratings_total: None,
        }
    }

    #[test]
    fn empty_fields_are_dropped_from_params() {
        let mut filters = SearchFilters::default();
        filters.set(FilterField::Country, "Italy");
        filters.set(FilterField::City, "");
        filters.set(FilterField::Search, "   ");

        assert_eq!(filters.to_params(), vec![("country", "Italy".to_string())]);
        assert_eq!(filters.to_payload(), serde_json::json!({"country": "Italy"}));
        assert!(SearchFilters::default().is_empty());
    }

    #[test]
    fn toggle_pair_restores_prior_selection() {
        let mut selection = Selection::new();
        selection.toggle(1);
        let before = selection.clone();

        assert!(selection.toggle(2));
        assert!(!selection.toggle(2));
        assert_eq!(selection, before);
        assert!(selection.contains(1));
    }

    #[test]
    fn toggle_all_twice_returns_to_empty() {
        let results = vec![business(1), business(2), business(3)];
        let mut selection = Selection::new();

        selection.toggle_all(&results);
        assert!(selection.is_all_selected(&results));
        assert_eq!(selection.len(), 3);

        selection.toggle_all(&results);
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_all_with_partial_selection_selects_everything() {
        let results = vec![business(1), business(2)];
        let mut selection = Selection::new();
        selection.toggle(2);

        selection.toggle_all(&results);
        assert_eq!(selection.ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn pick_keeps_result_order_and_retain_drops_stale_ids() {
        let results = vec![business(5), business(3)];
        let mut selection = Selection::new();
        selection.toggle(3);
        selection.toggle(5);
        selection.toggle(9);

        let picked = selection.pick(&results).iter().map(|b| b.id).collect::<Vec<_>>();
        assert_eq!(picked, vec![5, 3]);

        selection.retain_present(&results);
        assert_eq!(selection.len(), 2);
        assert!(!selection.contains(9));
    }
}
