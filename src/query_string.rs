use std::collections::HashMap;

use crate::filter_engine::CategoryFilter;

#[derive(PartialEq, Debug)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        QueryString {
            items,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    /// `?category=web` pre-selects a filter; absent means no change.
    pub fn get_category(&self) -> Option<CategoryFilter> {
        self.get("category").map(CategoryFilter::parse)
    }
}

/// The encoded `category=...` pair that `get_category` reads back.
pub fn category_query(category: &str) -> String {
    serde_urlencoded::to_string([("category", category)]).unwrap_or_default()
}
