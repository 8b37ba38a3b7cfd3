use std::fmt;
use std::fmt::{Display, Formatter};

use crate::content::content_renderer::ProjectCard;

pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

/// Categories compare trimmed and lowercased, the form the admin stores.
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

impl CategoryFilter {
    pub fn parse(category: &str) -> Self {
        let category = normalize_category(category);
        match category.as_str() {
            "" | ALL_CATEGORIES => CategoryFilter::All,
            _ => CategoryFilter::Only(category),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => *selected == normalize_category(category),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub lines: [&'static str; 2],
}

impl Default for EmptyState {
    fn default() -> Self {
        EmptyState {
            lines: ["No projects in this category yet.", "Check back soon!"],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCard {
    pub card: ProjectCard,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub category: String,
    pub label: String,
    pub active: bool,
}

/// Category filter over the project cards that are already rendered.
#[derive(Debug, Default)]
pub struct FilterEngine {
    active: CategoryFilter,
    cards: Vec<FilterCard>,
    empty_state: Option<EmptyState>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the rendered cards and applies the current filter to them.
    pub fn mount(&mut self, cards: Vec<ProjectCard>) -> usize {
        self.cards = cards.into_iter()
            .map(|card| FilterCard { card, visible: true })
            .collect();
        self.recompute_visibility()
    }

    pub fn set_active_category(&mut self, category: CategoryFilter) -> usize {
        self.active = category;
        self.recompute_visibility()
    }

    pub fn recompute_visibility(&mut self) -> usize {
        self.empty_state = None;

        let mut visible_count = 0;
        for filter_card in self.cards.iter_mut() {
            filter_card.visible = self.active.matches(&filter_card.card.category);
            if filter_card.visible {
                visible_count += 1;
            }
        }

        if visible_count == 0 {
            self.empty_state = Some(EmptyState::default());
        }
        visible_count
    }

    pub fn active(&self) -> &CategoryFilter {
        &self.active
    }

    pub fn cards(&self) -> &[FilterCard] {
        &self.cards
    }

    pub fn visible_cards(&self) -> impl Iterator<Item = &ProjectCard> {
        self.cards.iter()
            .filter(|c| c.visible)
            .map(|c| &c.card)
    }

    pub fn empty_state(&self) -> Option<&EmptyState> {
        self.empty_state.as_ref()
    }

    /// The `all` button followed by one button per configured category.
    pub fn buttons(&self, categories: &[String]) -> Vec<FilterButton> {
        let mut buttons = vec![FilterButton {
            category: ALL_CATEGORIES.to_string(),
            label: "All".to_string(),
            active: self.active == CategoryFilter::All,
        }];

        for category in categories {
            buttons.push(FilterButton {
                category: category.clone(),
                label: capitalize(category),
                active: self.active.matches(category) && self.active != CategoryFilter::All,
            });
        }
        buttons
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
