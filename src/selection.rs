//! Selection manager: chosen categories and chosen terms.
//!
//! Transitions consume the old value and return the new one.
//! The cascading reset on category change is owned by the session;
//! here a category toggle only clears the chosen terms.

use tracing::warn;

use crate::taxonomy;
use crate::types::Term;

/// Which categories and terms the user has ticked.
///
/// Invariant: every chosen term belongs to `available_terms()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    categories: Vec<String>,
    terms: Vec<Term>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chosen category names, in the order they were ticked.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Chosen terms, in the order they were ticked.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_category_chosen(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    pub fn is_term_chosen(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    /// De-duplicated union of the chosen categories' terms.
    pub fn available_terms(&self) -> Vec<Term> {
        taxonomy::available_terms(&self.categories)
    }

    /// Include or exclude a category. Always clears the chosen terms,
    /// even when membership did not change.
    pub fn toggle_category(mut self, name: &str, included: bool) -> Self {
        if !taxonomy::is_category(name) {
            warn!(category = name, "ignoring unknown category");
        } else if included {
            if !self.is_category_chosen(name) {
                self.categories.push(name.to_string());
            }
        } else {
            self.categories.retain(|c| c != name);
        }
        self.terms.clear();
        self
    }

    /// Include or exclude a term. Terms outside the available set are
    /// ignored.
    pub fn toggle_term(mut self, term: &str, included: bool) -> Self {
        if !self.available_terms().iter().any(|t| t == term) {
            warn!(term, "ignoring term outside the chosen categories");
            return self;
        }
        if included {
            if !self.is_term_chosen(term) {
                self.terms.push(term.to_string());
            }
        } else {
            self.terms.retain(|t| t != term);
        }
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================
