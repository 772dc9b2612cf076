//! Fixed evaluation taxonomy: category name → ordered term list.
//!
//! Pure data and pure lookups. No I/O.
//!
//! Available terms follow the declaration order below, not the order in
//! which categories were ticked. Ticking 温冷感 before 硬軟感 still lists
//! 硬い first.

use crate::types::Term;

/// Evaluation categories in display order.
///
/// Terms may appear in more than one category; `available_terms`
/// collapses duplicates.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "硬軟感",
        &[
            "硬い",
            "柔らかい",
            "弾力がある",
            "もっちりしている",
            "ふかふかしている",
            "ゴツゴツしている",
            "しなやか",
        ],
    ),
    (
        "粗滑感",
        &[
            "粗い",
            "滑らか",
            "ザラザラしている",
            "ツルツルしている",
            "ヌルヌルしている",
            "サラサラしている",
        ],
    ),
    ("摩擦感", &["摩擦が大きい", "摩擦が小さい", "引っかかる", "滑る"]),
    (
        "温冷感",
        &[
            "温かい",
            "冷たい",
            "ひんやりする",
            "じんわり温かい",
            "熱い",
            "冷え冷えする",
        ],
    ),
    ("高級感", &["高級感がある", "安っぽい", "上品", "重厚感がある", "繊細"]),
];

/// All category names in display order.
pub fn category_names() -> impl Iterator<Item = &'static str> {
    CATEGORIES.iter().map(|(name, _)| *name)
}

/// Terms of a single category, or `None` for an unknown name.
pub fn terms_of(category: &str) -> Option<&'static [&'static str]> {
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, terms)| *terms)
}

/// Whether `category` names a known category.
pub fn is_category(category: &str) -> bool {
    terms_of(category).is_some()
}

/// De-duplicated union of the terms of every chosen category.
///
/// Categories are visited in declaration order, so the result depends
/// only on which categories are chosen, not on the order they were
/// chosen in. Within a category, term order is preserved; a term seen
/// earlier is skipped.
pub fn available_terms<S: AsRef<str>>(chosen: &[S]) -> Vec<Term> {
    let mut out: Vec<Term> = Vec::new();
    for (name, terms) in CATEGORIES {
        if !chosen.iter().any(|c| c.as_ref() == *name) {
            continue;
        }
        for term in terms.iter() {
            if !out.iter().any(|t| t == term) {
                out.push((*term).to_string());
            }
        }
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_categories_in_order() {
        let names: Vec<_> = category_names().collect();
        assert_eq!(names, vec!["硬軟感", "粗滑感", "摩擦感", "温冷感", "高級感"]);
    }

    #[test]
    fn terms_of_known_and_unknown() {
        assert_eq!(terms_of("摩擦感").map(|t| t.len()), Some(4));
        assert!(terms_of("味覚").is_none());
        assert!(is_category("高級感"));
        assert!(!is_category(""));
    }

    #[test]
    fn available_terms_single_category() {
        let terms = available_terms(&["硬軟感"]);
        assert_eq!(
            terms,
            vec![
                "硬い",
                "柔らかい",
                "弾力がある",
                "もっちりしている",
                "ふかふかしている",
                "ゴツゴツしている",
                "しなやか",
            ]
        );
    }

    #[test]
    fn available_terms_empty_when_nothing_chosen() {
        let none: [&str; 0] = [];
        assert!(available_terms(&none).is_empty());
    }

    #[test]
    fn available_terms_ignores_choice_order() {
        let a = available_terms(&["温冷感", "硬軟感"]);
        let b = available_terms(&["硬軟感", "温冷感"]);
        assert_eq!(a, b);
        assert_eq!(a.first().map(String::as_str), Some("硬い"));
    }

    #[test]
    fn available_terms_ignores_unknown_names() {
        assert_eq!(
            available_terms(&["摩擦感", "味覚"]),
            vec!["摩擦が大きい", "摩擦が小さい", "引っかかる", "滑る"]
        );
    }

    #[test]
    fn available_terms_has_no_duplicates_for_all_categories() {
        let all: Vec<&str> = category_names().collect();
        let terms = available_terms(&all);
        let mut sorted = terms.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), terms.len());
    }
}
