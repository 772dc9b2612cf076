//! Property-based tests for selection, reset, and response collection.

use std::collections::BTreeSet;

use proptest::prelude::*;

use sensory_survey::session::{Intent, Outcome, Session};
use sensory_survey::taxonomy::{self, CATEGORIES};
use sensory_survey::types::Answer;

#[derive(Debug, Clone)]
enum Step {
    Category(usize, bool),
    Term(usize, bool),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..CATEGORIES.len(), any::<bool>()).prop_map(|(i, on)| Step::Category(i, on)),
        (0usize..40, any::<bool>()).prop_map(|(i, on)| Step::Term(i, on)),
    ]
}

/// Turn an abstract step into an intent against the current session.
/// Term indices wrap around the available list.
fn intent_for(session: &Session, step: &Step) -> Option<Intent> {
    match step {
        Step::Category(i, included) => Some(Intent::ToggleCategory {
            name: CATEGORIES[*i].0.to_string(),
            included: *included,
        }),
        Step::Term(i, included) => {
            let available = session.selection().available_terms();
            if available.is_empty() {
                return None;
            }
            Some(Intent::ToggleTerm {
                term: available[i % available.len()].clone(),
                included: *included,
            })
        }
    }
}

fn include_category(session: Session, i: usize) -> Session {
    session
        .apply(Intent::ToggleCategory {
            name: CATEGORIES[i].0.to_string(),
            included: true,
        })
        .0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Chosen terms stay within the available terms after any toggle sequence.
    #[test]
    fn chosen_terms_are_always_available(steps in prop::collection::vec(step_strategy(), 0..30)) {
        let mut session = Session::new();
        for step in &steps {
            if let Some(intent) = intent_for(&session, step) {
                session = session.apply(intent).0;
            }
            let available = session.selection().available_terms();
            for term in session.selection().terms() {
                prop_assert!(available.contains(term), "{} not available", term);
            }
        }
    }

    /// Available terms depend only on which categories are chosen.
    #[test]
    fn available_terms_ignore_toggle_order(order in Just((0..CATEGORIES.len()).collect::<Vec<_>>()).prop_shuffle(),
                                           keep in 1..=CATEGORIES.len()) {
        let chosen = &order[..keep];
        let forward = chosen.iter().fold(Session::new(), |s, &i| include_category(s, i));
        let backward = chosen.iter().rev().fold(Session::new(), |s, &i| include_category(s, i));

        let a = forward.selection().available_terms();
        let b = backward.selection().available_terms();
        prop_assert_eq!(&a, &b);

        let unique = a.iter().collect::<BTreeSet<_>>().len();
        prop_assert_eq!(unique, a.len(), "duplicates in {:?}", a);

        let names: Vec<&str> = chosen.iter().map(|&i| CATEGORIES[i].0).collect();
        prop_assert_eq!(a, taxonomy::available_terms(&names));
    }

    /// Excluding then re-including a category always empties terms and responses.
    #[test]
    fn category_round_trip_resets(cat in 0..CATEGORIES.len(),
                                  picks in prop::collection::vec(0usize..40, 1..6),
                                  yes in any::<bool>()) {
        let mut session = include_category(Session::new(), cat);
        let available = session.selection().available_terms();
        for p in &picks {
            session = session.apply(Intent::ToggleTerm {
                term: available[p % available.len()].clone(),
                included: true,
            }).0;
        }
        let answer = if yes { Answer::Yes } else { Answer::No };
        for term in session.selection().terms().to_vec() {
            session = session.apply(Intent::SetDraftAnswer { term, answer }).0;
        }
        session = session.apply(Intent::Commit).0;
        prop_assert_eq!(session.collector().records().len(), 1);

        let name = CATEGORIES[cat].0.to_string();
        session = session.apply(Intent::ToggleCategory { name: name.clone(), included: false }).0;
        session = session.apply(Intent::ToggleCategory { name, included: true }).0;

        prop_assert!(session.selection().terms().is_empty());
        prop_assert!(session.collector().records().is_empty());
        prop_assert!(session.collector().draft().is_empty());
        prop_assert_eq!(session.collector().next_id(), 1);
        prop_assert_eq!(session.selection().available_terms(), available);
    }

    /// Commit succeeds exactly when the draft answers every chosen term and
    /// nothing else; ids then run 1, 2, 3, ... without gaps.
    #[test]
    fn commit_requires_exact_key_set(rounds in prop::collection::vec(prop::collection::vec(any::<Option<bool>>(), 3), 1..8)) {
        let mut session = include_category(Session::new(), 2);
        let terms: Vec<String> = session.selection().available_terms().into_iter().take(3).collect();
        for term in &terms {
            session = session.apply(Intent::ToggleTerm { term: term.clone(), included: true }).0;
        }

        let mut expected_id = 1;
        for round in rounds {
            for (term, choice) in terms.iter().zip(&round) {
                if let Some(yes) = choice {
                    let answer = if *yes { Answer::Yes } else { Answer::No };
                    session = session.apply(Intent::SetDraftAnswer { term: term.clone(), answer }).0;
                }
            }
            let complete = terms.iter().all(|t| session.collector().draft().contains_key(t));
            let (next, outcome) = session.apply(Intent::Commit);
            session = next;
            match outcome {
                Outcome::Recorded { respondent_id } => {
                    prop_assert!(complete);
                    prop_assert_eq!(respondent_id, expected_id);
                    expected_id += 1;
                }
                Outcome::Rejected(_) => prop_assert!(!complete),
                other => prop_assert!(false, "unexpected outcome {:?}", other),
            }
        }

        let ids: Vec<u32> = session.collector().records().iter().map(|r| r.respondent_id).collect();
        let expected: Vec<u32> = (1..expected_id).collect();
        prop_assert_eq!(ids, expected);
        for record in session.collector().records() {
            let keys: Vec<&String> = record.answers.keys().collect();
            let mut want: Vec<&String> = terms.iter().collect();
            want.sort();
            prop_assert_eq!(keys, want);
        }
    }
}
