//! Pure state transitions: (Screen, Action, &Session) → Transition.
//!
//! This is the core logic of the TUI. Fully testable without a terminal.
//! Each screen defines which actions it accepts. Unhandled actions
//! return the current screen unchanged (no-op). Survey changes are never
//! made here: they are described as intents for the session.

use crate::error::SurveyError;
use crate::session::{Intent, Outcome, Session};
use crate::taxonomy;
use crate::types::Answer;

use super::state::{Action, Effect, Notice, Pane, Screen, Transition};

/// Pure state transition function.
///
/// Given the current screen, an action, and a read-only view of the
/// session, produces the next transition. The effects boundary
/// interprets the result.
pub fn update(screen: Screen, action: &Action, session: &Session) -> Transition {
    match action {
        Action::Quit => return Transition::Quit,
        Action::NumberKey(n) => {
            if let Some(target) = tab_screen(*n) {
                return Transition::Screen(target);
            }
        }
        _ => {}
    }

    match screen {
        Screen::Settings { pane, cursor } => update_settings(pane, cursor, action, session),
        Screen::Form { scroll } => update_form(scroll, action, session),
        Screen::Data { cursor } => update_data(cursor, action, session),
    }
}

/// Screen for a 1-based tab number.
fn tab_screen(n: u8) -> Option<Screen> {
    match n {
        1 => Some(Screen::settings()),
        2 => Some(Screen::form()),
        3 => Some(Screen::data()),
        _ => None,
    }
}

fn step_down(cursor: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (cursor + 1).min(len - 1) }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

/// Settings: two checklists, generate, preview.
fn update_settings(pane: Pane, cursor: usize, action: &Action, session: &Session) -> Transition {
    let available = session.selection().available_terms();
    let len = match pane {
        Pane::Categories => taxonomy::CATEGORIES.len(),
        Pane::Terms => available.len(),
    };
    let stay = |cursor| Screen::Settings { pane, cursor };

    match action {
        Action::MoveUp => Transition::Screen(stay(cursor.saturating_sub(1))),
        Action::MoveDown => Transition::Screen(stay(step_down(cursor, len))),
        Action::SwitchPane => {
            let pane = match pane {
                Pane::Categories => Pane::Terms,
                Pane::Terms => Pane::Categories,
            };
            Transition::Screen(Screen::Settings { pane, cursor: 0 })
        }
        Action::Back => Transition::Screen(Screen::settings()),
        Action::ToggleSelection => {
            let intent = match pane {
                Pane::Categories => {
                    taxonomy::category_names()
                        .nth(cursor)
                        .map(|name| Intent::ToggleCategory {
                            name: name.to_string(),
                            included: !session.selection().is_category_chosen(name),
                        })
                }
                Pane::Terms => available.get(cursor).map(|term| Intent::ToggleTerm {
                    term: term.clone(),
                    included: !session.selection().is_term_chosen(term),
                }),
            };
            match intent {
                Some(intent) => Transition::Dispatch {
                    screen: stay(cursor),
                    intent,
                },
                None => Transition::Screen(stay(cursor)),
            }
        }
        Action::Generate => Transition::Dispatch {
            screen: stay(cursor),
            intent: Intent::Generate,
        },
        Action::Preview => Transition::Dispatch {
            screen: stay(cursor),
            intent: Intent::Preview,
        },
        _ => Transition::Screen(stay(cursor)),
    }
}

/// Form: scroll the generated source, regenerate, preview.
fn update_form(scroll: usize, action: &Action, session: &Session) -> Transition {
    let len = session.form().map(|doc| doc.html.lines().count()).unwrap_or(0);

    match action {
        Action::MoveUp => Transition::Screen(Screen::Form {
            scroll: scroll.saturating_sub(1),
        }),
        Action::MoveDown => Transition::Screen(Screen::Form {
            scroll: step_down(scroll, len),
        }),
        Action::Generate => Transition::Dispatch {
            screen: Screen::form(),
            intent: Intent::Generate,
        },
        Action::Preview => Transition::Dispatch {
            screen: Screen::Form { scroll },
            intent: Intent::Preview,
        },
        Action::Back => Transition::Screen(Screen::settings()),
        _ => Transition::Screen(Screen::Form { scroll }),
    }
}

/// Data: answer each chosen term, commit, export.
fn update_data(cursor: usize, action: &Action, session: &Session) -> Transition {
    let terms = session.selection().terms();
    let len = terms.len();
    let stay = Screen::Data { cursor };

    let answer = |answer: Answer, next: usize| match terms.get(cursor) {
        Some(term) => Transition::Dispatch {
            screen: Screen::Data { cursor: next },
            intent: Intent::SetDraftAnswer {
                term: term.clone(),
                answer,
            },
        },
        None => Transition::Screen(Screen::Data { cursor }),
    };

    match action {
        Action::MoveUp => Transition::Screen(Screen::Data {
            cursor: cursor.saturating_sub(1),
        }),
        Action::MoveDown => Transition::Screen(Screen::Data {
            cursor: step_down(cursor, len),
        }),
        // Answering advances to the next term
        Action::AnswerYes => answer(Answer::Yes, step_down(cursor, len)),
        Action::AnswerNo => answer(Answer::No, step_down(cursor, len)),
        Action::ToggleSelection => {
            let current = terms
                .get(cursor)
                .and_then(|term| session.collector().draft().get(term));
            let flipped = match current {
                Some(Answer::Yes) => Answer::No,
                _ => Answer::Yes,
            };
            answer(flipped, cursor)
        }
        Action::Commit => Transition::Dispatch {
            screen: Screen::data(),
            intent: Intent::Commit,
        },
        Action::Export => Transition::Effect {
            screen: stay,
            effect: Effect::Export,
        },
        Action::Back => Transition::Screen(Screen::settings()),
        _ => Transition::Screen(stay),
    }
}

// ============================================================================
// OUTCOME NOTICES
// ============================================================================

/// Status bar text for a session outcome. Requests are reported by the
/// effects layer once they have been carried out.
pub fn notice_for(outcome: &Outcome) -> Option<Notice> {
    match outcome {
        Outcome::Changed | Outcome::Request(_) => None,
        Outcome::Generated { questions } => Some(Notice::info(format!(
            "アンケートフォームを生成しました（{}問）。",
            questions
        ))),
        Outcome::Recorded { respondent_id } => Some(Notice::info(format!(
            "回答者ID {} の回答を記録しました。",
            respondent_id
        ))),
        Outcome::Rejected(err) => Some(Notice::error(rejection_text(err))),
    }
}

fn rejection_text(err: &SurveyError) -> String {
    match err {
        SurveyError::IncompleteDraft { missing, extra } => {
            let mut text = err.to_string();
            if !missing.is_empty() {
                text.push_str(&format!(" 未回答: {}", missing.join("、")));
            }
            if !extra.is_empty() {
                text.push_str(&format!(" 選択外: {}", extra.join("、")));
            }
            text
        }
        other => other.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
