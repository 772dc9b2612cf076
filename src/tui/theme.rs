//! Colors for the three tabs.
//!
//! - Green: fresh form, recorded response, はい
//! - Yellow: stale form, いいえ
//! - Red: an intent the session turned down
//! - Cyan: the tab strip
//! - Dark gray: placeholders, notes, key hints

use ratatui::style::{Color, Modifier, Style};

use crate::types::Answer;

// ============================================================================
// STATUS
// ============================================================================

/// Form matches the chosen terms; info notices.
pub const STYLE_OK: Style = Style::new().fg(Color::Green);

/// Form was generated for another term set.
pub const STYLE_STALE: Style = Style::new().fg(Color::Yellow);

pub const STYLE_REJECTED: Style = Style::new().fg(Color::Red);

/// Placeholders and display-only notes.
pub const STYLE_NOTE: Style = Style::new().fg(Color::DarkGray);

/// Respondent ids and counts.
pub const STYLE_COUNT: Style = Style::new().add_modifier(Modifier::BOLD);

// ============================================================================
// LAYOUT
// ============================================================================

pub const STYLE_HEADING: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

pub const STYLE_TAB: Style = Style::new().fg(Color::Cyan);
pub const STYLE_TAB_ACTIVE: Style = Style::new().fg(Color::Black).bg(Color::Cyan);

/// Focused row in a checklist or the draft.
pub const STYLE_CURSOR: Style = Style::new().add_modifier(Modifier::REVERSED);

pub const STYLE_KEYS: Style = Style::new().fg(Color::DarkGray);

// ============================================================================
// CHECKBOXES AND ANSWERS
// ============================================================================

pub const STYLE_CHECKED: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
pub const STYLE_UNCHECKED: Style = Style::new().fg(Color::DarkGray);

/// Style of a draft answer cell; unanswered terms look like empty boxes.
pub fn answer_style(answer: Option<Answer>) -> Style {
    match answer {
        Some(Answer::Yes) => STYLE_CHECKED,
        Some(Answer::No) => Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        None => STYLE_UNCHECKED,
    }
}

// ============================================================================
// TESTS
// ============================================================================
