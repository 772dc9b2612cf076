//! TUI state algebra: pure types, zero effects.
//!
//! Screen variants carry only per-screen transient state (pane focus,
//! cursor, scroll offset). The survey itself lives in the `Session`
//! owned by `App`; screens never copy it.

use std::path::PathBuf;

use crate::session::{Intent, Session};

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model.
#[derive(Debug)]
pub struct App {
    /// Current screen: carries per-screen navigation state.
    pub screen: Screen,

    /// Selection, form, and collected responses.
    pub session: Session,

    /// One-line message for the status bar. Cleared on the next key.
    pub notice: Option<Notice>,

    /// Directory exported spreadsheets are saved into.
    pub out_dir: PathBuf,

    /// Set to true when the app should exit on the next tick.
    pub should_quit: bool,
}

/// Status bar message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

// ============================================================================
// SCREENS
// ============================================================================

/// Which list has focus on the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Categories,
    Terms,
}

/// The current TUI screen. One per tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Category and term checklists.
    Settings { pane: Pane, cursor: usize },

    /// Generated questionnaire source.
    Form { scroll: usize },

    /// Draft entry for the respondent in progress plus recorded responses.
    Data { cursor: usize },
}

/// Default screen is Settings (used as placeholder during transitions).
impl Default for Screen {
    fn default() -> Self {
        Screen::settings()
    }
}

impl Screen {
    pub fn settings() -> Self {
        Screen::Settings {
            pane: Pane::Categories,
            cursor: 0,
        }
    }

    pub fn form() -> Self {
        Screen::Form { scroll: 0 }
    }

    pub fn data() -> Self {
        Screen::Data { cursor: 0 }
    }

    /// 1-based tab number shown in the title bar.
    pub fn tab(&self) -> u8 {
        match self {
            Screen::Settings { .. } => 1,
            Screen::Form { .. } => 2,
            Screen::Data { .. } => 3,
        }
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Move cursor up / scroll up.
    MoveUp,
    /// Move cursor down / scroll down.
    MoveDown,
    /// Toggle checkbox on current item, or flip the current answer.
    ToggleSelection,
    /// Switch focus between the category and term lists.
    SwitchPane,
    /// Jump to a tab by number (1-3).
    NumberKey(u8),
    /// Generate the questionnaire.
    Generate,
    /// Open the questionnaire in the system viewer.
    Preview,
    /// Answer the focused term with はい.
    AnswerYes,
    /// Answer the focused term with いいえ.
    AnswerNo,
    /// Commit the draft as a new record.
    Commit,
    /// Export recorded responses to a spreadsheet.
    Export,
    /// Navigate back.
    Back,
    /// Quit the application.
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
///
/// Follows the Elm/TEA pattern: pure code describes WHAT should happen,
/// effectful code decides HOW.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Render this screen (may be the same or a different screen).
    Screen(Screen),
    /// Render this screen and apply the intent to the session.
    Dispatch { screen: Screen, intent: Intent },
    /// Render this screen and execute a side effect.
    Effect { screen: Screen, effect: Effect },
    /// Quit the application.
    Quit,
}

/// Side effect requested by a pure transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Export with today's date. The clock is read by the effects layer.
    Export,
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl App {
    /// Fresh session on the settings screen.
    pub fn new(session: Session, out_dir: PathBuf) -> Self {
        App {
            screen: Screen::settings(),
            session,
            notice: None,
            out_dir,
            should_quit: false,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
