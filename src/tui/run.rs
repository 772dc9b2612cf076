//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui,
//! applies intents to the session, and carries out the session's
//! requests through `platform`.

use std::io;
use std::path::PathBuf;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use humansize::{format_size, BINARY};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use crate::platform;
use crate::session::{Intent, Outcome, Request, Session};

use super::state::{Action, App, Effect, Notice, Transition};
use super::update::{notice_for, update};
use super::view::render;

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            Some(Action::SwitchPane)
        }
        KeyCode::Char('h') | KeyCode::Char('l') => Some(Action::SwitchPane),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char(c @ '1'..='3') => Some(Action::NumberKey(c as u8 - b'0')),

        // Selection
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::ToggleSelection),

        // Survey actions
        KeyCode::Char('g') => Some(Action::Generate),
        KeyCode::Char('p') => Some(Action::Preview),
        KeyCode::Char('y') => Some(Action::AnswerYes),
        KeyCode::Char('n') => Some(Action::AnswerNo),
        KeyCode::Char('c') => Some(Action::Commit),
        KeyCode::Char('e') => Some(Action::Export),

        KeyCode::Char('q') => Some(Action::Quit),

        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the interactive session until the user quits.
///
/// Exported spreadsheets are written into `out_dir`.
pub fn run(session: Session, out_dir: PathBuf) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let mut app = App::new(session, out_dir);
    info!(out_dir = %app.out_dir.display(), "tui started");

    let result = event_loop(&mut terminal, &mut app);

    restore_terminal()?;
    info!(
        records = app.session.collector().records().len(),
        "tui stopped"
    );
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Only key presses; releases and repeats on some platforms double up
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(action) = map_key(key) else {
            continue;
        };

        app.notice = None;
        let screen = std::mem::take(&mut app.screen);
        match update(screen, &action, &app.session) {
            Transition::Screen(screen) => {
                app.screen = screen;
            }
            Transition::Dispatch { screen, intent } => {
                app.screen = screen;
                dispatch(app, intent);
            }
            Transition::Effect { screen, effect } => {
                app.screen = screen;
                handle_effect(effect, app);
            }
            Transition::Quit => {
                app.should_quit = true;
            }
        }
    }
}

// ============================================================================
// SESSION DISPATCH
// ============================================================================

/// Apply an intent to the session and act on the outcome.
fn dispatch(app: &mut App, intent: Intent) {
    let session = std::mem::take(&mut app.session);
    let (session, outcome) = session.apply(intent);
    app.session = session;
    app.notice = notice_for(&outcome);
    if let Outcome::Request(request) = outcome {
        handle_request(request, app);
    }
}

// ============================================================================
// EFFECT HANDLING
// ============================================================================

/// Handle a side effect requested by a pure transition.
fn handle_effect(effect: Effect, app: &mut App) {
    match effect {
        Effect::Export => {
            let date = Local::now().date_naive();
            dispatch(app, Intent::Export { date });
        }
    }
}

/// Carry out a request from the session. Failures become notices.
fn handle_request(request: Request, app: &mut App) {
    match request {
        Request::OpenDocument(html) => match platform::open_document(&html) {
            Ok(path) => {
                app.notice = Some(Notice::info(format!(
                    "プレビューを開きました: {}",
                    path.display()
                )));
            }
            Err(e) => {
                error!(error = %e, "failed to open preview");
                app.notice = Some(Notice::error(format!("プレビューを開けませんでした: {}", e)));
            }
        },
        Request::SaveFile(artifact) => match platform::save_artifact(&app.out_dir, &artifact) {
            Ok(path) => {
                app.notice = Some(Notice::info(format!(
                    "{}件を保存しました: {} ({})",
                    artifact.rows,
                    path.display(),
                    format_size(artifact.bytes.len(), BINARY)
                )));
            }
            Err(e) => {
                error!(error = %e, "failed to save export");
                app.notice = Some(Notice::error(format!("保存に失敗しました: {}", e)));
            }
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Answer;
    use crate::tui::state::NoticeKind;
    use tempfile::tempdir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_maps_to_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Action::Quit));
    }

    #[test]
    fn plain_c_maps_to_commit() {
        assert_eq!(map_key(press(KeyCode::Char('c'))), Some(Action::Commit));
    }

    #[test]
    fn vim_keys_map_to_movement() {
        assert_eq!(map_key(press(KeyCode::Char('j'))), Some(Action::MoveDown));
        assert_eq!(map_key(press(KeyCode::Char('k'))), Some(Action::MoveUp));
    }

    #[test]
    fn arrow_keys_map_to_movement() {
        assert_eq!(map_key(press(KeyCode::Up)), Some(Action::MoveUp));
        assert_eq!(map_key(press(KeyCode::Down)), Some(Action::MoveDown));
    }

    #[test]
    fn tab_switches_pane() {
        assert_eq!(map_key(press(KeyCode::Tab)), Some(Action::SwitchPane));
    }

    #[test]
    fn space_and_enter_toggle() {
        assert_eq!(map_key(press(KeyCode::Char(' '))), Some(Action::ToggleSelection));
        assert_eq!(map_key(press(KeyCode::Enter)), Some(Action::ToggleSelection));
    }

    #[test]
    fn answer_keys() {
        assert_eq!(map_key(press(KeyCode::Char('y'))), Some(Action::AnswerYes));
        assert_eq!(map_key(press(KeyCode::Char('n'))), Some(Action::AnswerNo));
    }

    #[test]
    fn number_keys_map_to_tabs() {
        for n in 1..=3u8 {
            let key = press(KeyCode::Char((b'0' + n) as char));
            assert_eq!(map_key(key), Some(Action::NumberKey(n)));
        }
        assert_eq!(map_key(press(KeyCode::Char('4'))), None);
    }

    #[test]
    fn unmapped_key_returns_none() {
        assert_eq!(map_key(press(KeyCode::Char('z'))), None);
    }

    #[test]
    fn esc_maps_to_back() {
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Action::Back));
    }

    // -- Dispatch (no terminal needed) --

    fn app_with_record(dir: PathBuf) -> App {
        let mut app = App::new(Session::new(), dir);
        for intent in [
            Intent::ToggleCategory {
                name: "温冷感".into(),
                included: true,
            },
            Intent::ToggleTerm {
                term: "冷たい".into(),
                included: true,
            },
            Intent::SetDraftAnswer {
                term: "冷たい".into(),
                answer: Answer::No,
            },
            Intent::Commit,
        ] {
            dispatch(&mut app, intent);
        }
        app
    }

    #[test]
    fn dispatch_sets_notice_from_outcome() {
        let dir = tempdir().unwrap();
        let app = app_with_record(dir.path().to_path_buf());
        let notice = app.notice.unwrap();
        assert_eq!(notice.kind, NoticeKind::Info);
        assert!(notice.text.contains("回答者ID 1"));
    }

    #[test]
    fn rejected_commit_sets_error_notice() {
        let dir = tempdir().unwrap();
        let mut app = app_with_record(dir.path().to_path_buf());
        dispatch(&mut app, Intent::Commit);
        assert_eq!(app.notice.unwrap().kind, NoticeKind::Error);
        assert_eq!(app.session.collector().records().len(), 1);
    }

    #[test]
    fn export_effect_saves_into_out_dir() {
        let dir = tempdir().unwrap();
        let mut app = app_with_record(dir.path().to_path_buf());
        handle_effect(Effect::Export, &mut app);

        let notice = app.notice.unwrap();
        assert_eq!(notice.kind, NoticeKind::Info, "{}", notice.text);
        let saved: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].ends_with(".xlsx"));
    }

    #[test]
    fn export_without_records_saves_nothing() {
        let dir = tempdir().unwrap();
        let mut app = App::new(Session::new(), dir.path().to_path_buf());
        handle_effect(Effect::Export, &mut app);
        assert_eq!(app.notice.unwrap().kind, NoticeKind::Error);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
