//! Pure rendering: map App state to ratatui widget trees.
//!
//! Each screen has a dedicated render function. The main `render()`
//! dispatches based on the current Screen variant. Widget-building
//! functions are pure (state in, widgets out); the only effect is
//! Frame::render_widget() which writes to the terminal buffer.

use humansize::{format_size, BINARY};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::report::record_line;
use crate::session::Session;
use crate::taxonomy;

use super::state::{App, Notice, NoticeKind, Pane, Screen};
use super::theme;

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the current screen to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Common layout: tabs at top, content, notice, help at bottom
    let chunks = Layout::vertical([
        Constraint::Length(1), // tabs
        Constraint::Min(0),    // content
        Constraint::Length(1), // notice
        Constraint::Length(1), // help
    ])
    .split(area);

    frame.render_widget(render_title(&app.screen), chunks[0]);
    frame.render_widget(render_notice(app.notice.as_ref()), chunks[2]);
    frame.render_widget(render_help(&app.screen), chunks[3]);

    let content_area = chunks[1];

    match &app.screen {
        Screen::Settings { pane, cursor } => {
            render_settings(&app.session, *pane, *cursor, frame, content_area);
        }
        Screen::Form { scroll } => {
            render_form(&app.session, *scroll, frame, content_area);
        }
        Screen::Data { cursor } => {
            render_data(&app.session, *cursor, frame, content_area);
        }
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

const TABS: [&str; 3] = ["設定", "フォーム", "データ"];

/// The generated form is for display; nothing submits its answers.
const FORM_NOTE: &str =
    "※このフォームは生成・表示用です。回答を送信する機能は含まれていません。";

/// Where answers are actually gathered.
const COLLECT_NOTE: &str = "※回答の収集は [3] データ で別途行います。";

/// The data tab records answers typed in by hand.
const MOCK_INPUT_NOTE: &str = "※ここでは回答を模擬入力して記録します。";

/// Title bar with the tab strip; the current tab is highlighted.
fn render_title(screen: &Screen) -> Paragraph<'static> {
    let mut spans = vec![Span::styled("sensory-survey  ", theme::STYLE_HEADING)];
    for (i, label) in TABS.iter().enumerate() {
        let number = i as u8 + 1;
        let style = if number == screen.tab() {
            theme::STYLE_TAB_ACTIVE
        } else {
            theme::STYLE_TAB
        };
        spans.push(Span::styled(format!(" [{}] {} ", number, label), style));
        spans.push(Span::raw(" "));
    }
    Paragraph::new(Line::from(spans))
}

/// Status line: the last notice, if any.
fn render_notice(notice: Option<&Notice>) -> Paragraph<'static> {
    match notice {
        Some(notice) => {
            let style = match notice.kind {
                NoticeKind::Info => theme::STYLE_OK,
                NoticeKind::Error => theme::STYLE_REJECTED,
            };
            Paragraph::new(Span::styled(format!(" {}", notice.text), style))
        }
        None => Paragraph::new(""),
    }
}

/// Help line showing available keybindings for the current screen.
fn render_help(screen: &Screen) -> Paragraph<'static> {
    let help_text = match screen {
        Screen::Settings { .. } => {
            "[j/k] move  [Space] toggle  [Tab] pane  [g] generate  [p] preview  [1-3] tabs  [q] quit"
        }
        Screen::Form { .. } => "[j/k] scroll  [g] regenerate  [p] preview  [Esc] back  [q] quit",
        Screen::Data { .. } => {
            "[j/k] move  [y/n] answer  [Space] flip  [c] commit  [e] export  [Esc] back  [q] quit"
        }
    };

    Paragraph::new(Span::styled(help_text, theme::STYLE_KEYS))
}

/// First row to show so that `cursor` stays visible.
fn scroll_offset(cursor: usize, visible_height: usize) -> usize {
    if visible_height > 0 && cursor >= visible_height {
        cursor - visible_height + 1
    } else {
        0
    }
}

/// Checkbox row with cursor highlight.
fn checkbox_line(label: &str, checked: bool, is_cursor: bool) -> Line<'static> {
    let checkbox = if checked {
        Span::styled("[x] ", theme::STYLE_CHECKED)
    } else {
        Span::styled("[ ] ", theme::STYLE_UNCHECKED)
    };
    let line = Line::from(vec![Span::raw("  "), checkbox, Span::raw(label.to_string())]);
    if is_cursor {
        line.style(theme::STYLE_CURSOR)
    } else {
        line
    }
}

// ============================================================================
// SCREEN: SETTINGS
// ============================================================================

fn render_settings(session: &Session, pane: Pane, cursor: usize, frame: &mut Frame, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Min(0),    // checklists
        Constraint::Length(3), // summary
    ])
    .split(area);
    let columns = Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    let selection = session.selection();

    // Category pane
    let focused = pane == Pane::Categories;
    let categories: Vec<Line> = taxonomy::category_names()
        .enumerate()
        .map(|(i, name)| {
            checkbox_line(name, selection.is_category_chosen(name), focused && i == cursor)
        })
        .collect();
    render_checklist("評価カテゴリー", categories, focused, cursor, frame, columns[0]);

    // Term pane
    let focused = pane == Pane::Terms;
    let available = selection.available_terms();
    let terms: Vec<Line> = if available.is_empty() {
        vec![Line::from(Span::styled(
            "  カテゴリーを選択してください",
            theme::STYLE_NOTE,
        ))]
    } else {
        available
            .iter()
            .enumerate()
            .map(|(i, term)| {
                checkbox_line(term, selection.is_term_chosen(term), focused && i == cursor)
            })
            .collect()
    };
    render_checklist("評価語", terms, focused, cursor, frame, columns[1]);

    // Summary
    let form_status = match session.form() {
        None => Span::styled("未生成", theme::STYLE_NOTE),
        Some(doc) if session.is_form_stale() => Span::styled(
            format!("{}問 (評価語が変更されています)", doc.question_count()),
            theme::STYLE_STALE,
        ),
        Some(doc) => Span::styled(format!("{}問", doc.question_count()), theme::STYLE_OK),
    };
    let mut summary = vec![
        Line::from(vec![
            Span::raw("  選択中の評価語: "),
            Span::styled(selection.terms().len().to_string(), theme::STYLE_COUNT),
        ]),
        Line::from(vec![Span::raw("  フォーム: "), form_status]),
    ];
    if session.form().is_some() {
        summary.push(Line::from(Span::styled(format!("  {}", FORM_NOTE), theme::STYLE_NOTE)));
    }
    frame.render_widget(Paragraph::new(summary), rows[1]);
}

fn render_checklist(
    heading: &'static str,
    items: Vec<Line<'static>>,
    focused: bool,
    cursor: usize,
    frame: &mut Frame,
    area: Rect,
) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(area);

    let heading_style = if focused {
        theme::STYLE_HEADING
    } else {
        theme::STYLE_NOTE
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {}", heading), heading_style)),
        chunks[0],
    );

    let offset = if focused {
        scroll_offset(cursor, chunks[1].height as usize)
    } else {
        0
    };
    let list = Paragraph::new(items).scroll((offset as u16, 0));
    frame.render_widget(list, chunks[1]);
}

// ============================================================================
// SCREEN: FORM
// ============================================================================

fn render_form(session: &Session, scroll: usize, frame: &mut Frame, area: Rect) {
    let Some(doc) = session.form() else {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  フォームはまだ生成されていません。",
                theme::STYLE_NOTE,
            )),
            Line::from(Span::styled(
                "  [1] 設定で評価語を選び [g] で生成します。",
                theme::STYLE_NOTE,
            )),
        ];
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), area);
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(2), // display-only note
        Constraint::Min(0),    // source
    ])
    .split(area);

    let mut header = vec![
        Span::styled(
            format!("  {}問", doc.question_count()),
            theme::STYLE_COUNT,
        ),
        Span::styled(
            format!("  {}", format_size(doc.html.len(), BINARY)),
            theme::STYLE_NOTE,
        ),
    ];
    if session.is_form_stale() {
        header.push(Span::styled(
            "  評価語が変更されています。[g] で再生成",
            theme::STYLE_STALE,
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    let note = vec![
        Line::from(Span::styled(format!("  {}", FORM_NOTE), theme::STYLE_NOTE)),
        Line::from(Span::styled(format!("  {}", COLLECT_NOTE), theme::STYLE_NOTE)),
    ];
    frame.render_widget(Paragraph::new(note), chunks[1]);

    let lines: Vec<Line> = doc
        .html
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    let source = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(source, chunks[2]);
}

// ============================================================================
// SCREEN: DATA
// ============================================================================

fn render_data(session: &Session, cursor: usize, frame: &mut Frame, area: Rect) {
    let terms = session.selection().terms();
    let collector = session.collector();
    let draft = collector.draft();

    let draft_height = (terms.len().max(1) + 1) as u16;
    let chunks = Layout::vertical([
        Constraint::Length(1),            // mock-input note
        Constraint::Length(draft_height), // draft entry
        Constraint::Length(1),            // spacer
        Constraint::Min(0),               // recorded list
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {}", MOCK_INPUT_NOTE), theme::STYLE_NOTE)),
        chunks[0],
    );

    // Draft entry, counting only answers to chosen terms
    let answered = terms.iter().filter(|t| draft.contains_key(t.as_str())).count();
    let mut lines = vec![Line::from(vec![
        Span::styled(" 回答者ID ", theme::STYLE_HEADING),
        Span::styled(collector.next_id().to_string(), theme::STYLE_COUNT),
        Span::styled(
            format!("  ({}/{} 回答済み)", answered, terms.len()),
            theme::STYLE_NOTE,
        ),
    ])];
    if terms.is_empty() {
        lines.push(Line::from(Span::styled(
            "  評価語が選択されていません",
            theme::STYLE_NOTE,
        )));
    }
    for (i, term) in terms.iter().enumerate() {
        let answer = draft.get(term).copied();
        let cell = match answer {
            Some(answer) => format!("[{}]", answer.label()),
            None => "[ -- ]".to_string(),
        };
        let answer = Span::styled(cell, theme::answer_style(answer));
        let line = Line::from(vec![
            Span::raw("  "),
            answer,
            Span::raw(" "),
            Span::raw(term.clone()),
        ]);
        lines.push(if i == cursor {
            line.style(theme::STYLE_CURSOR)
        } else {
            line
        });
    }
    frame.render_widget(Paragraph::new(lines), chunks[1]);

    // Recorded responses, newest last
    let records = collector.records();
    let mut lines = vec![Line::from(vec![
        Span::styled(" 記録済みの回答 ", theme::STYLE_HEADING),
        Span::styled(format!("({}件)", records.len()), theme::STYLE_COUNT),
    ])];
    if records.is_empty() {
        lines.push(Line::from(Span::styled("  まだ回答がありません", theme::STYLE_NOTE)));
    }
    for record in records {
        lines.push(Line::from(format!("  {}", record_line(terms, record))));
    }

    let visible = chunks[3].height as usize;
    let offset = lines.len().saturating_sub(visible);
    let list = Paragraph::new(lines).scroll((offset as u16, 0));
    frame.render_widget(list, chunks[3]);
}

// ============================================================================
// TESTS
// ============================================================================
