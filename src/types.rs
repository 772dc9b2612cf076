//! Domain types for sensory-survey.
//!
//! Answers, committed records, generated documents, export artifacts,
//! and the configuration structs the generators read.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// PRIMITIVES
// ============================================================================

/// A descriptive word offered to respondents, e.g. "硬い".
pub type Term = String;

/// Sequential respondent identifier, starting at 1.
pub type RespondentId = u32;

/// First respondent id handed out by a fresh collector.
pub const FIRST_RESPONDENT_ID: RespondentId = 1;

// ============================================================================
// ENUMS
// ============================================================================

/// A forced-choice answer to "can you tell the samples apart by this term?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Data value stored in records and spreadsheet cells.
    pub fn as_str(self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
        }
    }

    /// Label shown to respondents.
    pub fn label(self) -> &'static str {
        match self {
            Answer::Yes => "はい",
            Answer::No => "いいえ",
        }
    }

    /// Parse a data value ("yes"/"no"). Labels are accepted too.
    pub fn parse(value: &str) -> Option<Answer> {
        match value {
            "yes" | "はい" => Some(Answer::Yes),
            "no" | "いいえ" => Some(Answer::No),
            _ => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format for the records report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable listing.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

// ============================================================================
// STRUCTS
// ============================================================================

/// Mapping from term to answer. Ordered by term so listings are stable.
pub type AnswerSet = BTreeMap<Term, Answer>;

/// One respondent's complete answer set, immutable once committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Sequential id assigned at commit time.
    pub respondent_id: RespondentId,
    /// One answer per term that was chosen when the record was committed.
    pub answers: AnswerSet,
}

impl ResponseRecord {
    /// Cell value for `term`, or the empty string when the record has no
    /// answer for it (term added after the record was committed).
    pub fn cell(&self, term: &str) -> &'static str {
        self.answers.get(term).map(|a| a.as_str()).unwrap_or("")
    }
}

/// A generated standalone questionnaire.
///
/// Snapshot of the terms at generation time plus the rendered markup.
/// Never mutated; regeneration replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Terms the document asks about, in question order.
    pub terms: Vec<Term>,
    /// Radio group key per question, parallel to `terms`.
    pub group_keys: Vec<String>,
    /// Complete HTML text.
    pub html: String,
}

impl Document {
    /// Number of question blocks.
    pub fn question_count(&self) -> usize {
        self.terms.len()
    }
}

/// Spreadsheet bytes plus the suggested filename, ready for a file sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested filename, `<label>_<YYYY-MM-DD>.xlsx`.
    pub filename: String,
    /// OOXML workbook bytes.
    pub bytes: Vec<u8>,
    /// Data rows written (excluding the header).
    pub rows: usize,
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Text blocks of the generated questionnaire.
#[derive(Debug, Clone)]
pub struct FormConfig {
    /// Document `<title>` and heading.
    pub title: String,
    /// Footnote under the form.
    pub note: String,
    /// Submit button caption.
    pub submit_label: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: "触感官能評価アンケート".to_string(),
            note: "※このアンケートは、評価語がサンプル間の違いを識別するのに適切かどうかを確認するためのものです。"
                .to_string(),
            submit_label: "回答を送信".to_string(),
        }
    }
}

/// Naming of the exported workbook.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Filename prefix before the date.
    pub label: String,
    /// Worksheet name.
    pub sheet_name: String,
    /// Header of the first column.
    pub id_header: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            label: "官能評価回答".to_string(),
            sheet_name: "官能評価回答".to_string(),
            id_header: "respondent id".to_string(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
