//! Error type shared by the core modules.
//!
//! Two families: user-input incompleteness (recoverable, shown as a
//! notice, state unchanged) and failures of the outside collaborators
//! (file system, zip container).

use std::io;

use thiserror::Error;

use crate::types::Term;

#[derive(Debug, Error)]
pub enum SurveyError {
    /// Generate was requested with no terms chosen.
    #[error("評価語を一つ以上選択してください。")]
    NoTermsSelected,

    /// Commit was requested before every chosen term had an answer,
    /// or the draft still holds answers for terms no longer chosen.
    #[error("全ての評価語に回答してください。")]
    IncompleteDraft { missing: Vec<Term>, extra: Vec<Term> },

    /// Export was requested with no committed records.
    #[error("記録された回答がありません。")]
    NothingToExport,

    /// Preview was requested before any document was generated.
    #[error("先にアンケートフォームを生成してください。")]
    NoDocument,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("spreadsheet container error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl SurveyError {
    /// True for the user-input incompleteness family.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SurveyError::NoTermsSelected
                | SurveyError::IncompleteDraft { .. }
                | SurveyError::NothingToExport
                | SurveyError::NoDocument
        )
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;
