//! The whole survey state as one owned value, plus the pure transition
//! function over it.
//!
//! `Session::apply(intent)` is the only way core state changes. The
//! presentation layer holds a `Session`, feeds it intents, and acts on
//! the returned `Outcome`. Outside requests (open a document, save a
//! file) are described, never executed, here.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::collector::Collector;
use crate::error::SurveyError;
use crate::export;
use crate::form;
use crate::selection::Selection;
use crate::types::{Answer, Document, ExportArtifact, ExportConfig, FormConfig, RespondentId};

/// Discrete user intent accepted by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ToggleCategory { name: String, included: bool },
    ToggleTerm { term: String, included: bool },
    Generate,
    Preview,
    SetDraftAnswer { term: String, answer: Answer },
    Commit,
    /// Export the records; `date` goes into the filename.
    Export { date: NaiveDate },
}

/// Request handed to an outside collaborator. Fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Open this markup as a viewable document in a new context.
    OpenDocument(String),
    /// Save these bytes under the suggested filename.
    SaveFile(ExportArtifact),
}

/// What applying an intent produced, besides the next session.
#[derive(Debug)]
pub enum Outcome {
    /// State changed (or the intent was a harmless no-op).
    Changed,
    /// A new document replaced the previous one.
    Generated { questions: usize },
    /// The draft was committed.
    Recorded { respondent_id: RespondentId },
    /// The caller should pass this on to the matching collaborator.
    Request(Request),
    /// Validation failed; the session is unchanged.
    Rejected(SurveyError),
}

/// Everything the tool knows during one sitting.
#[derive(Debug, Clone, Default)]
pub struct Session {
    selection: Selection,
    form: Option<Document>,
    collector: Collector,
    form_config: FormConfig,
    export_config: ExportConfig,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session with custom form texts and export naming.
    pub fn with_config(form_config: FormConfig, export_config: ExportConfig) -> Self {
        Self {
            form_config,
            export_config,
            ..Self::default()
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Most recently generated document, if any. May be stale relative
    /// to the current terms.
    pub fn form(&self) -> Option<&Document> {
        self.form.as_ref()
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    pub fn export_config(&self) -> &ExportConfig {
        &self.export_config
    }

    /// True when a document exists but asks about other terms than the
    /// ones currently chosen.
    pub fn is_form_stale(&self) -> bool {
        self.form
            .as_ref()
            .is_some_and(|doc| doc.terms.as_slice() != self.selection.terms())
    }

    /// Apply one intent. Rejected intents return the session unchanged.
    pub fn apply(mut self, intent: Intent) -> (Session, Outcome) {
        debug!(?intent, "apply");
        let outcome = match intent {
            Intent::ToggleCategory { name, included } => {
                self.reset_for_category(&name, included);
                Outcome::Changed
            }
            Intent::ToggleTerm { term, included } => {
                self.selection = std::mem::take(&mut self.selection).toggle_term(&term, included);
                Outcome::Changed
            }
            Intent::Generate => return self.generate(),
            Intent::Preview => match &self.form {
                Some(doc) => Outcome::Request(Request::OpenDocument(doc.html.clone())),
                None => Outcome::Rejected(SurveyError::NoDocument),
            },
            Intent::SetDraftAnswer { term, answer } => {
                self.collector = std::mem::take(&mut self.collector).set_draft_answer(&term, answer);
                Outcome::Changed
            }
            Intent::Commit => self.commit(),
            Intent::Export { date } => self.export(date),
        };

        if let Outcome::Rejected(err) = &outcome {
            warn!(%err, "intent rejected");
        }
        (self, outcome)
    }

    /// Category change invalidates everything downstream: terms, form,
    /// draft, records, and the respondent counter.
    fn reset_for_category(&mut self, name: &str, included: bool) {
        self.selection = std::mem::take(&mut self.selection).toggle_category(name, included);
        self.form = None;
        self.collector = Collector::new();
    }

    fn generate(self) -> (Session, Outcome) {
        match form::generate_with(self.selection.terms(), &self.form_config) {
            Ok(doc) => {
                let questions = doc.question_count();
                (
                    Session {
                        form: Some(doc),
                        ..self
                    },
                    Outcome::Generated { questions },
                )
            }
            Err(err) => {
                warn!(%err, "intent rejected");
                (self, Outcome::Rejected(err))
            }
        }
    }

    fn commit(&mut self) -> Outcome {
        let collector = std::mem::take(&mut self.collector);
        match collector.commit(self.selection.terms()) {
            Ok((next, respondent_id)) => {
                self.collector = next;
                Outcome::Recorded { respondent_id }
            }
            Err((unchanged, err)) => {
                self.collector = unchanged;
                Outcome::Rejected(err)
            }
        }
    }

    fn export(&self, date: NaiveDate) -> Outcome {
        let result = export::export(
            self.selection.terms(),
            self.collector.records(),
            &self.export_config,
            date,
        );
        match result {
            Ok(artifact) => Outcome::Request(Request::SaveFile(artifact)),
            Err(err) => Outcome::Rejected(err),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
