//! Response collection: a draft answer set plus an append-only list of
//! committed records with sequential respondent ids.

use tracing::{debug, info};

use crate::error::{Result, SurveyError};
use crate::types::{Answer, AnswerSet, FIRST_RESPONDENT_ID, RespondentId, ResponseRecord, Term};

/// Draft, committed records, and the next id to hand out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collector {
    records: Vec<ResponseRecord>,
    next_id: RespondentId,
    draft: AnswerSet,
}

impl Default for Collector {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: FIRST_RESPONDENT_ID,
            draft: AnswerSet::new(),
        }
    }
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed records in submission order.
    pub fn records(&self) -> &[ResponseRecord] {
        &self.records
    }

    /// Id the next committed record will receive.
    pub fn next_id(&self) -> RespondentId {
        self.next_id
    }

    /// Answers entered so far for the respondent in progress.
    pub fn draft(&self) -> &AnswerSet {
        &self.draft
    }

    /// Record (or overwrite) the draft answer for `term`.
    ///
    /// The term is not checked against the chosen terms; a stale entry
    /// makes the next commit fail instead.
    pub fn set_draft_answer(mut self, term: &str, answer: Answer) -> Self {
        debug!(term, %answer, "draft answer");
        self.draft.insert(term.to_string(), answer);
        self
    }

    /// Terms of `chosen` with no draft answer, and draft terms that are
    /// not in `chosen`.
    pub fn draft_gaps(&self, chosen: &[Term]) -> (Vec<Term>, Vec<Term>) {
        let missing = chosen
            .iter()
            .filter(|t| !self.draft.contains_key(t.as_str()))
            .cloned()
            .collect();
        let extra = self
            .draft
            .keys()
            .filter(|k| !chosen.contains(*k))
            .cloned()
            .collect();
        (missing, extra)
    }

    /// Whether the draft answers exactly the terms in `chosen`.
    pub fn is_draft_complete(&self, chosen: &[Term]) -> bool {
        let (missing, extra) = self.draft_gaps(chosen);
        missing.is_empty() && extra.is_empty()
    }

    /// Turn the draft into a record with the next respondent id.
    ///
    /// On success the draft is cleared and the counter advances by one.
    ///
    /// # Errors
    /// `SurveyError::IncompleteDraft` when the draft's key set differs
    /// from `chosen`; the collector is handed back unchanged alongside.
    /// An empty `chosen` is also rejected, even though the empty draft
    /// matches it: a record with no answers is never stored.
    pub fn commit(
        mut self,
        chosen: &[Term],
    ) -> std::result::Result<(Self, RespondentId), (Self, SurveyError)> {
        let (missing, extra) = self.draft_gaps(chosen);
        if !missing.is_empty() || !extra.is_empty() || chosen.is_empty() {
            return Err((self, SurveyError::IncompleteDraft { missing, extra }));
        }

        let id = self.next_id;
        let answers = std::mem::take(&mut self.draft);
        self.records.push(ResponseRecord {
            respondent_id: id,
            answers,
        });
        self.next_id += 1;
        info!(respondent_id = id, total = self.records.len(), "response recorded");
        Ok((self, id))
    }

    /// Borrowing form of [`Collector::commit`] for callers that hold the
    /// collector in place.
    pub fn try_commit(&mut self, chosen: &[Term]) -> Result<RespondentId> {
        match std::mem::take(self).commit(chosen) {
            Ok((next, id)) => {
                *self = next;
                Ok(id)
            }
            Err((unchanged, err)) => {
                *self = unchanged;
                Err(err)
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
