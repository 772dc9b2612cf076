//! Report formatting for recorded responses.
//!
//! Pure functions: (terms, records, OutputFormat) → String.
//! No I/O, no side effects.

use serde::Serialize;

use crate::types::{Answer, OutputFormat, ResponseRecord, Term};

/// Format the recorded responses for output.
///
/// Pure function: takes data, returns formatted string.
pub fn format_records(terms: &[Term], records: &[ResponseRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(terms, records),
        OutputFormat::Json => format_json(terms, records),
    }
}

/// One listing line: `回答者ID 1: 硬い: はい  柔らかい: いいえ`.
///
/// Answers follow `terms` (question order). Answers for terms no longer
/// in `terms` come last.
pub fn record_line(terms: &[Term], record: &ResponseRecord) -> String {
    let chosen = terms
        .iter()
        .filter_map(|term| record.answers.get(term).map(|answer| (term, answer)));
    let stale = record
        .answers
        .iter()
        .filter(|(term, _)| !terms.contains(*term));
    let answers: Vec<String> = chosen
        .chain(stale)
        .map(|(term, answer)| format!("{}: {}", term, answer.label()))
        .collect();
    format!("回答者ID {}: {}", record.respondent_id, answers.join("  "))
}

/// Number of `Yes` answers per term, in term order.
pub fn yes_counts(terms: &[Term], records: &[ResponseRecord]) -> Vec<(Term, usize)> {
    terms
        .iter()
        .map(|term| {
            let yes = records
                .iter()
                .filter(|r| r.answers.get(term) == Some(&Answer::Yes))
                .count();
            (term.clone(), yes)
        })
        .collect()
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn format_human(terms: &[Term], records: &[ResponseRecord]) -> String {
    let mut out = String::new();

    if !records.is_empty() {
        out.push_str("=== 記録済みの回答 ===\n");
        for record in records {
            out.push_str(&record_line(terms, record));
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str("=== Summary ===\n");
    out.push_str(&format!("Respondents: {}\n", records.len()));
    for (term, yes) in yes_counts(terms, records) {
        out.push_str(&format!("  {}: {}/{} はい\n", term, yes, records.len()));
    }

    out
}

// ============================================================================
// JSON FORMAT
// ============================================================================

#[derive(Serialize)]
struct JsonReport<'a> {
    terms: &'a [Term],
    records: &'a [ResponseRecord],
}

fn format_json(terms: &[Term], records: &[ResponseRecord]) -> String {
    let report = JsonReport { terms, records };
    // Only strings, integers and enums: serialization cannot fail.
    serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        panic!("Failed to serialize records to JSON: {}", e)
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnswerSet;

    fn sample_terms() -> Vec<Term> {
        vec!["硬い".to_string(), "柔らかい".to_string()]
    }

    fn sample_records() -> Vec<ResponseRecord> {
        vec![
            ResponseRecord {
                respondent_id: 1,
                answers: AnswerSet::from([
                    ("硬い".to_string(), Answer::Yes),
                    ("柔らかい".to_string(), Answer::No),
                ]),
            },
            ResponseRecord {
                respondent_id: 2,
                answers: AnswerSet::from([
                    ("硬い".to_string(), Answer::No),
                    ("柔らかい".to_string(), Answer::No),
                ]),
            },
        ]
    }

    // --- Human format tests ---

    #[test]
    fn human_format_lists_records() {
        let output = format_records(&sample_terms(), &sample_records(), OutputFormat::Human);
        assert!(output.contains("=== 記録済みの回答 ==="));
        assert!(output.contains("回答者ID 1:"));
        assert!(output.contains("回答者ID 2:"));
        assert!(output.contains("硬い: はい"));
    }

    #[test]
    fn human_format_summary_counts_yes() {
        let output = format_records(&sample_terms(), &sample_records(), OutputFormat::Human);
        assert!(output.contains("Respondents: 2"));
        assert!(output.contains("硬い: 1/2 はい"));
        assert!(output.contains("柔らかい: 0/2 はい"));
    }

    #[test]
    fn human_format_empty() {
        let output = format_records(&sample_terms(), &[], OutputFormat::Human);
        assert!(!output.contains("記録済み"));
        assert!(output.contains("Respondents: 0"));
    }

    #[test]
    fn record_line_follows_question_order() {
        // 硬い sorts after 柔らかい by code point
        let line = record_line(&sample_terms(), &sample_records()[0]);
        assert_eq!(line, "回答者ID 1: 硬い: はい  柔らかい: いいえ");
    }

    #[test]
    fn record_line_puts_unchosen_answers_last() {
        let terms = vec!["柔らかい".to_string()];
        let line = record_line(&terms, &sample_records()[0]);
        assert_eq!(line, "回答者ID 1: 柔らかい: いいえ  硬い: はい");
    }

    #[test]
    fn yes_counts_follow_term_order() {
        let counts = yes_counts(&sample_terms(), &sample_records());
        assert_eq!(
            counts,
            vec![("硬い".to_string(), 1), ("柔らかい".to_string(), 0)]
        );
    }

    // --- JSON format tests ---

    #[test]
    fn json_format_has_expected_fields() {
        let output = format_records(&sample_terms(), &sample_records(), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["terms"][0], "硬い");
        assert_eq!(parsed["records"][0]["respondent_id"], 1);
        assert_eq!(parsed["records"][0]["answers"]["硬い"], "yes");
        assert_eq!(parsed["records"][1]["answers"]["柔らかい"], "no");
    }

    #[test]
    fn json_format_empty() {
        let output = format_records(&[], &[], OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["records"].as_array().unwrap().len(), 0);
    }
}
