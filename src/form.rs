//! Questionnaire generation.
//!
//! Pure functions: (terms, FormConfig) → Document.
//! The output is a standalone HTML page with embedded styling and one
//! forced-choice question per term. It is display-only: the form posts
//! nowhere.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::{Result, SurveyError};
use crate::types::{Answer, Document, FormConfig, Term};

const STYLE: &str = r#"
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 20px; background-color: #f0f2f5; color: #333; }
        .container { max-width: 800px; margin: 0 auto; background-color: #fff; padding: 30px; border-radius: 12px; box-shadow: 0 4px 8px rgba(0,0,0,0.1); }
        h1 { color: #333; text-align: center; margin-bottom: 30px; border-bottom: 2px solid #eee; padding-bottom: 15px; }
        .question { margin-bottom: 20px; padding: 15px; border: 1px solid #ccc; border-radius: 8px; background-color: #f9f9f9; }
        .question p { font-weight: bold; margin-bottom: 10px; }
        .question label { margin-right: 20px; }
        button { background-color: #4CAF50; color: white; padding: 12px 20px; border: none; border-radius: 8px; cursor: pointer; font-size: 16px; margin-top: 20px; display: block; width: 100%; transition: background-color 0.3s ease; }
        button:hover { background-color: #45a049; }
        p.note { margin-top: 30px; font-size: 0.9em; color: #666; text-align: center; }
"#;

/// Generate the questionnaire for `terms` with the default texts.
///
/// # Errors
/// `SurveyError::NoTermsSelected` when `terms` is empty.
pub fn generate(terms: &[Term]) -> Result<Document> {
    generate_with(terms, &FormConfig::default())
}

/// Generate the questionnaire for `terms` with custom texts.
///
/// # Errors
/// `SurveyError::NoTermsSelected` when `terms` is empty.
pub fn generate_with(terms: &[Term], config: &FormConfig) -> Result<Document> {
    if terms.is_empty() {
        return Err(SurveyError::NoTermsSelected);
    }

    let group_keys: Vec<String> = terms
        .iter()
        .enumerate()
        .map(|(i, term)| group_key(i + 1, term))
        .collect();

    let mut questions = String::new();
    for (i, (term, key)) in terms.iter().zip(&group_keys).enumerate() {
        questions.push_str(&question_block(i + 1, term, key));
    }

    let title = encode_text(&config.title);
    let html = format!(
        r##"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}    </style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        <form action="#" method="post">
{questions}            <button type="submit">{submit}</button>
        </form>
        <p class="note">{note}</p>
    </div>
</body>
</html>
"##,
        submit = encode_text(&config.submit_label),
        note = encode_text(&config.note),
    );

    Ok(Document {
        terms: terms.to_vec(),
        group_keys,
        html,
    })
}

/// Radio group name for the question at 1-based `position`.
///
/// The position prefix keeps keys unique even when two terms sanitize
/// to the same text.
pub fn group_key(position: usize, term: &str) -> String {
    format!("question_{}_{}", position, sanitize_term(term))
}

/// Replace every whitespace character with `_`.
pub fn sanitize_term(term: &str) -> String {
    term.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

fn question_block(position: usize, term: &str, key: &str) -> String {
    let mut block = String::new();
    let name = encode_double_quoted_attribute(key);
    let _ = writeln!(block, r#"            <div class="question">"#);
    let _ = writeln!(
        block,
        "                <p>質問{}. 評価語「{}」は、これらのサンプルを触って違いが分かると思いますか？</p>",
        position,
        encode_text(term)
    );
    for answer in [Answer::Yes, Answer::No] {
        let _ = writeln!(
            block,
            r#"                <label><input type="radio" name="{}" value="{}" required> {}</label>"#,
            name,
            answer.as_str(),
            answer.label()
        );
    }
    let _ = writeln!(block, "            </div>");
    block
}

// ============================================================================
// TESTS
// ============================================================================
