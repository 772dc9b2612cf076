//! Spreadsheet export of committed records.
//!
//! Structure:
//! - Pure functions: tabulation, filename, sheet XML
//! - Container assembly: OOXML parts zipped into an in-memory buffer
//!
//! The header follows the terms chosen at export time, not the terms a
//! record was committed under. Answers for terms a record lacks are
//! written as blank cells.

use std::io::{Cursor, Write};

use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Result, SurveyError};
use crate::types::{ExportArtifact, ExportConfig, RespondentId, ResponseRecord, Term};

/// Longest worksheet name spreadsheet software accepts.
const MAX_SHEET_NAME_CHARS: usize = 31;

/// Characters not allowed in worksheet names.
const SHEET_NAME_FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const CONTENT_TYPES: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

const APP_PROPS: &str = r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>sensory-survey</Application></Properties>"#;

const WORKBOOK_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

// ============================================================================
// TABULATION
// ============================================================================

/// Header plus one row per record, as plain strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// `[id_header, term_1, ..., term_n]`.
    pub header: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// One record's cells, aligned with the header's term columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub respondent_id: RespondentId,
    /// One cell per term; empty when the record has no answer for it.
    pub cells: Vec<String>,
}

/// Map records onto columns for the given terms.
pub fn tabulate(terms: &[Term], records: &[ResponseRecord], id_header: &str) -> Table {
    let header = std::iter::once(id_header.to_string())
        .chain(terms.iter().cloned())
        .collect();

    let rows = records
        .iter()
        .map(|record| TableRow {
            respondent_id: record.respondent_id,
            cells: terms.iter().map(|t| record.cell(t).to_string()).collect(),
        })
        .collect();

    Table { header, rows }
}

// ============================================================================
// NAMING
// ============================================================================

/// `<label>_<YYYY-MM-DD>.xlsx`
pub fn export_filename(label: &str, date: NaiveDate) -> String {
    format!("{}_{}.xlsx", label, date.format("%Y-%m-%d"))
}

/// Strip characters spreadsheet software rejects and clamp the length.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !SHEET_NAME_FORBIDDEN.contains(c))
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

// ============================================================================
// EXPORT
// ============================================================================

/// Serialize `records` under the header of `terms` into an xlsx artifact.
///
/// # Errors
/// `SurveyError::NothingToExport` when there are no records; container
/// errors if the zip writer fails.
pub fn export(
    terms: &[Term],
    records: &[ResponseRecord],
    config: &ExportConfig,
    date: NaiveDate,
) -> Result<ExportArtifact> {
    if records.is_empty() {
        return Err(SurveyError::NothingToExport);
    }

    let table = tabulate(terms, records, &config.id_header);
    let bytes = write_workbook(&table, &sanitize_sheet_name(&config.sheet_name))?;
    let filename = export_filename(&config.label, date);

    info!(
        filename = %filename,
        rows = table.rows.len(),
        columns = table.header.len(),
        "workbook serialized"
    );

    Ok(ExportArtifact {
        filename,
        bytes,
        rows: table.rows.len(),
    })
}

/// Assemble the OOXML container for a single-sheet workbook.
pub fn write_workbook(table: &Table, sheet_name: &str) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let workbook = format!(
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        encode_double_quoted_attribute(sheet_name)
    );
    let sheet = sheet_xml(table);

    let parts: [(&str, &str); 7] = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("docProps/app.xml", APP_PROPS),
        ("xl/workbook.xml", &workbook),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/styles.xml", STYLES),
        ("xl/worksheets/sheet1.xml", &sheet),
    ];

    for (name, body) in parts {
        zip.start_file(name, options)?;
        zip.write_all(XML_DECL.as_bytes())?;
        zip.write_all(body.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Worksheet XML: header row of strings, then numeric id + string cells.
pub fn sheet_xml(table: &Table) -> String {
    let mut xml = String::from(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    xml.push_str(r#"<row r="1">"#);
    for (col, title) in table.header.iter().enumerate() {
        push_text_cell(&mut xml, col, 1, title);
    }
    xml.push_str("</row>");

    for (i, row) in table.rows.iter().enumerate() {
        let r = i + 2;
        xml.push_str(&format!(r#"<row r="{}">"#, r));
        xml.push_str(&format!(
            r#"<c r="{}{}"><v>{}</v></c>"#,
            column_name(0),
            r,
            row.respondent_id
        ));
        for (j, value) in row.cells.iter().enumerate() {
            push_text_cell(&mut xml, j + 1, r, value);
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Spreadsheet column letters for a 0-based index: 0 → A, 25 → Z, 26 → AA.
pub fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Empty values are left out so the cell stays blank.
fn push_text_cell(xml: &mut String, col: usize, row: usize, value: &str) {
    if value.is_empty() {
        return;
    }
    xml.push_str(&format!(
        r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
        column_name(col),
        row,
        encode_text(value)
    ));
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Answer, AnswerSet};
    use std::io::Read;
    use zip::ZipArchive;

    fn terms(list: &[&str]) -> Vec<Term> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn record(id: RespondentId, answers: &[(&str, Answer)]) -> ResponseRecord {
        ResponseRecord {
            respondent_id: id,
            answers: answers
                .iter()
                .map(|(t, a)| (t.to_string(), *a))
                .collect::<AnswerSet>(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn nothing_to_export() {
        let err = export(&terms(&["硬い"]), &[], &ExportConfig::default(), date()).unwrap_err();
        assert!(matches!(err, SurveyError::NothingToExport));
    }

    #[test]
    fn tabulate_header_and_rows() {
        let t = terms(&["硬い", "柔らかい"]);
        let records = vec![
            record(1, &[("硬い", Answer::Yes), ("柔らかい", Answer::No)]),
            record(2, &[("硬い", Answer::No), ("柔らかい", Answer::No)]),
        ];
        let table = tabulate(&t, &records, "respondent id");
        assert_eq!(table.header, vec!["respondent id", "硬い", "柔らかい"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].respondent_id, 1);
        assert_eq!(table.rows[0].cells, vec!["yes", "no"]);
        assert_eq!(table.rows[1].cells, vec!["no", "no"]);
    }

    #[test]
    fn tabulate_blank_fills_terms_a_record_lacks() {
        let t = terms(&["硬い", "冷たい"]);
        let records = vec![record(1, &[("硬い", Answer::Yes), ("柔らかい", Answer::No)])];
        let table = tabulate(&t, &records, "respondent id");
        assert_eq!(table.rows[0].cells, vec!["yes", ""]);
    }

    #[test]
    fn filename_encodes_date() {
        assert_eq!(export_filename("官能評価回答", date()), "官能評価回答_2026-03-07.xlsx");
    }

    #[test]
    fn column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn sheet_name_sanitized() {
        assert_eq!(sanitize_sheet_name("a/b:c"), "abc");
        assert_eq!(sanitize_sheet_name("[]"), "Sheet1");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).chars().count(), 31);
    }

    #[test]
    fn sheet_xml_numeric_ids_and_blank_cells() {
        let table = Table {
            header: vec!["respondent id".into(), "硬い".into(), "冷たい".into()],
            rows: vec![TableRow {
                respondent_id: 3,
                cells: vec!["yes".into(), "".into()],
            }],
        };
        let xml = sheet_xml(&table);
        assert!(xml.contains(r#"<c r="A2"><v>3</v></c>"#));
        assert!(xml.contains(r#"<c r="B2" t="inlineStr"><is><t>yes</t></is></c>"#));
        assert!(!xml.contains(r#"r="C2""#));
        assert!(xml.contains(r#"<c r="C1" t="inlineStr"><is><t>冷たい</t></is></c>"#));
    }

    #[test]
    fn sheet_xml_escapes_text() {
        let table = Table {
            header: vec!["a<b&c".into()],
            rows: vec![],
        };
        assert!(sheet_xml(&table).contains("a&lt;b&amp;c"));
    }

    #[test]
    fn export_produces_readable_container() {
        let t = terms(&["硬い", "柔らかい"]);
        let records = vec![
            record(1, &[("硬い", Answer::Yes), ("柔らかい", Answer::No)]),
            record(2, &[("硬い", Answer::No), ("柔らかい", Answer::No)]),
        ];
        let artifact = export(&t, &records, &ExportConfig::default(), date()).unwrap();
        assert_eq!(artifact.rows, 2);
        assert_eq!(artifact.filename, "官能評価回答_2026-03-07.xlsx");
        assert_eq!(&artifact.bytes[..2], b"PK");

        let sheet = read_part(&artifact.bytes, "xl/worksheets/sheet1.xml");
        assert_eq!(sheet.matches("<row ").count(), 3);
        assert!(sheet.contains("<t>respondent id</t>"));

        let workbook = read_part(&artifact.bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"name="官能評価回答""#));

        let types = read_part(&artifact.bytes, "[Content_Types].xml");
        assert!(types.contains("spreadsheetml.sheet.main+xml"));
    }
}
