//! Word-processor (.docx) text extraction
//!
//! A .docx file is a zip archive; the body lives in `word/document.xml` as
//! WordprocessingML. The adapter streams that XML and produces:
//!
//! 1. every non-empty body paragraph, in document order, one per line;
//! 2. after the paragraphs, one block per table, one line per row, with
//!    non-empty cell texts joined by `" | "` and intra-cell newlines/tabs
//!    collapsed to spaces.
//!
//! Merged cells repeat their text once per spanned column; no
//! deduplication is attempted.

use crate::TextError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Delimiter between cell texts on a table row line.
const CELL_DELIMITER: &str = " | ";

/// Extract paragraph and table text from a .docx file.
pub fn extract(path: &Path) -> Result<String, TextError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;

    parse_document_xml(&xml)
}

/// Walk the WordprocessingML event stream.
///
/// Element names are matched by local name, so the usual `w:` prefix (or
/// any other namespace binding) is irrelevant. Text inside any table is
/// routed to the current cell; everything else accumulates into body
/// paragraphs.
fn parse_document_xml(xml: &str) -> Result<String, TextError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut tables: Vec<String> = Vec::new();

    let mut table_depth: usize = 0;
    let mut paragraph = String::new();
    let mut cell = String::new();
    let mut row_cells: Vec<String> = Vec::new();
    let mut rows: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"tab" | b"br" => paragraph.push(' '),
                _ => {}
            },
            Event::Empty(e) => {
                if matches!(e.local_name().as_ref(), b"tab" | b"br") {
                    paragraph.push(' ');
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                paragraph.push_str(&text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => {
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        if table_depth > 0 {
                            if !cell.is_empty() {
                                cell.push(' ');
                            }
                            cell.push_str(text);
                        } else {
                            paragraphs.push(text.to_string());
                        }
                    }
                    paragraph.clear();
                }
                b"tc" => {
                    let text = collapse_whitespace(&cell);
                    if !text.is_empty() {
                        row_cells.push(text);
                    }
                    cell.clear();
                }
                b"tr" => {
                    if !row_cells.is_empty() {
                        rows.push(row_cells.join(CELL_DELIMITER));
                    }
                    row_cells.clear();
                }
                b"tbl" => {
                    table_depth = table_depth.saturating_sub(1);
                    if table_depth == 0 && !rows.is_empty() {
                        tables.push(rows.join("\n"));
                        rows.clear();
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    let mut blocks = paragraphs;
    blocks.extend(tables);
    Ok(blocks.join("\n"))
}

/// Collapse runs of whitespace (including newlines and tabs) to single spaces.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
