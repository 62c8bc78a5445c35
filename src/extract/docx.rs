use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::errors::SummarizeError;

const DOCUMENT_PART: &str = "word/document.xml";

pub(crate) fn extract(bytes: &[u8]) -> Result<String, SummarizeError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)?
        .read_to_string(&mut xml)
        .map_err(|e| SummarizeError::Extraction(format!("Failed to parse DOCX: {e}")))?;

    document_text(&xml)
}

/// Collects run text from WordprocessingML, one line per non-empty paragraph.
fn document_text(xml: &str) -> Result<String, SummarizeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    // `w:tab` inside paragraph properties defines a tab stop, not a tab character.
    let mut in_paragraph_props = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:pPr" => in_paragraph_props = true,
                b"w:tab" if !in_paragraph_props => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" if !in_paragraph_props => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| {
                    SummarizeError::Extraction(format!("Failed to parse DOCX: {e}"))
                })?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:pPr" => in_paragraph_props = false,
                b"w:p" => {
                    let paragraph = std::mem::take(&mut current);
                    if !paragraph.trim().is_empty() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SummarizeError::Extraction(format!(
                    "Failed to parse DOCX: {e}"
                )));
            }
            _ => {}
        }
    }

    if !current.trim().is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n"))
}
