use crate::domain::model::FieldMapping;
use crate::utils::error::{DocGenError, Result};
use regex::Regex;
use std::io::{Cursor, Read, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::ZipArchive;

/// The docx archive entry holding the document body.
const DOCUMENT_ENTRY: &str = "word/document.xml";

/// Fills `{placeholder}` slots in a docx template with mapping values.
///
/// Rewrites `word/document.xml` and copies every other archive entry
/// through unchanged. Placeholders without a mapping entry are left as-is
/// so a partially applicable mapping degrades visibly, not silently.
pub fn fill_placeholders(docx: &[u8], mapping: &FieldMapping) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(docx))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();

        if entry.is_dir() {
            writer.add_directory::<_, ()>(name, FileOptions::default())?;
            continue;
        }

        let mut content = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut content)?;

        if name == DOCUMENT_ENTRY {
            let xml = String::from_utf8(content).map_err(|e| DocGenError::Template {
                message: format!("{} is not valid UTF-8: {}", DOCUMENT_ENTRY, e),
            })?;
            content = substitute(&xml, mapping)?.into_bytes();
        }

        writer.start_file::<_, ()>(name, FileOptions::default())?;
        writer.write_all(&content)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Single pass over the document body: each `{slot}` is looked up in the
/// mapping exactly once, so a substituted value that happens to contain
/// placeholder-shaped text is never rescanned.
fn substitute(xml: &str, mapping: &FieldMapping) -> Result<String> {
    let slot = Regex::new(r"\{([A-Za-z0-9_]+)\}").map_err(|e| DocGenError::Template {
        message: format!("placeholder pattern: {}", e),
    })?;

    let out = slot.replace_all(xml, |caps: &regex::Captures| match mapping.get(&caps[1]) {
        Some(value) => xml_text(value),
        None => caps[0].to_string(),
    });
    Ok(out.into_owned())
}

/// Escapes a mapping value for insertion inside a `<w:t>` run. Newlines
/// (the multi-stop destination list) become explicit run breaks.
fn xml_text(value: &str) -> String {
    let escaped = value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    escaped.replace('\n', "</w:t><w:br/><w:t>")
}
