/// Import/export file formats for the Stash
use crate::error::{Result, StashError};
use crate::notes::{Notes, clean_notes};
use crate::stash::{Stash, lenient_list};
use crate::urls::{deduplicate, is_url, sanitize_url};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// First line of every text export
pub const TEXT_HEADER: &str = "STASH";

pub const TEXT_FILENAME: &str = "Stash.txt";
pub const JSON_FILENAME: &str = "Stash.json";

/// A file ready to hand to the download collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub mime: String,
    pub contents: String,
}

/// Shape of the JSON export file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StashJson {
    #[serde(default, deserialize_with = "lenient_list")]
    pub stash: Stash,
    #[serde(default)]
    pub notes: BTreeMap<String, Option<String>>,
}

/// Which parser an imported file goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Text,
    Json,
}

impl ImportFormat {
    /// JSON exports always start with an object; anything else is text
    pub fn detect(content: &str) -> ImportFormat {
        if content.trim_start().starts_with('{') {
            ImportFormat::Json
        } else {
            ImportFormat::Text
        }
    }
}

/// Result of parsing an import file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Imported {
    pub stash: Stash,
    pub notes: Notes,
}

pub fn export_text(stash: &[String]) -> ExportFile {
    let contents = std::iter::once(TEXT_HEADER)
        .chain(stash.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n");

    ExportFile {
        filename: TEXT_FILENAME.to_string(),
        mime: "text/plain".to_string(),
        contents,
    }
}

pub fn export_json(stash: &[String], notes: &Notes) -> Result<ExportFile> {
    let json = StashJson {
        stash: stash.to_vec(),
        notes: notes
            .iter()
            .map(|(url, note)| (url.clone(), Some(note.clone())))
            .collect(),
    };

    Ok(ExportFile {
        filename: JSON_FILENAME.to_string(),
        mime: "application/json".to_string(),
        contents: serde_json::to_string(&json)?,
    })
}

/// Keep valid http(s) entries, strip their query strings, drop duplicates
fn clean_import(entries: impl IntoIterator<Item = String>) -> Stash {
    deduplicate(
        entries
            .into_iter()
            .filter(|x| is_url(x))
            .map(|x| sanitize_url(&x))
            .collect(),
    )
}

/// Parse newline separated URLs. The "STASH" header and any other line that
/// is not an http(s) URL are discarded.
pub fn parse_text_import(content: &str) -> Result<Imported> {
    let stash = clean_import(
        content
            .lines()
            .map(str::trim_end)
            .filter(|line| *line != TEXT_HEADER)
            .map(str::to_string),
    );

    if stash.is_empty() {
        return Err(StashError::EmptyImport);
    }

    Ok(Imported {
        stash,
        notes: Notes::new(),
    })
}

pub fn parse_json_import(content: &str) -> Result<Imported> {
    let json: StashJson = serde_json::from_str(content)?;

    let stash = clean_import(json.stash);
    if stash.is_empty() {
        return Err(StashError::EmptyImport);
    }

    let notes = json
        .notes
        .into_iter()
        .filter_map(|(url, note)| note.map(|note| (url, note)))
        .collect();

    Ok(Imported {
        notes: clean_notes(notes, &stash),
        stash,
    })
}

pub fn parse_import(content: &str) -> Result<Imported> {
    match ImportFormat::detect(content) {
        ImportFormat::Text => parse_text_import(content),
        ImportFormat::Json => parse_json_import(content),
    }
}
