//! CSV import of questionnaire exports (`item_code,rating`).

mod normalizer;
mod parser;

use crate::scoring::ResponseMap;
use std::collections::btree_map::Entry;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug)]
pub enum ResponseImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    DuplicateItem { code: String, line: u64 },
}

impl std::fmt::Display for ResponseImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseImportError::Io(err) => write!(f, "failed to read response export: {}", err),
            ResponseImportError::Csv(err) => write!(f, "invalid response CSV data: {}", err),
            ResponseImportError::DuplicateItem { code, line } => {
                write!(f, "item {} answered more than once (line {})", code, line)
            }
        }
    }
}

impl std::error::Error for ResponseImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResponseImportError::Io(err) => Some(err),
            ResponseImportError::Csv(err) => Some(err),
            ResponseImportError::DuplicateItem { .. } => None,
        }
    }
}

impl From<std::io::Error> for ResponseImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ResponseImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads one respondent's answers into a [`ResponseMap`].
///
/// The importer only handles shape; ratings are carried through untyped so
/// the validator can reject malformed values with the item code attached.
pub struct ResponseImporter;

impl ResponseImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ResponseMap, ResponseImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ResponseMap, ResponseImportError> {
        let mut responses = ResponseMap::new();

        for record in parser::parse_records(reader)? {
            match responses.entry(record.code) {
                Entry::Occupied(entry) => {
                    return Err(ResponseImportError::DuplicateItem {
                        code: entry.key().clone(),
                        line: record.line,
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(record.rating);
                }
            }
        }

        debug!(items = responses.len(), "response export imported");
        Ok(responses)
    }
}
