//! Loading already-materialized metric records from local exports.

mod parser;
mod source;

pub use source::{EntitySource, InMemoryEntitySource, SourceError};

use crate::ranking::Entity;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// Keys recognised as the entity identifier, in priority order.
pub const ID_KEYS: [&str; 3] = ["id", "player_id", "gamer_tag"];

/// Supported on-disk record formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    pub fn from_path(path: &Path) -> Result<Self, RecordImportError> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(RecordImportError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordImportError {
    #[error("failed to read records: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON records: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV records: {0}")]
    Csv(#[from] csv::Error),
    #[error("record {row} has no identifier (expected one of: id, player_id, gamer_tag)")]
    MissingId { row: usize },
    #[error("unexpected record layout: {0}")]
    UnexpectedShape(String),
    #[error("unsupported record file {0}; expected .json or .csv")]
    UnsupportedFormat(PathBuf),
}

pub struct RecordImporter;

impl RecordImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Entity>, RecordImportError> {
        let path = path.as_ref();
        let format = RecordFormat::from_path(path)?;
        let file = std::fs::File::open(path)?;
        let entities = Self::from_reader(file, format)?;
        info!(path = %path.display(), count = entities.len(), "loaded metric records");
        Ok(entities)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        format: RecordFormat,
    ) -> Result<Vec<Entity>, RecordImportError> {
        match format {
            RecordFormat::Json => parser::parse_json(reader),
            RecordFormat::Csv => parser::parse_csv(reader),
        }
    }
}
