//! Whole-file JSON persistence.
//!
//! Every run loads full state, computes the new state in memory, and only
//! then writes the file back in one piece. A run that fails mid-way leaves
//! the previous on-disk state untouched; there is no partial write path.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{Product, ReferenceEntry};
use crate::error::LivrariaError;

fn read(path: &Path) -> Result<String, LivrariaError> {
    fs::read_to_string(path).map_err(|source| LivrariaError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> Result<(), LivrariaError> {
    fs::write(path, contents).map_err(|source| LivrariaError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_catalog(path: &Path) -> Result<Vec<Product>, LivrariaError> {
    let raw = read(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_catalog(path: &Path, catalog: &[Product]) -> Result<(), LivrariaError> {
    let raw = serde_json::to_string_pretty(catalog)?;
    write(path, &raw)?;
    info!(path = %path.display(), records = catalog.len(), "catalog written");
    Ok(())
}

/// Reference lists come in two shapes: a plain JSON array of title strings,
/// or an array of objects with `title` and optional slug/cover/position.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawReference {
    Title(String),
    Entry(ReferenceEntry),
}

pub fn load_reference(path: &Path) -> Result<Vec<ReferenceEntry>, LivrariaError> {
    let raw = read(path)?;
    let entries: Vec<RawReference> = serde_json::from_str(&raw)?;
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            RawReference::Title(title) => ReferenceEntry::new(title),
            RawReference::Entry(entry) => entry,
        })
        .collect())
}

/// Cursor for resuming an interrupted import batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportProgress {
    #[serde(default)]
    pub last_processed_idx: usize,
    #[serde(default)]
    pub total_processed: usize,
    #[serde(default)]
    pub total_errors: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ImportProgress {
    /// Index of the first record a resumed run should process.
    pub fn next_index(&self) -> usize {
        if self.total_processed == 0 {
            0
        } else {
            self.last_processed_idx + 1
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

pub fn load_progress(path: &Path) -> Result<Option<ImportProgress>, LivrariaError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = read(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

pub fn save_progress(path: &Path, progress: &ImportProgress) -> Result<(), LivrariaError> {
    let raw = serde_json::to_string_pretty(progress)?;
    write(path, &raw)
}
