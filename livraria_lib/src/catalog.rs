//! Catalog record types.
//!
//! Stored products are open-ended JSON objects; only `title` and `slug`
//! participate in matching. Everything else (authors, prices, dimensions,
//! descriptive HTML, image lists) rides along untouched in `extra` so a
//! reorder or merge never loses fields it does not understand.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::slugify;

/// One catalog entry. A record with a missing or empty title is still a
/// valid record: it can never be matched, but it is always carried through
/// reorder output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: None,
            sku: None,
            image: None,
            permalink: None,
            extra: Map::new(),
        }
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Fabricate a minimal placeholder for a reference title with no
    /// catalog counterpart. Same id/permalink shape as the importer uses,
    /// tagged so a later scrape pass can find and complete it.
    pub fn stub_from_reference(entry: &ReferenceEntry) -> Self {
        let slug = entry
            .slug
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&entry.title));
        let mut extra = Map::new();
        extra.insert("_id".into(), Value::String(format!("catalog-{}", slug)));
        extra.insert("id".into(), Value::String(format!("catalog-{}", slug)));
        extra.insert("source".into(), Value::String("reference-stub".into()));
        if let Some(cover) = &entry.cover_image {
            extra.insert(
                "images".into(),
                Value::Array(vec![Value::String(cover.clone())]),
            );
        }
        Self {
            title: entry.title.clone(),
            permalink: Some(format!("/livros/{}", slug)),
            slug: Some(slug),
            sku: None,
            image: entry.cover_image.clone(),
            extra,
        }
    }
}

/// One entry of an externally supplied ordering: a title, optionally
/// carrying the canonical slug and cover image for that position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl ReferenceEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: None,
            cover_image: None,
            source_url: None,
            position: None,
        }
    }
}
