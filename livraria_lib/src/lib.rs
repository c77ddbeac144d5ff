//! Catalog reconciliation for the livraria storefront.
//!
//! Scraped product records and the stored catalog JSON drift apart between
//! scrape passes: accents, smart quotes, and subtitles vary, slugs get
//! regenerated, covers move. This crate normalizes titles, scores their
//! similarity, and merges/reorders the stored collection against reference
//! title lists, always producing a total reordering (no record is ever
//! dropped).

pub mod audit;
pub mod catalog;
pub mod content;
pub mod error;
pub mod matcher;
pub mod merge;
pub mod normalize;
pub mod reorder;
pub mod similarity;
pub mod store;

pub use catalog::{Product, ReferenceEntry};
pub use error::LivrariaError;
pub use matcher::{best_match, MatchConfig, MatchOutcome, DEFAULT_MATCH_THRESHOLD};
pub use merge::{merge_record, MergeOptions, MergeOutcome};
pub use reorder::{reorder, ReorderOptions, ReorderReport, UnmatchedReference};
pub use store::ImportProgress;
