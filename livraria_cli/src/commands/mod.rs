//! CLI subcommand implementations.

pub mod check;
pub mod fix_content;
pub mod import;
pub mod reorder;
pub mod status;
