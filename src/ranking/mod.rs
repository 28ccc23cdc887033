//! Display core: ranking entries by a sort column and resolving cell values.

pub mod ranker;
pub mod resolver;

pub use ranker::{format_score, rank_entries, rank_suffix};
pub use resolver::{column_display_name, format_value, resolve_ranked, resolve_value};
