//! Utility modules

pub mod fuzzy;

pub use fuzzy::{by_score_desc, length_ratio, similarity};
