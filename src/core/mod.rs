//! Core processing modules
//!
//! Text normalization shared by the ranker and the resolver.

pub mod text_normalizer;

pub use text_normalizer::{Locale, TextNormalizer};
