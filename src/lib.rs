//! Saiy Library
//!
//! Command resolution core for the Saiy voice assistant: fuzzy phrase
//! matching over ASR candidates and NLU response normalization.

pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod matching;
pub mod nlu;
pub mod processor;
pub mod utils;
