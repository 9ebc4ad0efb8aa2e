//! Core types for the chat analyzer: the parsed message model, timestamp
//! normalization, text classification rules, configuration and errors.

pub mod error;
pub mod formatting;
pub mod models;
pub mod rules;
pub mod settings;
pub mod time_utils;
