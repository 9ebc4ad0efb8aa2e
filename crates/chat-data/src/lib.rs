//! Data layer for the chat analyzer.
//!
//! Responsible for reading and normalizing chat exports, parsing them into
//! message tables, holding the loaded session, and running the aggregation
//! queries and the full report pipeline.

pub mod aggregator;
pub mod analysis;
pub mod parser;
pub mod reader;
pub mod session;
