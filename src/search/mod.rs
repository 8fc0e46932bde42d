//! Search pipeline: expansion, aggregation, filtering.

pub mod aggregator;
pub mod expander;
pub mod orchestrator;
pub mod roster;

pub use aggregator::AggregateOptions;
pub use expander::{SynonymTable, TitleExpander};
pub use orchestrator::SearchOrchestrator;
pub use roster::CompanyRoster;
