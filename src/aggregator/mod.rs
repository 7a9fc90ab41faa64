//! Aggregation layer.
//!
//! Turns the flat vulnerability list into the collections every exporter
//! shares:
//! - the CVSS/name ordered vulnerability sequence
//! - vulnerability counts per level
//! - distinct affected hosts per level
//! - vulnerability counts per family
//!
//! `summary` folds those counters into table rows.

pub mod collections;
pub mod summary;

pub use collections::{Collections, FamilyCounts, aggregate, sort_vulnerabilities};
pub use summary::{LevelRow, Summary, SummaryBuilder};
