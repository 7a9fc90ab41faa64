//! Finding entities and the host registry.
//!
//! - `port`: port a finding was reported on
//! - `vulnerability`: shared vulnerability record with its occurrences
//! - `host`: scanned host with its findings and derived per-level caches
//! - `registry`: keyed host container (`ResultTree`)
//! - `builder`: cross-linked report construction from flat records

mod builder;
mod host;
mod port;
mod registry;
mod vulnerability;

pub use builder::{FindingRecord, Report, ReportBuilder};
pub use host::{Host, HostFinding, HostKey, HostRef};
pub use port::Port;
pub use registry::ResultTree;
pub use vulnerability::{Occurrence, Vulnerability};
