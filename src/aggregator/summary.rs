//! Summary table rows built from aggregated collections.

use serde::Serialize;

use super::collections::Collections;
use crate::severity::Level;

/// One row of the level summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelRow {
    pub level: Level,
    pub count: usize,
    pub host_count: usize,
}

/// Level summary table with its totals row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// One row per level, most severe first.
    pub levels: Vec<LevelRow>,
    pub total_vulnerabilities: usize,
    /// Sum of the per-level host counts; a host affected at two levels is
    /// counted twice, matching the column total of the table.
    pub total_host_count: usize,
    pub distinct_hosts: usize,
    pub families: usize,
}

impl Summary {
    pub fn row(&self, level: Level) -> Option<&LevelRow> {
        self.levels.iter().find(|r| r.level == level)
    }
}

/// Builder for level summaries.
#[derive(Debug)]
pub struct SummaryBuilder<'c, 'a> {
    collections: Option<&'c Collections<'a>>,
}

impl Default for SummaryBuilder<'_, '_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c, 'a> SummaryBuilder<'c, 'a> {
    pub fn new() -> Self {
        Self { collections: None }
    }

    pub fn with_collections(mut self, collections: &'c Collections<'a>) -> Self {
        self.collections = Some(collections);
        self
    }

    pub fn build(self) -> Summary {
        let Some(collections) = self.collections else {
            return Summary {
                levels: Level::ALL
                    .into_iter()
                    .map(|level| LevelRow {
                        level,
                        count: 0,
                        host_count: 0,
                    })
                    .collect(),
                total_vulnerabilities: 0,
                total_host_count: 0,
                distinct_hosts: 0,
                families: 0,
            };
        };

        let levels: Vec<LevelRow> = Level::ALL
            .into_iter()
            .map(|level| LevelRow {
                level,
                count: collections.level_counts[level],
                host_count: collections.affected_host_counts[level],
            })
            .collect();

        Summary {
            total_vulnerabilities: levels.iter().map(|r| r.count).sum(),
            total_host_count: levels.iter().map(|r| r.host_count).sum(),
            levels,
            distinct_hosts: collections.distinct_hosts(),
            families: collections.family_counts.len(),
        }
    }
}
