use crate::libs::record::AlignmentRecord;
use crate::libs::table::{save_records, QueryResultTable, StackTable};
use anyhow::Context;
use std::io::Write;
use std::path::Path;

/// Outcome of one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySummary {
    pub query: String,
    pub results: QueryResultTable,
    pub stack: StackTable,
}

/// Per-query outcomes, kept in query discovery order.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    entries: Vec<QuerySummary>,
}

impl Summary {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, entry: QuerySummary) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[QuerySummary] {
        &self.entries
    }

    /// Every sorted table, one query after another.
    pub fn results(&self) -> impl Iterator<Item = &AlignmentRecord> {
        self.entries.iter().flat_map(|e| e.results.records())
    }

    /// `(query, number of stack rows)` for each query.
    pub fn counts(&self) -> Vec<(&str, usize)> {
        self.entries
            .iter()
            .map(|e| (e.query.as_str(), e.stack.len()))
            .collect()
    }

    pub fn save_results(&self, path: &Path) -> anyhow::Result<()> {
        save_records(path, self.results())
    }

    pub fn save_counts(&self, path: &Path) -> anyhow::Result<()> {
        let mut writer = crate::writer(&path.to_string_lossy())?;
        let mut write = || -> std::io::Result<()> {
            writer.write_fmt(format_args!("query\tcount\n"))?;
            for (query, count) in self.counts() {
                writer.write_fmt(format_args!("{}\t{}\n", query, count))?;
            }
            writer.flush()
        };
        write().with_context(|| format!("could not write {}", path.display()))?;
        Ok(())
    }
}

impl FromIterator<QuerySummary> for Summary {
    fn from_iter<T: IntoIterator<Item = QuerySummary>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
