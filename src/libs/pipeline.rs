use crate::libs::config::Config;
use crate::libs::extract::{count_blocks, Extractor};
use crate::libs::invoke::{invoke_query, Aligner};
use crate::libs::io::{file_name, list_files};
use crate::libs::summary::{QuerySummary, Summary};
use crate::libs::table::{save_records, QueryResultTable};
use anyhow::Context;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Where each artifact of a run goes.
///
/// `<q>` and `<t>` are full file names, so `a.pdb` and `a.cif` never share
/// an artifact.
///
/// ```text
/// <root>/raw/<q>/<t>.aln         one report per pair
/// <root>/reports/<q>.aln         reports of a query, concatenated
/// <root>/tables/<q>.tab          parsed, report order
/// <root>/sorted/<q>_sorted.tab   parsed, best first
/// <root>/stacks/<q>.tab          sorted hits above the threshold
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn create(&self) -> anyhow::Result<()> {
        for dir in ["raw", "reports", "tables", "sorted", "stacks"] {
            let path = self.root.join(dir);
            std::fs::create_dir_all(&path)
                .with_context(|| format!("could not create {}", path.display()))?;
        }
        Ok(())
    }

    pub fn raw_dir(&self, query: &str) -> PathBuf {
        self.root.join("raw").join(query)
    }

    pub fn report(&self, query: &str) -> PathBuf {
        self.root.join("reports").join(format!("{}.aln", query))
    }

    pub fn table(&self, query: &str) -> PathBuf {
        self.root.join("tables").join(format!("{}.tab", query))
    }

    pub fn sorted(&self, query: &str) -> PathBuf {
        self.root.join("sorted").join(format!("{}_sorted.tab", query))
    }

    pub fn stack(&self, query: &str) -> PathBuf {
        self.root.join("stacks").join(format!("{}.tab", query))
    }
}

/// Aligns every query against every template and writes all tables.
pub struct Pipeline<'a, A: Aligner + ?Sized> {
    config: &'a Config,
    aligner: &'a A,
    extractor: Extractor,
    layout: OutputLayout,
}

impl<'a, A: Aligner + ?Sized> Pipeline<'a, A> {
    pub fn new(config: &'a Config, aligner: &'a A) -> Self {
        Self {
            config,
            aligner,
            extractor: Extractor::new(config.score),
            layout: OutputLayout::new(&config.outdir),
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Runs all queries, then writes the two summary tables.
    pub fn run(&self, query_dir: &Path, template_dir: &Path) -> anyhow::Result<Summary> {
        let queries = list_files(query_dir)?;
        let templates = list_files(template_dir)?;
        log::info!(
            "{} queries x {} templates",
            queries.len(),
            templates.len()
        );

        self.layout.create()?;

        let summary: Summary = if self.config.parallel > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.parallel)
                .build()?;
            pool.install(|| {
                queries
                    .par_iter()
                    .map(|q| self.process_query(q, &templates))
                    .collect::<anyhow::Result<Vec<_>>>()
            })?
            .into_iter()
            .collect()
        } else {
            queries
                .iter()
                .map(|q| self.process_query(q, &templates))
                .collect::<anyhow::Result<Summary>>()?
        };

        let results_file = self.config.results_file();
        summary.save_results(&results_file)?;
        let counts_file = self.config.counts_file();
        summary.save_counts(&counts_file)?;
        log::info!("Summary: {}", results_file.display());
        log::info!("Counts: {}", counts_file.display());

        Ok(summary)
    }

    /// Invoke, extract, sort and filter one query, saving its tables.
    pub fn process_query(&self, query: &Path, templates: &[PathBuf]) -> anyhow::Result<QuerySummary> {
        let name = file_name(query);

        let blob = invoke_query(
            self.aligner,
            query,
            templates,
            Some(self.layout.raw_dir(&name).as_path()),
        )?;
        let report = self.layout.report(&name);
        std::fs::write(&report, &blob)
            .with_context(|| format!("could not write {}", report.display()))?;

        let records: Vec<_> = self.extractor.records(&name, &blob).collect();
        let dropped = count_blocks(&blob).saturating_sub(records.len());
        if dropped > 0 {
            log::info!("{}: {} alignment(s) without a usable TM-score", name, dropped);
        }
        save_records(&self.layout.table(&name), &records)?;

        let results = QueryResultTable::from_records(records);
        save_records(&self.layout.sorted(&name), results.records())?;

        let stack = results.stack(self.config.threshold);
        save_records(&self.layout.stack(&name), stack.records())?;

        log::info!(
            "{}: {} hit(s), {} with TM-score >= {}",
            name,
            results.len(),
            stack.len(),
            self.config.threshold
        );

        Ok(QuerySummary {
            query: name,
            results,
            stack,
        })
    }
}

/// Wall-clock time as `hh:mm:ss.ss`.
pub fn format_elapsed(elapsed: std::time::Duration) -> String {
    let secs = elapsed.as_secs_f64();
    let h = (secs / 3600.0).floor();
    let m = ((secs - h * 3600.0) / 60.0).floor();
    let s = secs - h * 3600.0 - m * 60.0;
    format!("{:02}:{:02}:{:05.2}", h as u64, m as u64, s)
}
