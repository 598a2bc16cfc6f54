use crate::libs::record::ScoreField;
use std::path::PathBuf;

/// Settings of one batch run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix of the summary tables
    pub analysis_name: String,
    /// Minimal TM-score of a stack hit
    pub threshold: f64,
    pub score: ScoreField,
    /// TM-align executable, a name in PATH or a path
    pub exe: String,
    pub outdir: PathBuf,
    /// Date stamp of the summary tables, `%Y%m%d`
    pub date: String,
    /// Queries processed at once
    pub parallel: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis_name: "my_job".to_string(),
            threshold: 0.4,
            score: ScoreField::Max,
            exe: "TMalign".to_string(),
            outdir: PathBuf::from("tm_out"),
            date: today(),
            parallel: 1,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            anyhow::bail!("Threshold must be within [0, 1], got {}", self.threshold);
        }
        if self.analysis_name.is_empty() {
            anyhow::bail!("Analysis name cannot be empty");
        }
        if self.parallel == 0 {
            anyhow::bail!("--parallel must be at least 1");
        }
        Ok(())
    }

    pub fn results_file(&self) -> PathBuf {
        self.outdir
            .join(format!("{}_all_results_{}.tab", self.analysis_name, self.date))
    }

    pub fn counts_file(&self) -> PathBuf {
        self.outdir
            .join(format!("{}_stack_counts_{}.tab", self.analysis_name, self.date))
    }
}

pub fn today() -> String {
    chrono::Local::now().format("%Y%m%d").to_string()
}
