use std::fmt;
use std::str::FromStr;

/// Column names of every result table, in output order.
pub const HEADER: [&str; 10] = [
    "query", "template", "qlen", "tlen", "aligned", "RMSD", "ident", "TM1", "TM2", "TM-score",
];

/// Which normalization of the TM-score ranks and filters the hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreField {
    /// The larger of the two normalized scores
    #[default]
    Max,
    /// Normalized by the length of the query (Chain_1)
    Chain1,
    /// Normalized by the length of the template (Chain_2)
    Chain2,
}

impl ScoreField {
    pub fn pick(&self, tm1: f64, tm2: f64) -> f64 {
        match self {
            ScoreField::Max => tm1.max(tm2),
            ScoreField::Chain1 => tm1,
            ScoreField::Chain2 => tm2,
        }
    }
}

impl FromStr for ScoreField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max" => Ok(ScoreField::Max),
            "tm1" => Ok(ScoreField::Chain1),
            "tm2" => Ok(ScoreField::Chain2),
            _ => anyhow::bail!("Unknown score field: {}", s),
        }
    }
}

/// One successful TM-align comparison.
///
/// `query`, `template` and the three scores are always present. The remaining
/// metrics are kept when the report carries them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignmentRecord {
    pub query: String,
    pub template: String,
    pub qlen: Option<usize>,
    pub tlen: Option<usize>,
    pub aligned: Option<usize>,
    pub rmsd: Option<f64>,
    pub ident: Option<f64>,
    pub tm1: f64,
    pub tm2: f64,
    /// The ranking score, one of `tm1`/`tm2` per [`ScoreField`]
    pub tm_score: f64,
}

fn opt<T: fmt::Display>(v: &Option<T>) -> String {
    v.as_ref().map(|x| x.to_string()).unwrap_or_default()
}

impl fmt::Display for AlignmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.query,
            self.template,
            opt(&self.qlen),
            opt(&self.tlen),
            opt(&self.aligned),
            opt(&self.rmsd),
            opt(&self.ident),
            self.tm1,
            self.tm2,
            self.tm_score,
        )
    }
}
