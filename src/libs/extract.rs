//! Pulls [`AlignmentRecord`]s out of raw TM-align reports.
//!
//! A report (or several of them concatenated) is cut into blocks at the
//! TM-align banner. Each block is matched against an ordered grammar of
//! `field -> pattern` rules; blocks missing a required field, or holding a
//! field that is not a valid number, yield nothing.

use crate::libs::record::{AlignmentRecord, ScoreField};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

lazy_static! {
    static ref RE_BANNER: Regex = Regex::new(r"\*+\s*TM-align.*?\*+").unwrap();
    static ref TMALIGN_GRAMMAR: Vec<FieldRule> = vec![
        FieldRule::required(
            "template",
            r"(?m)Name of Chain_2:[ \t]*(.+?)[ \t]*(?:\(.*\))?[ \t\r]*$"
        ),
        FieldRule::optional("qlen", r"Length of Chain_1:\s*(\d+)"),
        FieldRule::optional("tlen", r"Length of Chain_2:\s*(\d+)"),
        FieldRule::optional("aligned", r"Aligned length=\s*(\d+)"),
        FieldRule::optional("rmsd", r"RMSD=\s*([\d.]+)"),
        FieldRule::optional("ident", r"Seq_ID=n_identical/n_aligned=\s*([\d.]+)"),
        FieldRule::required(
            "tm1",
            r"TM-score=\s*([\d.]+)\s*\(if normalized by length of Chain_1"
        ),
        FieldRule::required(
            "tm2",
            r"TM-score=\s*([\d.]+)\s*\(if normalized by length of Chain_2"
        ),
    ];
}

/// One line of the report grammar. The first capture group is the value.
#[derive(Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub required: bool,
}

impl FieldRule {
    fn required(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            required: true,
        }
    }

    fn optional(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            required: false,
        }
    }
}

/// Number of alignment blocks in a report, matched or not.
pub fn count_blocks(text: &str) -> usize {
    RE_BANNER.find_iter(text).count()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    score: ScoreField,
}

impl Extractor {
    pub fn new(score: ScoreField) -> Self {
        Self { score }
    }

    pub fn grammar(&self) -> &'static [FieldRule] {
        &TMALIGN_GRAMMAR
    }

    /// Records of `query` in report order, one per block that matches.
    pub fn records<'a>(
        &'a self,
        query: &'a str,
        text: &'a str,
    ) -> impl Iterator<Item = AlignmentRecord> + 'a {
        RE_BANNER
            .split(text)
            .skip(1)
            .filter_map(move |block| {
                let record = self.parse_block(query, block);
                if record.is_none() {
                    log::debug!("{}: skip a block without a usable alignment", query);
                }
                record
            })
    }

    /// Applies the grammar to one block.
    pub fn parse_block(&self, query: &str, block: &str) -> Option<AlignmentRecord> {
        let mut fields: HashMap<&str, &str> = HashMap::new();
        for rule in self.grammar() {
            match rule.pattern.captures(block).and_then(|c| c.get(1)) {
                Some(m) => {
                    fields.insert(rule.name, m.as_str());
                }
                None if rule.required => return None,
                None => {}
            }
        }

        let template = Path::new(fields["template"])
            .file_name()?
            .to_string_lossy()
            .to_string();
        let tm1: f64 = fields["tm1"].parse().ok()?;
        let tm2: f64 = fields["tm2"].parse().ok()?;
        if !(0.0..=1.0).contains(&tm1) || !(0.0..=1.0).contains(&tm2) {
            return None;
        }

        Some(AlignmentRecord {
            query: query.to_string(),
            template,
            qlen: parse_opt(&fields, "qlen")?,
            tlen: parse_opt(&fields, "tlen")?,
            aligned: parse_opt(&fields, "aligned")?,
            rmsd: parse_opt(&fields, "rmsd")?,
            ident: parse_opt(&fields, "ident")?,
            tm1,
            tm2,
            tm_score: self.score.pick(tm1, tm2),
        })
    }
}

// Outer None: the field is present but malformed
fn parse_opt<T: FromStr>(fields: &HashMap<&str, &str>, name: &str) -> Option<Option<T>> {
    match fields.get(name) {
        Some(s) => s.parse().ok().map(Some),
        None => Some(None),
    }
}
