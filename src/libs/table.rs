use crate::libs::record::{AlignmentRecord, HEADER};
use anyhow::Context;
use std::io::Write;
use std::path::Path;

/// All hits of one query, best TM-score first.
///
/// The sort is stable, so equal scores keep the order in which the
/// templates were aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResultTable {
    records: Vec<AlignmentRecord>,
}

impl QueryResultTable {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AlignmentRecord>,
    {
        let mut records: Vec<_> = records.into_iter().collect();
        records.sort_by(|a, b| b.tm_score.total_cmp(&a.tm_score));
        Self { records }
    }

    pub fn records(&self) -> &[AlignmentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows with `tm_score >= threshold`, in table order.
    pub fn stack(&self, threshold: f64) -> StackTable {
        StackTable {
            records: self
                .records
                .iter()
                .filter(|r| r.tm_score >= threshold)
                .cloned()
                .collect(),
        }
    }
}

/// The hits of a query that pass the score threshold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackTable {
    records: Vec<AlignmentRecord>,
}

impl StackTable {
    pub fn records(&self) -> &[AlignmentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Writes a header line followed by one tab-separated line per record.
pub fn write_records<'a, W, I>(writer: &mut W, records: I) -> std::io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = &'a AlignmentRecord>,
{
    writer.write_fmt(format_args!("{}\n", HEADER.join("\t")))?;
    for rec in records {
        writer.write_fmt(format_args!("{}\n", rec))?;
    }
    Ok(())
}

/// [`write_records`] into a new file. Empty input still leaves the header.
pub fn save_records<'a, I>(path: &Path, records: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = &'a AlignmentRecord>,
{
    let mut writer = crate::writer(&path.to_string_lossy())?;
    write_records(&mut writer, records)
        .and_then(|_| writer.flush())
        .with_context(|| format!("could not write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(template: &str, score: f64) -> AlignmentRecord {
        AlignmentRecord {
            query: "q1.pdb".to_string(),
            template: template.to_string(),
            tm1: score,
            tm2: score,
            tm_score: score,
            ..Default::default()
        }
    }

    fn templates(records: &[AlignmentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.template.as_str()).collect()
    }

    #[test]
    fn sorted_descending_and_stable() {
        let table = QueryResultTable::from_records(vec![
            rec("a", 0.3),
            rec("b", 0.8),
            rec("c", 0.5),
            rec("d", 0.8),
            rec("e", 0.3),
        ]);
        assert_eq!(templates(table.records()), vec!["b", "d", "c", "a", "e"]);

        for w in table.records().windows(2) {
            assert!(w[0].tm_score >= w[1].tm_score);
        }
    }

    #[test]
    fn sorting_is_idempotent() {
        let input = vec![rec("a", 0.3), rec("b", 0.8), rec("c", 0.3)];
        let once = QueryResultTable::from_records(input.clone());
        let twice = QueryResultTable::from_records(once.records().to_vec());
        assert_eq!(once, twice);
        assert_eq!(once, QueryResultTable::from_records(input));
    }

    #[test]
    fn stack_is_a_subsequence() {
        let table = QueryResultTable::from_records(vec![
            rec("a", 0.39),
            rec("b", 0.4),
            rec("c", 0.9),
            rec("d", 0.1),
        ]);

        let stack = table.stack(0.4);
        assert_eq!(templates(stack.records()), vec!["c", "b"]);

        assert_eq!(table.stack(0.0).len(), table.len());
        assert!(table.stack(0.95).is_empty());
    }

    #[test]
    fn empty_table() {
        let table = QueryResultTable::from_records(vec![]);
        assert!(table.is_empty());
        assert!(table.stack(0.4).is_empty());

        let mut buf = vec![];
        write_records(&mut buf, table.records()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{}\n", HEADER.join("\t")));
    }

    #[test]
    fn save_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("q1.tab");
        let table = QueryResultTable::from_records(vec![rec("a", 0.3), rec("b", 0.8)]);
        save_records(&path, table.records()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("query\ttemplate"));
        assert!(lines[1].starts_with("q1.pdb\tb\t"));
    }
}
