use crate::libs::io::file_name;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Something that compares two structure files and returns its textual report.
pub trait Aligner: Sync {
    fn name(&self) -> &str;

    fn align(&self, query: &Path, template: &Path) -> anyhow::Result<String>;
}

/// Runs `<exe> <query> <template>` and captures stdout.
#[derive(Debug, Clone)]
pub struct TmAlign {
    exe: String,
}

impl TmAlign {
    pub fn new(exe: &str) -> Self {
        Self {
            exe: exe.to_string(),
        }
    }

    /// Fails when the executable cannot be found.
    pub fn check(&self) -> anyhow::Result<()> {
        if which::which(&self.exe).is_err() {
            anyhow::bail!("{} not found in PATH. Please install TM-align first.", self.exe);
        }
        Ok(())
    }
}

impl Default for TmAlign {
    fn default() -> Self {
        Self::new("TMalign")
    }
}

impl Aligner for TmAlign {
    fn name(&self) -> &str {
        &self.exe
    }

    fn align(&self, query: &Path, template: &Path) -> anyhow::Result<String> {
        let output = Command::new(&self.exe)
            .arg(query)
            .arg(template)
            .output()
            .with_context(|| format!("Failed to execute {}", self.exe))?;

        if !output.status.success() {
            anyhow::bail!(
                "{} exited with {}: {}",
                self.exe,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Aligns `query` against every template, in order, and concatenates the reports.
///
/// With `raw_dir`, each report is also saved there as `<template>.aln`,
/// keyed by the full template file name. A pair whose alignment fails is
/// reported and left out; only I/O errors on `raw_dir` abort.
pub fn invoke_query<A>(
    aligner: &A,
    query: &Path,
    templates: &[PathBuf],
    raw_dir: Option<&Path>,
) -> anyhow::Result<String>
where
    A: Aligner + ?Sized,
{
    if let Some(dir) = raw_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("could not create {}", dir.display()))?;
    }

    let q_name = file_name(query);
    let mut blob = String::new();
    for template in templates {
        let t_name = file_name(template);
        match aligner.align(query, template) {
            Ok(report) => {
                if let Some(dir) = raw_dir {
                    let out_path = dir.join(format!("{}.aln", t_name));
                    std::fs::write(&out_path, &report)
                        .with_context(|| format!("could not write {}", out_path.display()))?;
                }
                blob.push_str(&report);
            }
            Err(err) => {
                log::warn!("{} failed for {} vs {}: {:#}", aligner.name(), q_name, t_name, err);
            }
        }
    }

    Ok(blob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::io::file_stem;

    struct Echo;

    impl Aligner for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn align(&self, query: &Path, template: &Path) -> anyhow::Result<String> {
            let t = file_stem(template);
            if t == "bad" {
                anyhow::bail!("incompatible chains");
            }
            Ok(format!("{}:{}\n", file_stem(query), t))
        }
    }

    #[test]
    fn concatenates_in_template_order() {
        let templates: Vec<PathBuf> = ["t/b.pdb", "t/a.pdb", "t/c.pdb"]
            .iter()
            .map(PathBuf::from)
            .collect();
        let blob = invoke_query(&Echo, Path::new("q/q1.pdb"), &templates, None).unwrap();
        assert_eq!(blob, "q1:b\nq1:a\nq1:c\n");
    }

    #[test]
    fn failed_pairs_are_left_out() {
        let dir = tempfile::TempDir::new().unwrap();
        let raw_dir = dir.path().join("raw").join("q1");
        let templates: Vec<PathBuf> = ["t/a.pdb", "t/bad.pdb", "t/c.pdb"]
            .iter()
            .map(PathBuf::from)
            .collect();

        let blob = invoke_query(&Echo, Path::new("q/q1.pdb"), &templates, Some(raw_dir.as_path())).unwrap();
        assert_eq!(blob, "q1:a\nq1:c\n");

        assert!(raw_dir.join("a.pdb.aln").is_file());
        assert!(!raw_dir.join("bad.pdb.aln").exists());
        assert_eq!(std::fs::read_to_string(raw_dir.join("c.pdb.aln")).unwrap(), "q1:c\n");
    }

    #[test]
    fn templates_sharing_a_stem_keep_their_reports() {
        let dir = tempfile::TempDir::new().unwrap();
        let raw_dir = dir.path().join("raw").join("q1.pdb");
        let templates: Vec<PathBuf> = ["t/a.cif", "t/a.pdb"].iter().map(PathBuf::from).collect();

        invoke_query(&Echo, Path::new("q/q1.pdb"), &templates, Some(raw_dir.as_path())).unwrap();
        assert!(raw_dir.join("a.cif.aln").is_file());
        assert!(raw_dir.join("a.pdb.aln").is_file());
    }

    #[test]
    fn no_templates() {
        let blob = invoke_query(&Echo, Path::new("q/q1.pdb"), &[], None).unwrap();
        assert!(blob.is_empty());
    }

    #[test]
    fn missing_executable() {
        let tm = TmAlign::new("surely-not-a-real-tmalign-binary");
        assert!(tm.check().is_err());
        assert!(tm
            .align(Path::new("q1.pdb"), Path::new("t1.pdb"))
            .is_err());
    }
}
