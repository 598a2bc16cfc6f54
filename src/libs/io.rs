use anyhow::Context;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// ```
/// use std::io::BufRead;
/// let reader = tmstack::reader("tests/tmalign/q1.aln").unwrap();
/// let lines = reader.lines().collect::<Vec<_>>();
/// assert!(lines.len() > 10);
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = Path::new(input);
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;
        Box::new(BufReader::new(file))
    };

    Ok(reader)
}

pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .with_context(|| format!("could not create {}", output))?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}

/// Slurps a whole report, `stdin` included.
pub fn read_text(input: &str) -> anyhow::Result<String> {
    let mut text = String::new();
    reader(input)?
        .read_to_string(&mut text)
        .with_context(|| format!("could not read {}", input))?;
    Ok(text)
}

/// Regular files of `dir`, ordered by file name.
///
/// A missing or unreadable directory is an error; subdirectories are ignored.
pub fn list_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("could not list directory {}", dir.display()))?;

    let mut files = vec![];
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// File name as an identifier, e.g. `q/e1bamA1.pdb` -> `e1bamA1.pdb`.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// File stem used to build output names, e.g. `q/e1bamA1.pdb` -> `e1bamA1`.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name(path))
}
