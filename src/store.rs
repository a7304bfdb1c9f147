//! On-disk layout for batch runs.
//!
//! Batch mode mirrors the three-stage workflow: `raw/<run>.pdf.txt` holds the
//! cleaned extraction, `processed/<run>/` one file per section, and
//! `summaries/<run>/` one summary per section file, all under the configured
//! data directory.

use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-]+").expect("valid slug regex"));

/// Filesystem layout for one named batch run.
#[derive(Debug, Clone)]
pub struct RunLayout {
    data_dir: PathBuf,
    run: String,
}

impl RunLayout {
    /// Create the layout for `run` under the given data directory.
    pub fn new(data_dir: &Path, run: &str) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            run: run.to_string(),
        }
    }

    /// Cleaned raw-text snapshot written by the extract stage.
    pub fn raw_text_path(&self) -> PathBuf {
        self.data_dir.join("raw").join(format!("{}.pdf.txt", self.run))
    }

    /// Directory holding one `<slug>.txt` file per detected section.
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed").join(&self.run)
    }

    /// Directory holding one summary file per section file.
    pub fn summaries_dir(&self) -> PathBuf {
        self.data_dir.join("summaries").join(&self.run)
    }
}

/// Turn a section title into a filesystem-safe file stem: lower-cased, with
/// runs of non-word characters replaced by a single underscore.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    NON_WORD
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

/// Write `contents` to `path`, creating parent directories as needed.
pub fn write_with_parents(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// Enumerate the `.txt` section files of a run directory in sorted order.
pub fn section_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("txt"))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_underscores() {
        assert_eq!(slugify("Work Experience"), "work_experience");
        assert_eq!(slugify("  Skills & Tools  "), "skills_tools");
        assert_eq!(slugify("1. Introduction"), "1_introduction");
    }

    #[test]
    fn slugify_trims_edge_underscores() {
        assert_eq!(slugify("(Notes)"), "notes");
    }

    #[test]
    fn layout_paths_follow_run_name() {
        let layout = RunLayout::new(Path::new("data"), "demo");
        assert_eq!(layout.raw_text_path(), Path::new("data/raw/demo.pdf.txt"));
        assert_eq!(layout.processed_dir(), Path::new("data/processed/demo"));
        assert_eq!(layout.summaries_dir(), Path::new("data/summaries/demo"));
    }

    #[test]
    fn section_files_are_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b_section.txt", "a_section.txt", "notes.md"] {
            fs::write(dir.path().join(name), "body").unwrap();
        }
        let files = section_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a_section.txt", "b_section.txt"]);
    }

    #[test]
    fn section_files_of_missing_dir_is_empty() {
        assert!(section_files(Path::new("no/such/dir")).is_empty());
    }
}
