use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a run writes its tables and figures
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub result_dir: PathBuf,
    pub figure_dir: PathBuf,
}

impl OutputLayout {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(result_dir: P, figure_dir: Q) -> Self {
        Self {
            result_dir: result_dir.as_ref().to_path_buf(),
            figure_dir: figure_dir.as_ref().to_path_buf(),
        }
    }

    /// "gini_journals.tsv" -> "<result_dir>/gini_journals.tsv"
    pub fn result_path(&self, file_name: &str) -> PathBuf {
        self.result_dir.join(file_name)
    }

    /// "lorenz_first_..." -> "<figure_dir>/lorenz_first_....svg"
    pub fn figure_path(&self, stem: &str) -> PathBuf {
        self.figure_dir.join(format!("{}.svg", stem))
    }

    pub fn ensure_result_dir(&self) -> Result<()> {
        create_dir(&self.result_dir)
    }

    pub fn ensure_figure_dir(&self) -> Result<()> {
        create_dir(&self.figure_dir)
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}
