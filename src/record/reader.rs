use anyhow::{anyhow, Context, Result};
use flate2::read::MultiGzDecoder;
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::{Path, PathBuf};

use super::ArticleRecord;
use crate::common::create_bytes_progress_bar;

/// Streams `ArticleRecord`s from a JSONL file, gzip-compressed when the path
/// ends in `.gz` (every member of a multi-member file is read). Each line is parsed once and dropped; blank lines are
/// skipped and a malformed line ends the stream with an error.
pub struct RecordReader {
    path: PathBuf,
    lines: Lines<Box<dyn BufRead>>,
    line_number: usize,
    progress: Option<ProgressBar>,
}

impl RecordReader {
    pub fn open(path: &Path, show_progress: bool) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!("Input file does not exist: {}", path.display()));
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open input file: {}", path.display()))?;

        let progress = if show_progress {
            let total = file.metadata().map(|m| m.len()).unwrap_or(0);
            Some(create_bytes_progress_bar(total, "Reading records..."))
        } else {
            None
        };

        let raw: Box<dyn Read> = match &progress {
            Some(pb) => Box::new(pb.wrap_read(file)),
            None => Box::new(file),
        };

        let is_gzip = path.extension().map_or(false, |ext| ext == "gz");
        let reader: Box<dyn BufRead> = if is_gzip {
            Box::new(BufReader::new(MultiGzDecoder::new(raw)))
        } else {
            Box::new(BufReader::new(raw))
        };

        Ok(Self {
            path: path.to_path_buf(),
            lines: reader.lines(),
            line_number: 0,
            progress,
        })
    }

    /// Lines consumed so far, blank ones included
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    fn finish_progress(&mut self) {
        if let Some(pb) = self.progress.take() {
            pb.finish_with_message("Input read complete");
        }
    }
}

impl Iterator for RecordReader {
    type Item = Result<ArticleRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next() {
                Some(line) => line,
                None => {
                    self.finish_progress();
                    return None;
                }
            };
            self.line_number += 1;

            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    self.finish_progress();
                    return Some(Err(anyhow!(e).context(format!(
                        "Failed to read line {} of {}",
                        self.line_number,
                        self.path.display()
                    ))));
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let parsed = serde_json::from_str::<ArticleRecord>(line.trim()).with_context(|| {
                format!(
                    "Failed to parse record at line {} of {}",
                    self.line_number,
                    self.path.display()
                )
            });
            if parsed.is_err() {
                self.finish_progress();
            }
            return Some(parsed);
        }
    }
}
