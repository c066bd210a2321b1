//! Append-only side file receiving one bigram vector line per document.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::errors::{Result, ResultExt};

/// Line-at-a-time appender. Each line is flushed as soon as it is written, so
/// an interrupted run leaves only whole lines behind.
pub struct SideOutput {
    path: PathBuf,
    file: File,
    lines_written: usize,
}

impl SideOutput {
    /// Open (creating if needed) the side file in append mode.
    pub fn open_append(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open side file {}", path.display()))?;
        debug!("Appending bigram vectors to {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            file,
            lines_written: 0,
        })
    }

    /// Append one complete line (including its trailing newline).
    pub fn append_line(&mut self, line: &str) -> Result<()> {
        self.file
            .write_all(line.as_bytes())
            .and_then(|()| self.file.flush())
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        self.lines_written += 1;
        Ok(())
    }

    /// Lines appended during this run
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }
}
