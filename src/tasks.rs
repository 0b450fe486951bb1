// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Task files: plain text, one task per line, addressed by 1-based line number.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Text of line `line` (1-based), trimmed. Fails with [`Error::TaskNotFound`] when out of range.
pub fn resolve<S: AsRef<str>>(lines: &[S], line: usize) -> Result<String> {
    line.checked_sub(1)
        .and_then(|i| lines.get(i))
        .map(|l| l.as_ref().trim().to_string())
        .ok_or(Error::TaskNotFound {
            line,
            count: lines.len(),
        })
}

/// Lines of a task file, read once.
#[derive(Clone, Debug, Default)]
pub struct TaskList {
    lines: Vec<String>,
}

impl TaskList {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "cannot read task file");
            match e.kind() {
                io::ErrorKind::NotFound => Error::TaskFileNotFound(path.to_path_buf()),
                _ => Error::TaskFileUnavailable {
                    path: path.to_path_buf(),
                    source: e,
                },
            }
        })?;
        // Task files in other encodings still resolve; invalid bytes are replaced.
        Ok(TaskList::from_text(&String::from_utf8_lossy(&bytes)))
    }

    /// Splits text on `\n`, `\r\n` or a bare `\r`.
    pub fn from_text(content: &str) -> Self {
        let lines = content
            .replace("\r\n", "\n")
            .split(['\n', '\r'])
            .map(str::to_string)
            .collect::<Vec<_>>();
        TaskList {
            lines: trim_trailing_empty(lines),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn resolve(&self, line: usize) -> Result<String> {
        resolve(&self.lines, line)
    }
}

/// Drops the phantom empty line left after a final line terminator.
fn trim_trailing_empty(mut lines: Vec<String>) -> Vec<String> {
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}
