// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// `out` issued while no record is open.
    #[error("No incomplete task found.")]
    NoOpenTask,

    #[error("Item number {line} not found in file ({count} items).")]
    TaskNotFound { line: usize, count: usize },

    #[error("could not access punch log {}: {source}", .path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed timestamp {0:?} (expected YYYYMMDDTHHMMSS)")]
    MalformedTimestamp(String),

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Resolved task text cannot be stored as a tab-delimited record.
    #[error("task text {0:?} cannot be recorded (empty or contains a tab)")]
    InvalidTask(String),

    #[error("Could not find configuration file ({})", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("could not read configuration file {}: {source}", .path.display())]
    ConfigUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not defined in the configuration file")]
    MissingConfigKey(&'static str),

    #[error("undefined variable ${0} in configuration")]
    UndefinedVariable(String),

    #[error("Could not find task file {}", .0.display())]
    TaskFileNotFound(PathBuf),

    #[error("could not read task file {}: {source}", .path.display())]
    TaskFileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write output: {0}")]
    OutputUnavailable(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
