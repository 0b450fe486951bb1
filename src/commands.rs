// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Subcommands and their dispatch onto the punch log.

use clap::Subcommand;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::event::Notifier;
use crate::punch_log::PunchLog;
use crate::report;
use crate::session;
use crate::tasks::TaskList;

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the timer for a task (stops the running one first)
    In {
        /// Line number of the task in the task file
        line: String,
        /// Task file in TODO_DIR to read instead of TODO_FILE (e.g. projects.txt)
        file: Option<String>,
    },
    /// Stop the timer for the current task
    Out,
    /// Show the active task and how long it has been running
    #[command(alias = "wh")]
    What,
    /// Minutes worked per task for each day
    #[command(alias = "rep")]
    Report,
}

/// Parses a 1-based task line number.
pub fn parse_line_number(arg: &str) -> Result<usize> {
    arg.trim()
        .parse::<usize>()
        .map_err(|_| Error::InvalidCommand(format!("{:?} is not a line number", arg)))
}

/// Task file names are resolved inside TODO_DIR and must not leave it.
fn check_file_name(name: &str) -> Result<&str> {
    if name.is_empty() || name.contains(['/', '\\']) || name == ".." || name == "." {
        return Err(Error::InvalidCommand(format!(
            "{:?} is not a file name in TODO_DIR",
            name
        )));
    }
    Ok(name)
}

/// Runs one command against the configured log. Every call re-reads the log.
pub fn run(config: &Config, command: &Command, notifier: &mut impl Notifier) -> Result<()> {
    let log = PunchLog::new(config.log_path());
    debug!(?command, log = %log.path().display(), "running command");
    match command {
        Command::In { line, file } => {
            let line = parse_line_number(line)?;
            let file = file.as_deref().map(check_file_name).transpose()?;
            let tasks = TaskList::load(&config.task_file_path(file))?;
            let task = tasks.resolve(line)?;
            session::punch_in(&log, &task, notifier)
        }
        Command::Out => session::punch_out(&log, notifier),
        Command::What => session::what(&log, notifier),
        Command::Report => report::report(&log, notifier),
    }
}
