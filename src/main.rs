// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! # punch — command-line front end
//!
//! Loads `todo.cfg`, runs one command and prints its events. Errors go to stderr
//! with exit status 1. Set `PUNCH_LOG=debug` to trace file access on stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
#[cfg(unix)]
use libc::{signal, SIG_IGN};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use punch::commands::{self, Command};
use punch::config::{Config, DEFAULT_CONFIG};
use punch::event::{Event, Notifier};

#[derive(Parser, Debug)]
#[command(name = "punch", version, about = "A time tracker for todo.txt tasks")]
struct Cli {
    /// Configuration file defining TODO_DIR (and optionally TODO_FILE)
    #[arg(short, long, env = "PUNCH_CONFIG", default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Renders events as plain text lines.
struct Console<W: Write> {
    out: W,
    /// Date of the last report header written.
    report_date: Option<NaiveDate>,
    /// First write failure, reported once the command has finished.
    error: Option<io::Error>,
}

impl<W: Write> Console<W> {
    fn new(out: W) -> Self {
        Console {
            out,
            report_date: None,
            error: None,
        }
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            self.record(e);
        }
    }

    fn record(&mut self, e: io::Error) {
        // A closed pipe (e.g. `punch report | head`) is not an error.
        if e.kind() != io::ErrorKind::BrokenPipe && self.error.is_none() {
            self.error = Some(e);
        }
    }

    /// Flushes the output and surfaces the first write failure, if any.
    fn finish(mut self) -> punch::Result<()> {
        if let Err(e) = self.out.flush() {
            self.record(e);
        }
        match self.error {
            Some(e) => Err(punch::Error::OutputUnavailable(e)),
            None => Ok(()),
        }
    }
}

impl<W: Write> Notifier for Console<W> {
    fn notify(&mut self, event: Event) {
        match event {
            Event::TaskStarted(task) => self.line(&format!("Start timer on: {}", task)),
            Event::TaskStopped(task) => self.line(&format!("Stop timer on: {}", task)),
            Event::ActiveTask { task, duration } => {
                self.line(&format!("Active task: {} {}", task, duration))
            }
            Event::NoActiveTask => self.line("No task is active."),
            Event::ReportLine {
                date,
                task,
                duration,
            } => {
                if self.report_date != Some(date) {
                    self.report_date = Some(date);
                    self.line(&format!("{}:", date.format("%Y-%m-%d")));
                }
                self.line(&format!("\t{} {}", task, duration));
            }
        }
    }
}

fn run(cli: &Cli, command: &Command) -> punch::Result<()> {
    let config = Config::load(&cli.config)?;
    let stdout = io::stdout();
    let mut console = Console::new(stdout.lock());
    commands::run(&config, command, &mut console)?;
    if *command == Command::Report && console.report_date.is_none() {
        console.line("No punch records found.");
    }
    console.finish()
}

fn main() {
    #[cfg(unix)]
    unsafe {
        signal(libc::SIGPIPE, SIG_IGN);
    }
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(false)
        .without_time()
        .with_env_filter(
            EnvFilter::try_from_env("PUNCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    debug!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let Some(command) = cli.command.as_ref() else {
        let _ = Cli::command().print_help();
        return;
    };
    if let Err(e) = run(&cli, command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
