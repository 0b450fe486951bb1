// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! # Configuration
//!
//! Reads a todo.sh style `todo.cfg`:
//!
//! ```text
//! # comment
//! export TODO_DIR="$HOME/todo"
//! TODO_FILE=${TODO_DIR}/todo.txt
//! ```
//!
//! Blank lines and `#` comments are skipped. The separator between name and value
//! may be any run of `=`, `:` and spaces. `$NAME` and `${NAME}` are replaced by an
//! earlier definition of `NAME`, or else by the environment variable. The result is
//! an immutable [`Config`] resolved once at startup.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{Error, Result};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG: &str = "todo.cfg";
/// Punch log file name inside `TODO_DIR`.
pub const LOG_FILE_NAME: &str = "punch.dat";
const DEFAULT_TODO_FILE: &str = "todo.txt";

fn definition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)[\s:=]*(.*)$")
            .expect("definition pattern is valid")
    })
}

fn variable_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
            .expect("variable pattern is valid")
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    todo_dir: PathBuf,
    todo_file: PathBuf,
}

impl Config {
    /// Loads and resolves the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::ConfigNotFound(path.to_path_buf()),
            _ => Error::ConfigUnavailable {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        let config = Config::parse(&text)?;
        debug!(config = %path.display(), todo_dir = %config.todo_dir.display(), "loaded configuration");
        Ok(config)
    }

    /// Parses config text, resolving variables against the process environment.
    pub fn parse(text: &str) -> Result<Self> {
        Config::parse_with_env(text, |name| env::var(name).ok())
    }

    pub fn parse_with_env(text: &str, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut defined: HashMap<String, String> = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(caps) = definition_re().captures(line) else {
                debug!(line, "skipping unrecognised config line");
                continue;
            };
            let name = caps[1].to_string();
            let value = substitute(unquote(caps[2].trim()), &defined, &env)?;
            defined.insert(name, value);
        }

        let todo_dir = defined
            .get("TODO_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .ok_or(Error::MissingConfigKey("TODO_DIR"))?;
        let todo_file = defined
            .get("TODO_FILE")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| todo_dir.join(DEFAULT_TODO_FILE));
        Ok(Config {
            todo_dir,
            todo_file,
        })
    }

    pub fn todo_dir(&self) -> &Path {
        &self.todo_dir
    }

    /// The punch log: `TODO_DIR/punch.dat`.
    pub fn log_path(&self) -> PathBuf {
        self.todo_dir.join(LOG_FILE_NAME)
    }

    /// `TODO_FILE`, or `TODO_DIR/<filename>` when a file name is given.
    pub fn task_file_path(&self, filename: Option<&str>) -> PathBuf {
        match filename {
            Some(name) => self.todo_dir.join(name),
            None => self.todo_file.clone(),
        }
    }
}

/// Strips one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(q).and_then(|v| v.strip_suffix(q)) {
            return inner;
        }
    }
    value
}

fn substitute(
    value: &str,
    defined: &HashMap<String, String>,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for caps in variable_re().captures_iter(value) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let name = var_name(&caps);
        let replacement = defined
            .get(name)
            .cloned()
            .or_else(|| env(name))
            .ok_or_else(|| Error::UndefinedVariable(name.to_string()))?;
        out.push_str(&value[last..whole.start]);
        out.push_str(&replacement);
        last = whole.end;
    }
    out.push_str(&value[last..]);
    Ok(out)
}

fn var_name<'h>(caps: &Captures<'h>) -> &'h str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str())
}
