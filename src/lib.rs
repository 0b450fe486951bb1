// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! # punch — time tracker for todo.txt
//!
//! Punch in on a task by its line number in a task file, punch out when done, and
//! report minutes worked per task for each day. Sessions are kept in an
//! append-only, tab-delimited log (`TODO_DIR/punch.dat`); see [`punch_log`].
//!
//! | Command  | Description |
//! |----------|-------------|
//! | `in`     | Start the timer on line N of the task file; closes a running session first. |
//! | `out`    | Stop the timer on the running session. |
//! | `what`   | Show the running task and elapsed time (`wh`). |
//! | `report` | Per-day, per-task totals (`rep`). |

pub mod commands;
pub mod config;
pub mod error;
pub mod event;
pub mod punch_log;
pub mod report;
pub mod session;
pub mod tasks;
pub mod timecode;

pub use error::{Error, Result};
