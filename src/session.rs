// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Punch in / punch out.
//!
//! The session is either idle (last record complete, or nothing logged) or active
//! (last record open). The state is read back from the log on every call.
//! There is no locking: concurrent invocations can interleave appends.

use tracing::{debug, info};

use crate::error::Result;
use crate::event::{Event, Notifier};
use crate::punch_log::{check_task, PunchLog};
use crate::timecode::{format_duration, minutes_between, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Active,
}

pub fn state(log: &PunchLog) -> Result<State> {
    Ok(if log.last_record()?.is_complete() {
        State::Idle
    } else {
        State::Active
    })
}

/// Starts timing `task` now, closing any session left open.
pub fn punch_in(log: &PunchLog, task: &str, notifier: &mut impl Notifier) -> Result<()> {
    punch_in_at(log, task, Timestamp::now(), notifier)
}

/// Starts timing `task` at `now`. An open session is closed at the same instant first.
pub fn punch_in_at(
    log: &PunchLog,
    task: &str,
    now: Timestamp,
    notifier: &mut impl Notifier,
) -> Result<()> {
    check_task(task)?;
    if state(log)? == State::Active {
        info!(%now, "previous task still open, closing it");
        punch_out_at(log, now, notifier)?;
    }
    log.append_open(task, &now)?;
    debug!(task, "state: idle -> active");
    notifier.notify(Event::TaskStarted(task.to_string()));
    Ok(())
}

/// Stops the open session now.
pub fn punch_out(log: &PunchLog, notifier: &mut impl Notifier) -> Result<()> {
    punch_out_at(log, Timestamp::now(), notifier)
}

/// Stops the open session at `now`; fails with `Error::NoOpenTask` when idle.
pub fn punch_out_at(log: &PunchLog, now: Timestamp, notifier: &mut impl Notifier) -> Result<()> {
    let closed = log.append_close(&now)?;
    let task = closed.task().unwrap_or_default().to_string();
    debug!(task = %task, "state: active -> idle");
    notifier.notify(Event::TaskStopped(task));
    Ok(())
}

/// Reports the open task and how long it has been running.
pub fn what(log: &PunchLog, notifier: &mut impl Notifier) -> Result<()> {
    what_at(log, Timestamp::now(), notifier)
}

pub fn what_at(log: &PunchLog, now: Timestamp, notifier: &mut impl Notifier) -> Result<()> {
    let last = log.last_record()?;
    let event = match last.open_session() {
        Some((task, start)) => Event::ActiveTask {
            task: task.to_string(),
            duration: format_duration(minutes_between(&start?, &now)),
        },
        None => Event::NoActiveTask,
    };
    notifier.notify(event);
    Ok(())
}
