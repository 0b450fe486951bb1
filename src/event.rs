// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Notifications emitted by the punch commands. Rendering is left to the caller.

use chrono::NaiveDate;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    TaskStarted(String),
    TaskStopped(String),
    /// Open task and its elapsed duration, already formatted.
    ActiveTask { task: String, duration: String },
    NoActiveTask,
    /// One aggregated (day, task) row of the report, in report order.
    ReportLine {
        date: NaiveDate,
        task: String,
        duration: String,
    },
}

pub trait Notifier {
    fn notify(&mut self, event: Event);
}

/// Collects events in order; used by tests and by callers that render later.
impl Notifier for Vec<Event> {
    fn notify(&mut self, event: Event) {
        self.push(event);
    }
}
