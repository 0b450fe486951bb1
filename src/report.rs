// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Per-day, per-task totals of closed punch records.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::Result;
use crate::event::{Event, Notifier};
use crate::punch_log::{PunchLog, PunchRecord};
use crate::timecode::{format_duration, minutes_between};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskTotal {
    pub task: String,
    pub minutes: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayTotals {
    pub date: NaiveDate,
    /// Sorted by task text.
    pub tasks: Vec<TaskTotal>,
}

/// Days in ascending order, each with its tasks in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub days: Vec<DayTotals>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// One [`Event::ReportLine`] per (day, task), in report order.
    pub fn events(&self) -> impl Iterator<Item = Event> + '_ {
        self.days.iter().flat_map(|day| {
            day.tasks.iter().map(move |t| Event::ReportLine {
                date: day.date,
                task: t.task.clone(),
                duration: format_duration(t.minutes),
            })
        })
    }
}

/// Sums closed records by the calendar day of their start, then by task.
/// Lines that are not task/start/end triples (such as a trailing open record) are skipped.
pub fn aggregate<S: AsRef<str>>(lines: &[S]) -> Result<Report> {
    let mut by_day: BTreeMap<NaiveDate, BTreeMap<String, i64>> = BTreeMap::new();
    for (i, line) in lines.iter().enumerate() {
        let Some(record) = PunchRecord::from_line(line.as_ref()) else {
            continue;
        };
        let record = record.inspect_err(|e| warn!(line = i + 1, "{}", e))?;
        let minutes = minutes_between(&record.start, &record.end);
        *by_day
            .entry(record.start.date())
            .or_default()
            .entry(record.task)
            .or_insert(0) += minutes;
    }
    let days = by_day
        .into_iter()
        .map(|(date, tasks)| DayTotals {
            date,
            tasks: tasks
                .into_iter()
                .map(|(task, minutes)| TaskTotal { task, minutes })
                .collect(),
        })
        .collect();
    Ok(Report { days })
}

/// Reads the whole log and emits the report lines.
pub fn report(log: &PunchLog, notifier: &mut impl Notifier) -> Result<()> {
    let lines = log.lines()?;
    let report = aggregate(&lines)?;
    debug!(lines = lines.len(), days = report.days.len(), "aggregated punch log");
    for event in report.events() {
        notifier.notify(event);
    }
    Ok(())
}
