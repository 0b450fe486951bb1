// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! # Punch log
//!
//! Append-only, tab-delimited log of work sessions. One record per line:
//!
//! - `task<TAB>start<TAB>end<LF>`: closed session
//! - `task<TAB>start`: open session; only ever the last line, with no line feed
//!
//! Closing a session appends `<TAB>end<LF>` to the open line, so earlier lines are
//! never rewritten. Nothing is cached: every call reads or appends to the file and
//! closes it again.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::timecode::Timestamp;

/// A log line split on tabs, before any field is interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<String>,
}

impl RawRecord {
    /// Splits a log line into fields. A blank line yields the empty record.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return RawRecord::default();
        }
        RawRecord {
            fields: line.split('\t').map(str::to_string).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True for the empty record (nothing logged yet) and for task/start/end triples.
    pub fn is_complete(&self) -> bool {
        matches!(self.fields.len(), 0 | 3)
    }

    pub fn task(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    /// The open session as `(task, start)`, when the record is exactly task and start.
    pub fn open_session(&self) -> Option<(&str, Result<Timestamp>)> {
        match self.fields.as_slice() {
            [task, start] => Some((task.as_str(), Timestamp::parse(start))),
            _ => None,
        }
    }
}

/// A closed work session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PunchRecord {
    pub task: String,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl PunchRecord {
    /// Interprets a raw log line; `None` unless it has exactly three fields.
    pub fn from_line(line: &str) -> Option<Result<PunchRecord>> {
        let fields: Vec<&str> = line.split('\t').collect();
        let [task, start, end] = fields.as_slice() else {
            return None;
        };
        Some(
            Timestamp::parse(start).and_then(|start| {
                Ok(PunchRecord {
                    task: task.to_string(),
                    start,
                    end: Timestamp::parse(end)?,
                })
            }),
        )
    }
}

/// Rejects task text that cannot be stored as the first field of a record.
pub fn check_task(task: &str) -> Result<()> {
    if task.trim().is_empty() || task.contains(['\t', '\n', '\r']) {
        return Err(Error::InvalidTask(task.to_string()));
    }
    Ok(())
}

/// Handle to the punch log file. Holds only the path.
#[derive(Clone, Debug)]
pub struct PunchLog {
    path: PathBuf,
}

impl PunchLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PunchLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, source: io::Error) -> Error {
        Error::StoreUnavailable {
            path: self.path.clone(),
            source,
        }
    }

    /// Whole log contents; a log that does not exist yet reads as empty.
    /// Bytes that are not UTF-8 (older logs written from Latin-1 task files) are
    /// replaced rather than rejected.
    fn read(&self) -> Result<String> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "punch log does not exist yet");
                Ok(String::new())
            }
            Err(e) => Err(self.unavailable(e)),
        }
    }

    /// Every line of the log in order, including a trailing open record.
    pub fn lines(&self) -> Result<Vec<String>> {
        Ok(self.read()?.lines().map(str::to_string).collect())
    }

    /// The last line of the log as a raw record; empty if nothing has been logged.
    pub fn last_record(&self) -> Result<RawRecord> {
        let content = self.read()?;
        Ok(content.lines().last().map(RawRecord::parse).unwrap_or_default())
    }

    /// Appends `task<TAB>start` as a new open record.
    pub fn append_open(&self, task: &str, start: &Timestamp) -> Result<()> {
        check_task(task)?;
        self.append(&format!("{}\t{}", task, start))?;
        debug!(task, %start, "opened punch record");
        Ok(())
    }

    /// Closes the open record by appending `<TAB>end<LF>`. Returns the record as it
    /// was before closing. Fails with [`Error::NoOpenTask`] without writing if the
    /// last record is already complete.
    pub fn append_close(&self, end: &Timestamp) -> Result<RawRecord> {
        let last = self.last_record()?;
        if last.is_complete() {
            return Err(Error::NoOpenTask);
        }
        self.append(&format!("\t{}\n", end))?;
        debug!(task = last.task().unwrap_or_default(), %end, "closed punch record");
        Ok(last)
    }

    /// Single append-mode write of a fully formatted buffer, synced before returning.
    fn append(&self, text: &str) -> Result<()> {
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.unavailable(e))?;
        f.write_all(text.as_bytes())
            .and_then(|()| f.sync_all())
            .map_err(|e| self.unavailable(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn test_raw_record_completeness() {
        assert!(RawRecord::parse("").is_complete());
        assert!(RawRecord::parse("   ").is_complete());
        assert!(RawRecord::parse("a\t20240101T090000\t20240101T100000").is_complete());
        assert!(!RawRecord::parse("a\t20240101T090000").is_complete());
        assert!(!RawRecord::parse("a").is_complete());
        assert!(!RawRecord::parse("a\tb\tc\td").is_complete());
    }

    #[test]
    fn test_raw_record_open_session() {
        let rec = RawRecord::parse("write docs\t20240101T090000");
        let (task, start) = rec.open_session().unwrap();
        assert_eq!(task, "write docs");
        assert_eq!(start.unwrap(), ts("20240101T090000"));
        assert!(RawRecord::parse("a\t20240101T090000\t20240101T100000")
            .open_session()
            .is_none());
    }

    #[test]
    fn test_punch_record_from_line() {
        let rec = PunchRecord::from_line("build\t20240101T090000\t20240101T093000")
            .unwrap()
            .unwrap();
        assert_eq!(rec.task, "build");
        assert_eq!(rec.start, ts("20240101T090000"));
        assert_eq!(rec.end, ts("20240101T093000"));
        assert!(PunchRecord::from_line("build\t20240101T090000").is_none());
        assert!(matches!(
            PunchRecord::from_line("build\tyesterday\t20240101T093000"),
            Some(Err(Error::MalformedTimestamp(_)))
        ));
    }

    #[test]
    fn test_last_record_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = PunchLog::new(dir.path().join("punch.dat"));
        let last = log.last_record().unwrap();
        assert!(last.is_empty());
        assert!(last.is_complete());
        assert!(log.lines().unwrap().is_empty());
    }

    #[test]
    fn test_last_record_empty_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("punch.dat");
        fs::write(&path, "").unwrap();
        assert!(PunchLog::new(&path).last_record().unwrap().is_empty());
    }

    #[test]
    fn test_append_open_writes_without_line_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("punch.dat");
        let log = PunchLog::new(&path);
        log.append_open("build", &ts("20240101T090000")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "build\t20240101T090000");
        assert!(!log.last_record().unwrap().is_complete());
    }

    #[test]
    fn test_append_close_completes_last_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("punch.dat");
        fs::write(&path, "old\t20231231T090000\t20231231T100000\n").unwrap();
        let log = PunchLog::new(&path);
        log.append_open("build", &ts("20240101T090000")).unwrap();
        let closed = log.append_close(&ts("20240101T093000")).unwrap();
        assert_eq!(closed.task(), Some("build"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "old\t20231231T090000\t20231231T100000\nbuild\t20240101T090000\t20240101T093000\n"
        );
        assert!(log.last_record().unwrap().is_complete());
    }

    #[test]
    fn test_append_close_when_complete_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("punch.dat");
        let content = "old\t20231231T090000\t20231231T100000\n";
        fs::write(&path, content).unwrap();
        let log = PunchLog::new(&path);
        assert!(matches!(
            log.append_close(&ts("20240101T093000")),
            Err(Error::NoOpenTask)
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_append_close_on_missing_log_does_not_create_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("punch.dat");
        let log = PunchLog::new(&path);
        assert!(matches!(
            log.append_close(&ts("20240101T093000")),
            Err(Error::NoOpenTask)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_append_open_rejects_unstorable_task() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("punch.dat");
        let log = PunchLog::new(&path);
        for bad in ["", "  ", "a\tb", "a\nb"] {
            assert!(matches!(
                log.append_open(bad, &ts("20240101T090000")),
                Err(Error::InvalidTask(_))
            ));
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_last_record_is_stable_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("punch.dat");
        fs::write(&path, "a\t20240101T090000\t20240101T100000\nb\t20240101T100000").unwrap();
        let log = PunchLog::new(&path);
        let first = log.last_record().unwrap();
        for _ in 0..3 {
            let again = log.last_record().unwrap();
            assert_eq!(again, first);
            assert_eq!(again.is_complete(), first.is_complete());
        }
        assert!(!first.is_complete());
    }

    #[test]
    fn test_non_utf8_log_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("punch.dat");
        fs::write(
            &path,
            b"caf\xe9\t20240101T090000\t20240101T093000\nth\xe9\t20240101T100000",
        )
        .unwrap();
        let log = PunchLog::new(&path);
        assert_eq!(log.lines().unwrap().len(), 2);
        let last = log.last_record().unwrap();
        assert!(!last.is_complete());
        assert_eq!(last.task(), Some("th\u{FFFD}"));

        let closed = log.append_close(&ts("20240101T103000")).unwrap();
        assert_eq!(closed.task(), Some("th\u{FFFD}"));
        assert!(log.last_record().unwrap().is_complete());
        // Existing bytes are left untouched.
        assert!(fs::read(&path).unwrap().starts_with(b"caf\xe9\t"));
    }

    #[test]
    fn test_unreadable_log_is_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file.
        let log = PunchLog::new(dir.path());
        assert!(matches!(
            log.last_record(),
            Err(Error::StoreUnavailable { .. })
        ));
        assert!(matches!(
            log.append_open("x", &ts("20240101T090000")),
            Err(Error::StoreUnavailable { .. })
        ));
    }
}
