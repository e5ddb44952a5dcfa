//! Logging service - structured event logging to a JSON lines file
//!
//! Informational events (logins, checkouts, a cart running empty) are
//! appended to `logs.jsonl` in the data directory, one JSON object per line.
//! Cart contents are never logged, only event names and small context fields.
//!
//! This service is used by both the one-shot CLI commands and the shell.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Log file name inside the data directory
pub const LOG_FILENAME: &str = "logs.jsonl";

/// Get current unix timestamp in milliseconds
fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Detect the current platform
fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// Entry point for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
    Shell,
}

impl EntryPoint {
    fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Shell => "shell",
        }
    }
}

/// A log event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl LogEvent {
    /// Create a new log event with just an event name
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            username: None,
            command: None,
            detail: None,
            error_message: None,
        }
    }

    /// Set the user the event concerns
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the command context (for CLI events)
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Set a free-form detail
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set error information
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// A log entry as stored in the file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: i64,
    pub entry_point: String,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Which entries a query returns
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Exact event name, e.g. `checkout_completed`
    pub event: Option<String>,
    /// Username, compared case-insensitively
    pub username: Option<String>,
    pub errors_only: bool,
}

impl LogFilter {
    pub fn errors() -> Self {
        Self {
            errors_only: true,
            ..Self::default()
        }
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        if self.errors_only && entry.error_message.is_none() {
            return false;
        }
        if let Some(event) = &self.event {
            if &entry.event != event {
                return false;
            }
        }
        match &self.username {
            Some(user) => entry
                .username
                .as_deref()
                .is_some_and(|u| u.eq_ignore_ascii_case(user)),
            None => true,
        }
    }
}

/// Service for structured event logging
pub struct LoggingService {
    log_path: PathBuf,
    entry_point: EntryPoint,
    app_version: String,
    platform: &'static str,
}

impl LoggingService {
    /// Create a new logging service
    ///
    /// Creates the data directory if needed; the log file itself appears on
    /// the first write.
    pub fn new(
        data_dir: &Path,
        entry_point: EntryPoint,
        app_version: impl Into<String>,
    ) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

        Ok(Self {
            log_path: data_dir.join(LOG_FILENAME),
            entry_point,
            app_version: app_version.into(),
            platform: detect_platform(),
        })
    }

    /// Log an event
    ///
    /// This is the main method for recording events. The entry_point,
    /// app_version, and platform are automatically added from the service
    /// configuration.
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let entry = LogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: now_ms(),
            entry_point: self.entry_point.as_str().to_string(),
            app_version: self.app_version.clone(),
            platform: self.platform.to_string(),
            event: event.event,
            username: event.username,
            command: event.command,
            detail: event.detail,
            error_message: event.error_message,
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        FileExt::lock_exclusive(&file)?;
        let written = file.write_all(line.as_bytes());
        let _ = FileExt::unlock(&file);
        written?;

        Ok(())
    }

    /// Record a CLI or shell command, with its error if it failed
    pub fn log_command(&self, command: &str, error: Option<&str>) -> Result<()> {
        let mut event = LogEvent::new("command_executed").with_command(command);
        if let Some(message) = error {
            event = event.with_error(message);
        }
        self.log(event)
    }

    /// All entries in file order; unreadable lines are skipped
    fn read_all(&self) -> Result<Vec<LogEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.log_path)?;
        FileExt::lock_shared(&file)?;
        let entries = BufReader::new(&file)
            .lines()
            .map_while(|line| line.ok())
            .filter_map(|line| serde_json::from_str::<LogEntry>(&line).ok())
            .collect();
        let _ = FileExt::unlock(&file);
        Ok(entries)
    }

    /// Query recent log entries
    ///
    /// Returns the most recent entries first, up to the specified limit.
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut entries = self.read_all()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    /// Query log entries with errors
    pub fn get_errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.query(&LogFilter::errors(), limit)
    }

    /// Entries matching `filter`, newest first
    pub fn query(&self, filter: &LogFilter, limit: usize) -> Result<Vec<LogEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .rev()
            .filter(|e| filter.matches(e))
            .take(limit)
            .collect())
    }

    /// Number of entries per event name
    pub fn event_counts(&self) -> Result<BTreeMap<String, u64>> {
        let mut counts = BTreeMap::new();
        for entry in self.read_all()? {
            *counts.entry(entry.event).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Get the total number of log entries
    pub fn count(&self) -> Result<u64> {
        Ok(self.read_all()?.len() as u64)
    }

    /// Delete logs older than the specified timestamp (unix ms)
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = OpenOptions::new().read(true).write(true).open(&self.log_path)?;
        FileExt::lock_exclusive(&file)?;

        let (kept, deleted): (Vec<String>, Vec<String>) = BufReader::new(&file)
            .lines()
            .map_while(|line| line.ok())
            .filter(|line| !line.trim().is_empty())
            .partition(|line| {
                serde_json::from_str::<LogEntry>(line)
                    .map(|e| e.timestamp >= timestamp_ms)
                    .unwrap_or(true)
            });

        let mut content = kept.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        let result = file
            .set_len(0)
            .and_then(|_| (&file).seek(SeekFrom::Start(0)))
            .and_then(|_| (&file).write_all(content.as_bytes()));
        let _ = FileExt::unlock(&file);
        result?;

        Ok(deleted.len() as u64)
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logging_service_creation() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        service.log(LogEvent::new("first")).unwrap();
        assert!(service.log_path().exists());
    }

    #[test]
    fn test_log_entry_fields() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        service.log(LogEvent::new("test_event")).unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "test_event");
        assert_eq!(entries[0].entry_point, "cli");
        assert_eq!(entries[0].app_version, "1.0.0");
    }

    #[test]
    fn test_log_with_context() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Shell, "2.0.0").unwrap();

        service
            .log(
                LogEvent::new("user_logged_in")
                    .with_username("alice")
                    .with_command("login"),
            )
            .unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, Some("alice".to_string()));
        assert_eq!(entries[0].command, Some("login".to_string()));
        assert_eq!(entries[0].entry_point, "shell");
    }

    #[test]
    fn test_recent_is_newest_first() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        service.log(LogEvent::new("event1")).unwrap();
        service.log(LogEvent::new("event2")).unwrap();
        service.log(LogEvent::new("event3")).unwrap();

        let entries = service.get_recent(2).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.event.as_str()).collect();
        assert_eq!(names, vec!["event3", "event2"]);
    }

    #[test]
    fn test_log_command() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Shell, "1.0.0").unwrap();

        service.log_command("show", None).unwrap();
        service
            .log_command("add", Some("No product named 'Laptop'"))
            .unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.event == "command_executed"));

        let errors = service.get_errors(10).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].command, Some("add".to_string()));
        assert_eq!(errors[0].error_message, Some("No product named 'Laptop'".to_string()));
    }

    #[test]
    fn test_query_by_event_and_user() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Shell, "1.0.0").unwrap();

        service.log(LogEvent::new("user_logged_in").with_username("alice")).unwrap();
        service.log(LogEvent::new("checkout_completed").with_username("alice")).unwrap();
        service.log(LogEvent::new("user_logged_in").with_username("bob")).unwrap();
        service.log(LogEvent::new("cart_emptied")).unwrap();

        let filter = LogFilter {
            event: Some("user_logged_in".to_string()),
            ..LogFilter::default()
        };
        let users: Vec<_> = service
            .query(&filter, 10)
            .unwrap()
            .into_iter()
            .filter_map(|e| e.username)
            .collect();
        assert_eq!(users, vec!["bob", "alice"]);

        let filter = LogFilter {
            username: Some("ALICE".to_string()),
            ..LogFilter::default()
        };
        assert_eq!(service.query(&filter, 10).unwrap().len(), 2);

        let counts = service.event_counts().unwrap();
        assert_eq!(counts.get("user_logged_in"), Some(&2));
        assert_eq!(counts.get("cart_emptied"), Some(&1));
        assert_eq!(counts.get("stored_cart_discarded"), None);
    }

    #[test]
    fn test_count_and_delete() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        service.log(LogEvent::new("event1")).unwrap();
        service.log(LogEvent::new("event2")).unwrap();
        service.log(LogEvent::new("event3")).unwrap();

        assert_eq!(service.count().unwrap(), 3);

        // Nothing is older than the epoch
        assert_eq!(service.delete_before(0).unwrap(), 0);
        assert_eq!(service.count().unwrap(), 3);

        // Delete all logs (using future timestamp)
        let deleted = service.delete_before(now_ms() + 1000).unwrap();
        assert_eq!(deleted, 3);
        assert_eq!(service.count().unwrap(), 0);

        service.log(LogEvent::new("event4")).unwrap();
        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn test_skips_corrupt_lines() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        service.log(LogEvent::new("good")).unwrap();
        fs::write(
            service.log_path(),
            format!("{}not json\n", fs::read_to_string(service.log_path()).unwrap()),
        )
        .unwrap();
        service.log(LogEvent::new("also_good")).unwrap();

        assert_eq!(service.count().unwrap(), 2);
    }
}
