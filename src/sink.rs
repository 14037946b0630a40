use crate::error::{Result, RotologError};
use crate::level::Severity;
use crate::logger::Handler;
use crate::record::Record;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Size-rotating log file sink with a fixed line format.
///
/// The underlying file is not opened until the first record is written, so
/// hosts that never log do not leave empty files behind. When writing a line
/// would push the file past `max_bytes`, the file is closed, backups are
/// shifted up by one suffix index (`app.log.1` becomes `app.log.2` and so
/// on, dropping anything beyond `backup_count`), and a fresh file is opened.
///
/// The size check, rotation, and write form one critical section guarded by
/// a single lock, so concurrent writers never observe a partial rotation.
pub struct RotatingFileSink {
    path: PathBuf,
    max_bytes: u64,
    backup_count: u32,
    level: Severity,
    state: Mutex<SinkState>,
}

struct SinkState {
    /// `None` until the first write, and transiently during rotation
    file: Option<File>,
    /// Size of the active file in bytes
    written: u64,
}

impl RotatingFileSink {
    /// Create a sink. Performs no I/O; the file opens on first write.
    ///
    /// `max_bytes == 0` disables size-based rotation entirely.
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64, backup_count: u32, level: Severity) -> Self {
        Self {
            path: path.into(),
            max_bytes,
            backup_count,
            level,
            state: Mutex::new(SinkState {
                file: None,
                written: 0,
            }),
        }
    }

    /// Path of the active log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Minimum severity this sink lets through
    pub fn level(&self) -> Severity {
        self.level
    }

    /// Rotation threshold in bytes
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Number of rotated backup files retained
    pub fn backup_count(&self) -> u32 {
        self.backup_count
    }

    /// Path of the `index`-th backup file (`<path>.<index>`)
    fn backup_path(&self, index: u32) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn open_append(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                RotologError::LogError(format!(
                    "Failed to open log file {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        Ok(file)
    }

    /// Shift backups up by one index and start a fresh active file.
    ///
    /// Caller holds the state lock.
    fn rotate(&self, state: &mut SinkState) -> Result<()> {
        // Close the active file before renaming it
        state.file = None;

        if self.backup_count > 0 {
            let oldest = self.backup_path(self.backup_count);
            if oldest.exists() {
                std::fs::remove_file(&oldest).map_err(|e| {
                    RotologError::LogError(format!("Failed to rotate log: {}", e))
                })?;
            }
            for index in (1..self.backup_count).rev() {
                let src = self.backup_path(index);
                if src.exists() {
                    std::fs::rename(&src, self.backup_path(index + 1)).map_err(|e| {
                        RotologError::LogError(format!("Failed to rotate log: {}", e))
                    })?;
                }
            }
            if self.path.exists() {
                std::fs::rename(&self.path, self.backup_path(1)).map_err(|e| {
                    RotologError::LogError(format!("Failed to rotate log: {}", e))
                })?;
            }
        } else if self.path.exists() {
            // No backups retained: truncate in place
            std::fs::remove_file(&self.path).map_err(|e| {
                RotologError::LogError(format!("Failed to rotate log: {}", e))
            })?;
        }

        state.file = Some(self.open_append()?);
        state.written = 0;
        Ok(())
    }
}

impl Handler for RotatingFileSink {
    fn emit(&self, record: &Record) -> Result<()> {
        // Drop filtered records before paying the formatting cost
        if record.level < self.level {
            return Ok(());
        }

        let line = format_line(record);

        let mut state = self
            .state
            .lock()
            .map_err(|_| RotologError::LogError("log sink state is poisoned".to_string()))?;

        // Lazy open: pick up the size of a pre-existing file
        if state.file.is_none() {
            let file = self.open_append()?;
            state.written = file.metadata().map(|m| m.len()).unwrap_or(0);
            state.file = Some(file);
        }

        if self.max_bytes > 0 && state.written + line.len() as u64 > self.max_bytes {
            self.rotate(&mut state)?;
        }

        if let Some(file) = state.file.as_mut() {
            file.write_all(line.as_bytes())
                .map_err(|e| RotologError::LogError(format!("Failed to write to log: {}", e)))?;
            file.flush()
                .map_err(|e| RotologError::LogError(format!("Failed to flush log: {}", e)))?;
        }

        state.written += line.len() as u64;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| RotologError::LogError("log sink state is poisoned".to_string()))?;

        if let Some(file) = state.file.as_mut() {
            file.flush()
                .map_err(|e| RotologError::LogError(format!("Failed to flush log: {}", e)))?;
        }
        Ok(())
    }
}

/// Format one record as `YYYY-MM-DD HH:MM:SS,mmm LEVEL: message [in path:line]`
fn format_line(record: &Record) -> String {
    format!(
        "{},{:03} {}: {} [in {}:{}]\n",
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        record.timestamp.timestamp_subsec_millis(),
        record.level,
        record.message,
        record.source_path,
        record.line,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn emit(sink: &RotatingFileSink, level: Severity, message: &str) {
        sink.emit(&Record::new(level, message, "src/app.rs", 42)).unwrap();
    }

    #[test]
    fn test_no_file_until_first_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let sink = RotatingFileSink::new(&path, 0, 5, Severity::Debug);
        assert!(!path.exists());

        emit(&sink, Severity::Info, "first");
        assert!(path.exists());
    }

    #[test]
    fn test_line_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let sink = RotatingFileSink::new(&path, 0, 5, Severity::Debug);
        emit(&sink, Severity::Error, "disk on fire");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let line = lines[0];
        // 2026-08-30 12:34:56,789 ERROR: disk on fire [in src/app.rs:42]
        assert_eq!(line.as_bytes()[4], b'-');
        assert_eq!(line.as_bytes()[10], b' ');
        assert_eq!(line.as_bytes()[19], b',');
        assert!(line[20..23].chars().all(|c| c.is_ascii_digit()));
        assert!(line[23..].starts_with(" ERROR: disk on fire [in src/app.rs:42]"));
    }

    #[test]
    fn test_level_filtering() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let sink = RotatingFileSink::new(&path, 0, 5, Severity::Warning);
        emit(&sink, Severity::Info, "suppressed");
        // Filtered records never touch the filesystem
        assert!(!path.exists());

        emit(&sink, Severity::Warning, "kept");
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("kept"));
        assert!(!content.contains("suppressed"));
    }

    #[test]
    fn test_rotation_creates_indexed_backups() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        // Every line is ~60 bytes, so each write past the first rotates
        let sink = RotatingFileSink::new(&path, 80, 3, Severity::Debug);
        for i in 0..5 {
            emit(&sink, Severity::Info, &format!("message number {}", i));
        }

        assert!(path.exists());
        assert!(path.with_extension("log.1").exists());
        assert!(path.with_extension("log.2").exists());
    }

    #[test]
    fn test_backup_count_bounds_retention() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let sink = RotatingFileSink::new(&path, 80, 2, Severity::Debug);
        for i in 0..10 {
            emit(&sink, Severity::Info, &format!("message number {}", i));
        }

        assert!(path.with_extension("log.1").exists());
        assert!(path.with_extension("log.2").exists());
        assert!(!path.with_extension("log.3").exists());
    }

    #[test]
    fn test_backups_preserve_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let sink = RotatingFileSink::new(&path, 80, 3, Severity::Debug);
        for i in 0..3 {
            emit(&sink, Severity::Info, &format!("message number {}", i));
        }

        // .1 is the most recently rotated file, .2 the one before it
        let newest = std::fs::read_to_string(path.with_extension("log.1")).unwrap();
        let older = std::fs::read_to_string(path.with_extension("log.2")).unwrap();
        assert!(newest.contains("message number 1"));
        assert!(older.contains("message number 0"));
    }

    #[test]
    fn test_zero_max_bytes_never_rotates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let sink = RotatingFileSink::new(&path, 0, 5, Severity::Debug);
        for i in 0..50 {
            emit(&sink, Severity::Info, &format!("message number {}", i));
        }

        assert!(!path.with_extension("log.1").exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 50);
    }

    #[test]
    fn test_zero_backup_count_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let sink = RotatingFileSink::new(&path, 80, 0, Severity::Debug);
        for i in 0..10 {
            emit(&sink, Severity::Info, &format!("message number {}", i));
        }

        assert!(!path.with_extension("log.1").exists());
        // Truncation keeps the active file under the threshold plus one line
        let size = std::fs::metadata(&path).unwrap().len();
        assert!(size < 160, "active file should stay small, got {} bytes", size);
    }

    #[test]
    fn test_picks_up_existing_file_size() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");
        std::fs::write(&path, vec![b'x'; 100]).unwrap();

        // 100 pre-existing bytes already exceed the threshold
        let sink = RotatingFileSink::new(&path, 80, 3, Severity::Debug);
        emit(&sink, Severity::Info, "after restart");

        assert!(path.with_extension("log.1").exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("after restart"));
    }

    #[test]
    fn test_concurrent_writers() {
        use std::sync::Arc;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let sink = Arc::new(RotatingFileSink::new(&path, 0, 5, Severity::Debug));
        let mut threads = Vec::new();
        for t in 0..4 {
            let sink = sink.clone();
            threads.push(std::thread::spawn(move || {
                for i in 0..25 {
                    sink.emit(&Record::new(
                        Severity::Info,
                        format!("thread {} message {}", t, i),
                        "src/app.rs",
                        1,
                    ))
                    .unwrap();
                }
            }));
        }
        for thread in threads {
            thread.join().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 100);
        // No interleaved partial lines
        for line in content.lines() {
            assert!(line.ends_with(']'));
        }
    }
}
