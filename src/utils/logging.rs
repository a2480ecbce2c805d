use chrono::Local;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 1000;

/// A log entry with timestamp and message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S.%3f").to_string(),
            level: level.to_string().to_uppercase(),
            target: target.to_string(),
            message,
        }
    }

    /// Format for display in the log panel and the log file
    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Thread-safe ring buffer for log entries
#[derive(Clone, Default)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    pub fn push(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() >= MAX_LOG_ENTRIES {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.iter().rev().take(count).rev().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split a compact fmt line ("LEVEL target: message") into its parts
pub fn parse_log_line(line: &str) -> (Level, &str, &str) {
    let levels = [
        ("TRACE ", Level::TRACE),
        ("DEBUG ", Level::DEBUG),
        ("INFO ", Level::INFO),
        ("WARN ", Level::WARN),
        ("ERROR ", Level::ERROR),
    ];
    let Some((level, rest)) = levels
        .iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|rest| (*level, rest.trim_start())))
    else {
        return (Level::INFO, "general", line);
    };

    // A target never contains spaces, but may contain `::`
    match rest.split_once(": ") {
        Some((target, message)) if !target.contains(' ') => (level, target, message.trim()),
        _ => (level, "general", rest),
    }
}

/// Writer that feeds the ring buffer and, when available, a log file
#[derive(Clone)]
pub struct LogWriter {
    buffer: LogRingBuffer,
    file: Option<Arc<Mutex<File>>>,
}

impl LogWriter {
    pub fn new(buffer: LogRingBuffer, file: Option<File>) -> Self {
        Self {
            buffer,
            file: file.map(|file| Arc::new(Mutex::new(file))),
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = std::str::from_utf8(buf) {
            for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
                let (level, target, message) = parse_log_line(line);
                let entry = LogEntry::new(level, target, message.to_string());

                if let Some(file) = &self.file {
                    if let Ok(mut file) = file.lock() {
                        let _ = writeln!(file, "{}", entry.format_for_display());
                    }
                }
                self.buffer.push(entry);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                file.flush()?;
            }
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Open a timestamped log file in `log_dir` and point `latest.log` at it
pub fn open_log_file(log_dir: &Path) -> std::io::Result<(File, PathBuf)> {
    std::fs::create_dir_all(log_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("query-search_{}.log", timestamp));

    #[cfg(unix)]
    {
        let latest_path = log_dir.join("latest.log");
        let _ = std::fs::remove_file(&latest_path);
        let _ = std::os::unix::fs::symlink(&log_path, &latest_path);
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    Ok((file, log_path))
}

/// Global log buffer accessible throughout the application
static LOG_BUFFER: OnceLock<LogRingBuffer> = OnceLock::new();

/// Install the tracing subscriber.
///
/// Logs go to the in-memory ring buffer and, if `log_dir` can be opened, to a
/// file there. Returns the buffer and the log file path.
pub fn init_tracing(log_dir: Option<&Path>) -> (LogRingBuffer, Option<PathBuf>) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let buffer = LOG_BUFFER.get_or_init(LogRingBuffer::new).clone();

    let (file, log_path) = match log_dir.map(open_log_file) {
        Some(Ok((file, path))) => (Some(file), Some(path)),
        _ => (None, None),
    };

    let fmt_layer = fmt::layer()
        .with_writer(LogWriter::new(buffer.clone(), file))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time() // LogEntry carries its own timestamp
        .compact();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();

    tracing::info!(target: "app", "Logging initialized");
    (buffer, log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_line() {
        let (level, target, message) = parse_log_line("DEBUG search_box: commit 'lee'");
        assert_eq!(level, Level::DEBUG);
        assert_eq!(target, "search_box");
        assert_eq!(message, "commit 'lee'");
    }

    #[test]
    fn test_parse_log_line_module_path_target() {
        let (level, target, message) =
            parse_log_line("INFO query_search::utils::logging: opened log: /tmp/x.log");
        assert_eq!(level, Level::INFO);
        assert_eq!(target, "query_search::utils::logging");
        assert_eq!(message, "opened log: /tmp/x.log");
    }

    #[test]
    fn test_parse_log_line_without_target() {
        let (level, target, message) = parse_log_line("WARN something odd: here");
        assert_eq!(level, Level::WARN);
        assert_eq!(target, "general");
        assert_eq!(message, "something odd: here");

        let (level, target, _) = parse_log_line("plain text");
        assert_eq!(level, Level::INFO);
        assert_eq!(target, "general");
    }

    #[test]
    fn test_ring_buffer_caps_entries() {
        let buffer = LogRingBuffer::new();
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            buffer.push(LogEntry::new(Level::INFO, "test", i.to_string()));
        }
        assert_eq!(buffer.len(), MAX_LOG_ENTRIES);
        let recent = buffer.get_recent(2);
        assert_eq!(recent[1].message, (MAX_LOG_ENTRIES + 4).to_string());
    }

    #[test]
    fn test_writer_splits_lines() {
        let buffer = LogRingBuffer::new();
        let mut writer = LogWriter::new(buffer.clone(), None);
        writer
            .write_all(b"INFO app: one\nDEBUG location: replace /a\n")
            .unwrap();
        let recent = buffer.get_recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[1].target, "location");
    }
}
