//! Log sinks for conversion progress and diagnostics

use log::Level;

/// Destination for human-readable conversion messages
pub trait LogSink {
    /// Append one message line at the given severity
    fn append(&mut self, level: Level, message: &str);

    /// Append an informational line
    fn info(&mut self, message: &str) {
        self.append(Level::Info, message);
    }

    /// Append a warning line
    fn warn(&mut self, message: &str) {
        self.append(Level::Warn, message);
    }

    /// Append an error line
    fn error(&mut self, message: &str) {
        self.append(Level::Error, message);
    }
}

/// Append-only text log that drops its oldest content past a size ceiling
///
/// Every entry is also forwarded to the `log` facade.
#[derive(Debug, Clone)]
pub struct BoundedLog {
    text: String,
    max_length: usize,
    entries: usize,
    warnings: usize,
    errors: usize,
}

impl BoundedLog {
    /// Create an empty log retaining at most `max_length` bytes
    pub fn new(max_length: usize) -> Self {
        Self {
            text: String::new(),
            max_length: max_length.max(1),
            entries: 0,
            warnings: 0,
            errors: 0,
        }
    }

    /// Retained text, newest line last
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Retained lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Number of entries appended since creation or the last clear
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Warnings appended since creation or the last clear
    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    /// Errors appended since creation or the last clear
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Ceiling in bytes
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Drop all retained text and counters
    pub fn clear(&mut self) {
        self.text.clear();
        self.entries = 0;
        self.warnings = 0;
        self.errors = 0;
    }

    fn trim_to_ceiling(&mut self) {
        if self.text.len() <= self.max_length {
            return;
        }
        let mut cut = self.text.len() - self.max_length;
        while !self.text.is_char_boundary(cut) {
            cut += 1;
        }
        self.text.drain(..cut);
    }
}

impl Default for BoundedLog {
    fn default() -> Self {
        Self::new(crate::core::config::DEFAULT_MAX_LOG_LENGTH)
    }
}

impl LogSink for BoundedLog {
    fn append(&mut self, level: Level, message: &str) {
        log::log!(level, "{}", message);

        self.entries += 1;
        match level {
            Level::Warn => self.warnings += 1,
            Level::Error => self.errors += 1,
            _ => {}
        }

        self.text.push_str(message);
        self.text.push('\n');
        self.trim_to_ceiling();
    }
}

/// Sink that only forwards to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl LogSink for NullLog {
    fn append(&mut self, level: Level, message: &str) {
        log::log!(level, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_lines_in_order() {
        let mut log = BoundedLog::new(1000);
        log.info("first");
        log.warn("second");
        log.error("third");

        assert_eq!(log.text(), "first\nsecond\nthird\n");
        assert_eq!(log.entry_count(), 3);
        assert_eq!(log.warning_count(), 1);
        assert_eq!(log.error_count(), 1);
    }

    #[test]
    fn test_oldest_text_is_trimmed() {
        let mut log = BoundedLog::new(10);
        log.info("aaaa");
        log.info("bbbb");
        log.info("cccc");

        assert_eq!(log.text().len(), 10);
        assert!(log.text().ends_with("bbbb\ncccc\n"));
        assert_eq!(log.entry_count(), 3);
    }

    #[test]
    fn test_trim_respects_char_boundaries() {
        let mut log = BoundedLog::new(4);
        log.info("ééé");

        assert!(log.text().len() <= 4);
        assert!(log.text().ends_with('\n'));
    }

    #[test]
    fn test_clear() {
        let mut log = BoundedLog::new(100);
        log.error("boom");
        log.clear();

        assert!(log.text().is_empty());
        assert_eq!(log.error_count(), 0);
    }
}
