//! Log Ring Buffer
//!
//! Fixed-capacity history of the dispatcher's diagnostics, kept so the host
//! can forward recent messages (for example as STATUSTEXT) after the fact.
//!
//! - Capacity of [`LOG_BUFFER_SIZE`] messages, oldest evicted first
//! - Overflow tracking for diagnostics
//! - Messages longer than [`LOG_MSG_SIZE`] are cut at a character boundary

use core::fmt::{self, Write};

use heapless::{HistoryBuf, String, Vec};

/// Buffer capacity in number of messages
pub const LOG_BUFFER_SIZE: usize = 32;

/// Maximum message size in bytes
pub const LOG_MSG_SIZE: usize = 128;

/// Log level with ordering: Trace < Debug < Info < Warn < Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Log message containing level and text
#[derive(Clone, Debug)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String<LOG_MSG_SIZE>,
}

impl LogMessage {
    pub fn new(level: LogLevel, message: String<LOG_MSG_SIZE>) -> Self {
        Self { level, message }
    }
}

/// `fmt::Write` adapter that drops whatever does not fit.
struct Truncating<'a, const N: usize> {
    buf: &'a mut String<N>,
}

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.buf.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Format `args` into `buf`, keeping as many whole characters as fit.
pub fn write_truncated<const N: usize>(buf: &mut String<N>, args: fmt::Arguments<'_>) {
    let _ = Truncating { buf }.write_fmt(args);
}

/// Ring buffer sink for log messages
///
/// Stores up to LOG_BUFFER_SIZE messages. When full, the oldest message
/// is evicted to make room.
pub struct RingBufferSink {
    buffer: HistoryBuf<LogMessage, LOG_BUFFER_SIZE>,
    overflow_count: u32,
    min_level: LogLevel,
}

impl RingBufferSink {
    /// Empty sink recording every level
    pub const fn new() -> Self {
        Self::with_min_level(LogLevel::Trace)
    }

    /// Empty sink that ignores messages below `min_level`
    pub const fn with_min_level(min_level: LogLevel) -> Self {
        Self {
            buffer: HistoryBuf::new(),
            overflow_count: 0,
            min_level,
        }
    }

    /// Push a message, evicting the oldest when full.
    pub fn push(&mut self, msg: LogMessage) {
        if msg.level < self.min_level {
            return;
        }
        if self.buffer.len() == LOG_BUFFER_SIZE {
            self.overflow_count = self.overflow_count.saturating_add(1);
        }
        self.buffer.write(msg);
    }

    /// Format and push a message.
    pub fn log(&mut self, level: LogLevel, args: fmt::Arguments<'_>) {
        if level < self.min_level {
            return;
        }
        let mut message = String::new();
        write_truncated(&mut message, args);
        self.push(LogMessage::new(level, message));
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Number of messages lost to eviction
    pub fn overflow_count(&self) -> u32 {
        self.overflow_count
    }

    /// Iterate over messages in oldest-first order
    pub fn iter(&self) -> impl Iterator<Item = &LogMessage> {
        self.buffer.oldest_ordered()
    }

    /// Number of buffered messages at or above `level`
    pub fn count_at_least(&self, level: LogLevel) -> usize {
        self.iter().filter(|m| m.level >= level).count()
    }

    /// Drain all messages in oldest-first order.
    pub fn drain(&mut self) -> Vec<LogMessage, LOG_BUFFER_SIZE> {
        let mut result = Vec::new();
        for msg in self.buffer.oldest_ordered() {
            let _ = result.push(msg.clone());
        }
        self.buffer.clear();
        result
    }

    /// Clear all messages. Does not reset overflow_count.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for RingBufferSink {
    fn default() -> Self {
        Self::new()
    }
}
