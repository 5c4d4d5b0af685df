use std::thread;

use chrono::{DateTime, Utc};
use log::Level;

/// An immutable record of one logging call, consumed read-only by layouts.
///
/// Properties keep their insertion order; layouts render them in exactly
/// that order, never resorted.
#[derive(Debug, Clone)]
pub struct LoggingEvent {
    logger: String,
    timestamp: DateTime<Utc>,
    level: Level,
    thread: String,
    message: String,
    ndc: String,
    properties: Vec<(String, String)>,
}

impl LoggingEvent {
    /// Captures an event at the current instant on the current thread.
    pub fn new(logger: &str, level: Level, message: &str) -> LoggingEvent {
        LoggingEvent {
            logger: logger.into(),
            timestamp: Utc::now(),
            level,
            thread: thread::current().name().unwrap_or("unnamed").into(),
            message: message.into(),
            ndc: String::new(),
            properties: Vec::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> LoggingEvent {
        self.timestamp = timestamp;
        self
    }

    pub fn with_thread(mut self, thread: &str) -> LoggingEvent {
        self.thread = thread.into();
        self
    }

    pub fn with_ndc(mut self, ndc: &str) -> LoggingEvent {
        self.ndc = ndc.into();
        self
    }

    /// Appends a property. Duplicate names are kept as given.
    pub fn with_property(mut self, name: &str, value: &str) -> LoggingEvent {
        self.properties.push((name.into(), value.into()));
        self
    }

    pub fn logger(&self) -> &str {
        &self.logger
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    /// Milliseconds since the epoch, the integer the XML layout renders.
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn thread(&self) -> &str {
        &self.thread
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Nested diagnostic context, possibly empty.
    pub fn ndc(&self) -> &str {
        &self.ndc
    }

    /// Properties in insertion order.
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }
}
