//! [`LogBuffer`] – the host-visible log shown on the status panel.
//!
//! Two kinds of line are kept:
//!
//! | Kind | Retention |
//! |---|---|
//! | [`LogKind::Scrolling`] | Bounded ring; the oldest line is dropped once [`SCROLLING_LINE_COUNT`] is exceeded. |
//! | [`LogKind::Persistent`] | Kept until the next [`LogBuffer::drain`], then cleared. |
//!
//! Every pushed event is mirrored to `tracing` at its severity; informational
//! persistent lines go out at `debug`.
//!
//! # Example
//!
//! ```rust
//! use nacelle_runtime::log_buffer::LogBuffer;
//!
//! let mut log = LogBuffer::new();
//! log.scrolling("movement queued");
//! log.persistent("Rotor Left: 12.5°");
//!
//! assert_eq!(log.drain(), ["movement queued", "", "Rotor Left: 12.5°"]);
//! assert_eq!(log.drain(), ["movement queued", ""]);
//! ```

use std::collections::VecDeque;

use nacelle_types::{LogEvent, LogKind, Severity};
use tracing::{debug, error, info, warn};

/// Capacity of the scrolling ring.
pub const SCROLLING_LINE_COUNT: usize = 25;

#[derive(Debug, Clone)]
pub struct LogBuffer {
    capacity: usize,
    scrolling: VecDeque<LogEvent>,
    persistent: Vec<LogEvent>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::with_capacity(SCROLLING_LINE_COUNT)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            scrolling: VecDeque::with_capacity(capacity),
            persistent: Vec::new(),
        }
    }

    pub fn push(&mut self, event: LogEvent) {
        match (event.severity, event.kind) {
            (Severity::Error, _) => error!(kind = ?event.kind, "{}", event.message),
            (Severity::Warning, _) => warn!(kind = ?event.kind, "{}", event.message),
            (Severity::Info, LogKind::Persistent) => debug!("{}", event.message),
            (Severity::Info, LogKind::Scrolling) => info!("{}", event.message),
        }

        match event.kind {
            LogKind::Scrolling => {
                self.scrolling.push_back(event);
                while self.scrolling.len() > self.capacity {
                    self.scrolling.pop_front();
                }
            }
            LogKind::Persistent => self.persistent.push(event),
        }
    }

    /// Push an informational scrolling line.
    pub fn scrolling(&mut self, message: impl Into<String>) {
        self.push(LogEvent::new(LogKind::Scrolling, Severity::Info, message));
    }

    /// Push a persistent line, shown once on the next drain.
    pub fn persistent(&mut self, message: impl Into<String>) {
        self.push(LogEvent::new(LogKind::Persistent, Severity::Info, message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(LogEvent::new(LogKind::Scrolling, Severity::Warning, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogEvent::new(LogKind::Scrolling, Severity::Error, message));
    }

    /// Scrolling events, oldest first.
    pub fn scrolling_events(&self) -> impl Iterator<Item = &LogEvent> {
        self.scrolling.iter()
    }

    pub fn persistent_events(&self) -> &[LogEvent] {
        &self.persistent
    }

    /// Scrolling lines, a blank separator, then the persistent lines.
    ///
    /// The persistent lines are cleared; the scrolling ring is kept.
    pub fn drain(&mut self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .scrolling
            .iter()
            .map(|event| event.message.clone())
            .collect();
        lines.push(String::new());
        lines.extend(self.persistent.drain(..).map(|event| event.message));
        lines
    }

    /// Forget the scrolling lines.
    pub fn clear(&mut self) {
        self.scrolling.clear();
    }
}
