//! Destinations for `|$` tap stages.
//!
//! A tap forwards its label, the current value and any evaluated arguments
//! to the configured handler and never changes the chain. Handlers use enum
//! dispatch: the set of destinations is closed.

use std::fmt::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use sluice_value::Value;

/// Render one tap event as `label: value` or `label(args): value`.
pub fn format_tap(label: &str, value: &Value, args: &[Value]) -> String {
    let mut line = String::from(label);
    if !args.is_empty() {
        line.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                line.push_str(", ");
            }
            let _ = write!(line, "{arg}");
        }
        line.push(')');
    }
    let _ = write!(line, ": {value}");
    line
}

/// Tap handler that records formatted events in memory.
pub struct BufferTapHandler {
    entries: Mutex<Vec<String>>,
}

impl BufferTapHandler {
    pub fn new() -> Self {
        BufferTapHandler {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn record(&self, label: &str, value: &Value, args: &[Value]) {
        self.entries.lock().push(format_tap(label, value, args));
    }

    /// All recorded events, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for BufferTapHandler {
    fn default() -> Self {
        Self::new()
    }
}

pub enum TapHandlerImpl {
    /// Emits an `info` event on the `sluice::tap` target (default).
    Tracing,
    /// Captures to a buffer (tests, embedding hosts).
    Buffer(BufferTapHandler),
    /// Discards every event.
    Silent,
}

impl TapHandlerImpl {
    pub fn record(&self, label: &str, value: &Value, args: &[Value]) {
        match self {
            Self::Tracing => {
                tracing::info!(target: "sluice::tap", label, value = %value, args = ?args);
            }
            Self::Buffer(h) => h.record(label, value, args),
            Self::Silent => {}
        }
    }

    /// Recorded events; empty for handlers that don't capture.
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::Buffer(h) => h.entries(),
            Self::Tracing | Self::Silent => Vec::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Tap handler shared between an evaluator and its host.
pub type SharedTapHandler = Arc<TapHandlerImpl>;

pub fn tracing_tap() -> SharedTapHandler {
    Arc::new(TapHandlerImpl::Tracing)
}

pub fn buffer_tap() -> SharedTapHandler {
    Arc::new(TapHandlerImpl::Buffer(BufferTapHandler::new()))
}

pub fn silent_tap() -> SharedTapHandler {
    Arc::new(TapHandlerImpl::Silent)
}
