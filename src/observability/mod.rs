//! Observability for record stores
//!
//! - Structured logging (JSON, one event per line)
//! - Lock-free counters
//!
//! Observability is read-only: a logging failure never fails a store
//! operation.
//!
//! # Usage
//!
//! ```
//! use fixlog::observability::{log_event_with_fields, Event, StoreMetrics};
//!
//! log_event_with_fields(Event::StoreOpened, &[("path", "/tmp/example.bin")]);
//!
//! let metrics = StoreMetrics::new();
//! metrics.add_records_appended(1);
//! assert_eq!(metrics.snapshot().records_appended, 1);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, StoreMetrics};

/// Log an event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Event::StoreOpened);
        log_event(Event::Wraparound);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::HeaderRepaired, &[("path", "/tmp/test.bin"), ("reason", "NO_HEADER")]);
    }
}
