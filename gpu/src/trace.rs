// The trace sink collaborator (spec.md §6 "Trace sink").

use support::profiling;

/// One reading emitted by `QuerySet::reset_for_frame`: either a labeled
/// timespan or a scalar counter.
#[derive(Debug, Clone)]
pub enum TraceRecord {
    Span { label: &'static str, begin: i64, end: i64 },
    Counter { label: &'static str, value: i64 },
}

pub trait TraceSink {
    fn trace(&mut self, event: &str, records: &[TraceRecord]);
}

/// Forwards every trace call into the ambient logging macros at
/// `profiling!` level, matching the teacher's pattern of giving every
/// collaborator trait a trivial default so the crate exercises its own
/// seams without a real metrics backend (e.g. `thundr`'s headless
/// `display/headless.rs`).
#[derive(Debug, Default)]
pub struct LoggingTraceSink;

impl TraceSink for LoggingTraceSink {
    fn trace(&mut self, event: &str, records: &[TraceRecord]) {
        for record in records {
            match record {
                TraceRecord::Span { label, begin, end } => {
                    profiling!("{}: {} [{}..{}]", event, label, begin, end);
                }
                TraceRecord::Counter { label, value } => {
                    profiling!("{}: {} = {}", event, label, value);
                }
            }
        }
    }
}
