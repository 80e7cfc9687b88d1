// Per-frame timestamp/statistics queries (spec.md §4.8 "Queries").

use ash::vk;

use crate::device::GpuDevice;
use crate::trace::{TraceRecord, TraceSink};

/// A pair of linearly-allocated timestamp query indices bracketing one
/// labeled span.
#[derive(Debug, Copy, Clone)]
pub struct SpanId {
    begin: u32,
    end: u32,
}

#[derive(Debug, Copy, Clone)]
pub struct StatId(u32);

struct RingQueries {
    timestamp_pool: vk::QueryPool,
    statistics_pool: vk::QueryPool,
    next_timestamp: u32,
    next_statistics: u32,
    pending_spans: Vec<(&'static str, SpanId)>,
    pending_stats: Vec<(&'static str, StatId)>,
}

/// One timestamp pool and one statistics pool per ring slot, with a
/// per-frame cap on how many spans/counters may be recorded. Allocation
/// overflow is soft: `begin_span`/`begin_statistics` return `None` and
/// the caller just skips instrumenting that span (spec.md §7
/// `QueryCapacityExceeded`).
pub struct QuerySet {
    max_timestamps: u32,
    max_statistics: u32,
    ring: Vec<RingQueries>,
}

impl QuerySet {
    /// `timestamp_pools`/`statistics_pools` must have `buffering_depth`
    /// entries each, created by the caller (query pool creation is not
    /// part of the `GpuDevice` collaborator surface).
    pub fn new(
        timestamp_pools: Vec<vk::QueryPool>,
        statistics_pools: Vec<vk::QueryPool>,
        max_timestamps: u32,
        max_statistics: u32,
    ) -> Self {
        assert_eq!(timestamp_pools.len(), statistics_pools.len());
        let ring = timestamp_pools
            .into_iter()
            .zip(statistics_pools)
            .map(|(timestamp_pool, statistics_pool)| RingQueries {
                timestamp_pool,
                statistics_pool,
                next_timestamp: 0,
                next_statistics: 0,
                pending_spans: Vec::new(),
                pending_stats: Vec::new(),
            })
            .collect();
        Self {
            max_timestamps,
            max_statistics,
            ring,
        }
    }

    /// Allocates two timestamp indices for `label` and records the begin
    /// timestamp immediately.
    pub fn begin_span(&mut self, ring_index: usize, label: &'static str, device: &mut dyn GpuDevice) -> Option<SpanId> {
        let r = &mut self.ring[ring_index];
        if r.next_timestamp + 2 > self.max_timestamps {
            return None;
        }
        let begin = r.next_timestamp;
        let end = r.next_timestamp + 1;
        r.next_timestamp += 2;
        device.encoder().write_timestamp(r.timestamp_pool, begin);
        let span = SpanId { begin, end };
        r.pending_spans.push((label, span));
        Some(span)
    }

    pub fn end_span(&mut self, ring_index: usize, span: SpanId, device: &mut dyn GpuDevice) {
        let pool = self.ring[ring_index].timestamp_pool;
        device.encoder().write_timestamp(pool, span.end);
    }

    pub fn begin_statistics(&mut self, ring_index: usize, label: &'static str, device: &mut dyn GpuDevice) -> Option<StatId> {
        let r = &mut self.ring[ring_index];
        if r.next_statistics + 1 > self.max_statistics {
            return None;
        }
        let id = r.next_statistics;
        r.next_statistics += 1;
        device.encoder().begin_statistics(r.statistics_pool, id);
        let stat = StatId(id);
        r.pending_stats.push((label, stat));
        Some(stat)
    }

    pub fn end_statistics(&mut self, ring_index: usize, stat: StatId, device: &mut dyn GpuDevice) {
        let pool = self.ring[ring_index].statistics_pool;
        device.encoder().end_statistics(pool, stat.0);
    }

    /// Resets the ranges for the slot about to be reused, reading back
    /// and emitting the previous occupant's results to `sink` first
    /// (spec.md: "read back the previous frame's results, emit them to
    /// the trace sink labeled with the span label recorded at begin").
    pub fn reset_for_frame(&mut self, ring_index: usize, device: &mut dyn GpuDevice, sink: &mut dyn TraceSink) {
        let r = &mut self.ring[ring_index];

        let mut records: Vec<TraceRecord> = r
            .pending_spans
            .drain(..)
            .map(|(label, span)| TraceRecord::Span {
                label,
                begin: span.begin as i64,
                end: span.end as i64,
            })
            .collect();
        records.extend(r.pending_stats.drain(..).map(|(label, stat)| TraceRecord::Counter {
            label,
            value: stat.0 as i64,
        }));
        if !records.is_empty() {
            sink.trace("gpu.timeline", &records);
        }

        device.encoder().reset_timestamp_query(r.timestamp_pool, 0, self.max_timestamps);
        r.next_timestamp = 0;
        r.next_statistics = 0;
    }
}
