// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Throughput accounting.

use std::fmt;
use std::time::{Duration, Instant};

use ivshmem_abi::layout::SLOT_SIZE;

const MB: f64 = 1_048_576.0;

/// Cumulative bytes moved through the bulk area since a start instant.
#[derive(Clone, Copy, Debug)]
pub struct Throughput {
    started: Instant,
    written: u64,
    read: u64,
}

impl Throughput {
    /// Start counting now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            written: 0,
            read: 0,
        }
    }

    /// Account for `slots` slot writes.
    pub const fn record_writes(&mut self, slots: u64) {
        self.written = self.written.saturating_add(slots * SLOT_SIZE as u64);
    }

    /// Account for `slots` slot reads.
    pub const fn record_reads(&mut self, slots: u64) {
        self.read = self.read.saturating_add(slots * SLOT_SIZE as u64);
    }

    /// Bytes written so far.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Bytes read so far.
    #[must_use]
    pub const fn bytes_read(&self) -> u64 {
        self.read
    }

    /// Wall time since start.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Combined rate in MB/s over `elapsed`; zero for an empty interval.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rate(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        (self.written.saturating_add(self.read)) as f64 / MB / secs
    }
}

impl fmt::Display for Throughput {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = self.elapsed();
        write!(
            f,
            "real {:.1}s, read {:.0} MB, written {:.0} MB, {:.2} MB/s",
            elapsed.as_secs_f64(),
            self.read as f64 / MB,
            self.written as f64 / MB,
            self.rate(elapsed)
        )
    }
}
