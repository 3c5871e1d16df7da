// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

use std::time::{Duration, Instant};

/// A monotonic stopwatch that accumulates time across `start`/`stop` pairs.
///
/// Only the time between a `start` and the following `stop` is counted, so setup
/// and teardown outside the measured region never reach the total.
///
/// - Intervals do not nest: a second `start` replaces the pending interval start.
/// - `stop` without a pending `start` does nothing.
#[derive(Debug, Default, Clone)]
pub struct Stopwatch {
    started: Option<Instant>,
    elapsed: Duration,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed += started.elapsed();
        }
    }

    /// Zeroes the accumulated total. A pending interval is kept.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Total of all closed intervals; an open interval is not included.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}
