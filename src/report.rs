// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::constants::MIB;

/// Outcome of one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    Completed(Completed),
    /// The benchmark stopped early; no throughput can be derived.
    Aborted { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completed {
    /// Time spent inside measured operations only.
    pub elapsed: Duration,
    /// Bytes actually moved, which is below `count * blob_size` for chunked runs.
    pub bytes_transferred: u64,
    /// Tolerated operation failures (key-value engines only).
    pub failed_ops: usize,
}

impl Measurement {
    pub fn aborted(reason: impl fmt::Display) -> Self {
        Self::Aborted {
            reason: reason.to_string(),
        }
    }

    pub fn completed(&self) -> Option<&Completed> {
        match self {
            Self::Completed(c) => Some(c),
            Self::Aborted { .. } => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

/// A reported benchmark line.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchResult {
    pub name: String,
    pub secs: f64,
    pub mib_per_sec: f64,
}

impl fmt::Display for BenchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_line(self.secs, self.mib_per_sec, &self.name))
    }
}

/// `<secs>s, <throughput>MB/s :<name>` with fixed-width numbers.
pub fn format_line(secs: f64, mib_per_sec: f64, name: &str) -> String {
    format!("{secs:7.2}s, {mib_per_sec:7.1}MB/s :{name}")
}

/// Throughput in MB/s for `count` blobs of `blob_size` bytes moved in `secs`.
///
/// `blob_size` is truncated to whole MiB before multiplying, so sizes that are not
/// MiB multiples under-report. A zero `secs` yields `inf` (or `NaN` for zero MiB).
pub fn throughput(secs: f64, blob_size: usize, count: usize) -> f64 {
    (count as u64 * (blob_size / MIB) as u64) as f64 / secs
}

/// Logs the result line for a measurement.
///
/// Aborted measurements are logged as errors and produce no result.
pub fn report(
    name: &str,
    measurement: &Measurement,
    blob_size: usize,
    count: usize,
) -> Option<BenchResult> {
    match measurement {
        Measurement::Completed(completed) => {
            let secs = completed.elapsed.as_secs_f64();
            let result = BenchResult {
                name: name.to_string(),
                secs,
                mib_per_sec: throughput(secs, blob_size, count),
            };
            if completed.failed_ops > 0 {
                warn!(
                    failed_ops = completed.failed_ops,
                    "{name}: some operations failed"
                );
            }
            info!("{result}");
            Some(result)
        }
        Measurement::Aborted { reason } => {
            error!("aborted :{name}: {reason}");
            None
        }
    }
}
