// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

//! Utility macros for BlobBench.

/// Runs a block between `start()` and `stop()` of a [`Stopwatch`](crate::timer::Stopwatch)
/// and returns the block's result.
///
/// Only the block is measured; whatever the block returns (including an error) is
/// handed back after the stopwatch is stopped.
///
/// # Examples
///
/// ```
/// use blobbench::measured;
/// use blobbench::timer::Stopwatch;
///
/// let mut stopwatch = Stopwatch::new();
/// let sum = measured!(stopwatch, { (0..1000u64).sum::<u64>() });
/// assert_eq!(sum, 499500);
/// assert!(!stopwatch.is_running());
/// ```
#[macro_export]
macro_rules! measured {
    ($stopwatch:expr, $block:expr) => {{
        $stopwatch.start();
        let __measured_result = $block;
        $stopwatch.stop();
        __measured_result
    }};
}
