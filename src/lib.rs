// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

//! # BlobBench
//!
//! Persistence micro-benchmarks for large binary blobs. Each benchmark writes or
//! reads `count` blobs of `blob_size` bytes through one storage strategy, either
//! whole or as a stream of small fixed-size chunks, and reports the time spent in
//! the operations together with the resulting throughput.
//!
//! ## Strategies
//!
//! - **LMDB** via `heed`, one put/get per blob.
//! - **LSM tree** via `fjall`, one insert/get per blob.
//! - **Buffered file stream**, optionally synced to disk after every file.
//! - **Raw file descriptor I/O**.
//! - **Memory-mapped files** via `memmap2`.
//! - **Zero-copy archives** via `rkyv`.
//!
//! ## Example
//!
//! ```no_run
//! use blobbench::bench::{self, RunPlan};
//! use blobbench::payload::Blob;
//! use blobbench::report;
//!
//! let plan = RunPlan {
//!     count: 10,
//!     blob_size: 1024 * 1024,
//!     ..RunPlan::default()
//! };
//! std::fs::create_dir_all(&plan.dir)?;
//!
//! let mut blob = Blob::new(plan.blob_size);
//! for benchmark in bench::select(&[9, 10]) {
//!     let measurement = bench::execute(benchmark, &plan, &mut blob);
//!     report::report(benchmark.label, &measurement, plan.blob_size, plan.count);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod backend;
pub mod bench;
pub mod chunk;
pub mod cli;
pub mod constants;
pub mod error;
pub mod log;
pub mod payload;
pub mod report;
pub mod timer;
pub mod utils;

pub use error::Error;
