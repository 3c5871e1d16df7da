// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;

use crate::bench::{RunPlan, CATALOGUE};
use crate::constants;
use crate::error::{Error, Result};
use crate::payload::FillMode;

/// Measures how fast blobs of raw bytes can be persisted and reloaded.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "blobbench", version, about)]
pub struct Cli {
    /// Benchmark ids to run (all when empty). See `--list`.
    pub tests: Vec<u32>,

    /// Number of blobs per benchmark.
    #[arg(short = 'n', long, default_value_t = constants::DEFAULT_BLOB_COUNT)]
    pub count: usize,

    /// Blob size in bytes.
    #[arg(short, long, default_value_t = constants::DEFAULT_BLOB_SIZE)]
    pub size: usize,

    /// Directory for benchmark artifacts.
    #[arg(short, long, default_value = constants::DEFAULT_OUTPUT_DIR)]
    pub dir: PathBuf,

    /// Regenerate payload bytes randomly before each write.
    #[arg(short, long)]
    pub random: bool,

    /// Directory for the rolling log file.
    #[arg(long, default_value = constants::DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// `tracing` filter directive, overridden by `RUST_LOG`.
    #[arg(long, default_value = constants::DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Print the benchmark catalogue and exit.
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    pub fn fill(&self) -> FillMode {
        FillMode::from_random_flag(self.random)
    }

    /// The run parameters, with per-iteration progress marks on.
    pub fn plan(&self) -> Result<RunPlan> {
        if self.dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("output directory is empty".into()));
        }
        Ok(RunPlan {
            dir: self.dir.clone(),
            blob_size: self.size,
            count: self.count,
            fill: self.fill(),
            progress: true,
        })
    }
}

/// One line per catalogue entry: `<id> <label>`.
pub fn catalogue_listing() -> String {
    CATALOGUE
        .iter()
        .map(|b| format!("{:>3} {}\n", b.id, b.label))
        .collect()
}
