// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use blobbench::bench;
use blobbench::cli::{self, Cli};
use blobbench::log;
use blobbench::payload::Blob;
use blobbench::report;
use blobbench::timer::Stopwatch;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    if cli.list {
        print!("{}", cli::catalogue_listing());
        return ExitCode::SUCCESS;
    }

    let _guard = match log::init(&cli.log_filter, &cli.log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("blobbench: failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let plan = match cli.plan() {
        Ok(plan) => plan,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&plan.dir) {
        error!(dir = %plan.dir.display(), "cannot create output directory: {e}");
        return ExitCode::FAILURE;
    }

    info!(
        "===== Start test with a blob of size {} bytes and with {} nbr of blobs ====",
        plan.blob_size, plan.count
    );

    let mut blob = Blob::new(plan.blob_size);
    blob.refill(plan.fill);

    let mut total = Stopwatch::new();
    total.start();
    for benchmark in bench::select(&cli.tests) {
        let measurement = bench::execute(benchmark, &plan, &mut blob);
        report::report(benchmark.label, &measurement, plan.blob_size, plan.count);
    }
    total.stop();

    info!("Total time: {}s", total.elapsed_seconds());
    ExitCode::SUCCESS
}
