#![no_main]

// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.
use blobbench::backend::ArchiveFile;
use blobbench::bench::{self, Operation, RunPlan};
use blobbench::payload::Blob;
use libfuzzer_sys::fuzz_target;
use tempfile::tempdir;

fuzz_target!(|data: &[u8]| {
    let dir = match tempdir() {
        Ok(d) => d,
        Err(_) => return,
    };
    let plan = RunPlan {
        dir: dir.path().to_path_buf(),
        blob_size: 1024,
        count: 1,
        ..RunPlan::default()
    };

    // Corrupt archives, both whole-blob records and chunk frames.
    for artifact in ["archive", "archive_seq"] {
        if std::fs::write(dir.path().join(format!("{artifact}0")), data).is_err() {
            return;
        }
    }

    let mut blob = Blob::new(plan.blob_size);

    // These MUST NOT panic; an aborted measurement is fine.
    let _ = bench::run(&ArchiveFile, &plan.target("archive"), Operation::Read, &plan, &mut blob);
    let _ = bench::run(
        &ArchiveFile,
        &plan.target("archive_seq"),
        Operation::ReadChunked,
        &plan,
        &mut blob,
    );
});
