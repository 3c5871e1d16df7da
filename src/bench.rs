// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

//! The benchmark catalogue and the generic timing loop shared by every backend.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, warn};

use crate::backend::{
    ArchiveFile, Backend, FileStream, Intent, Lmdb, Lsm, MappedFile, RawFile, Target,
};
use crate::chunk::ChunkSet;
use crate::constants;
use crate::measured;
use crate::payload::{Blob, FillMode};
use crate::report::{Completed, Measurement};
use crate::timer::Stopwatch;

/// What every iteration of a benchmark does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// One whole-blob write.
    Write,
    /// One whole-blob read into the blob buffer.
    Read,
    /// A chunked pass writing `blob_size` bytes' worth of chunks.
    WriteChunked,
    /// A chunked pass reading `blob_size` bytes' worth of chunks.
    ReadChunked,
}

impl Operation {
    pub fn intent(self) -> Intent {
        match self {
            Self::Write | Self::WriteChunked => Intent::Write,
            Self::Read | Self::ReadChunked => Intent::Read,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Lmdb,
    Lsm,
    FileStream,
    SyncedFileStream,
    RawFile,
    MappedFile,
    Archive,
}

/// One entry of the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Benchmark {
    /// Number selecting the benchmark on the command line.
    pub id: u32,
    /// Name printed in the result line.
    pub label: &'static str,
    /// Artifact name; write and read benchmarks of one strategy share it.
    pub artifact: &'static str,
    pub backend: BackendKind,
    pub op: Operation,
}

const fn entry(
    id: u32,
    label: &'static str,
    artifact: &'static str,
    backend: BackendKind,
    op: Operation,
) -> Benchmark {
    Benchmark {
        id,
        label,
        artifact,
        backend,
        op,
    }
}

/// Every benchmark, in execution order. Reads follow the write that produces their data.
pub const CATALOGUE: &[Benchmark] = &[
    entry(1, "lmdb_write", "lmdb", BackendKind::Lmdb, Operation::Write),
    entry(2, "lmdb_read", "lmdb", BackendKind::Lmdb, Operation::Read),
    entry(3, "lmdb_seq_write", "lmdb_seq", BackendKind::Lmdb, Operation::WriteChunked),
    entry(4, "lmdb_seq_read", "lmdb_seq", BackendKind::Lmdb, Operation::ReadChunked),
    entry(5, "lsm_write", "lsm", BackendKind::Lsm, Operation::Write),
    entry(6, "lsm_read", "lsm", BackendKind::Lsm, Operation::Read),
    entry(7, "lsm_seq_write", "lsm_seq", BackendKind::Lsm, Operation::WriteChunked),
    entry(8, "lsm_seq_read", "lsm_seq", BackendKind::Lsm, Operation::ReadChunked),
    entry(9, "file_stream_write", "file_stream", BackendKind::FileStream, Operation::Write),
    entry(10, "file_stream_read", "file_stream", BackendKind::FileStream, Operation::Read),
    entry(11, "file_stream_seq_write", "file_stream_seq", BackendKind::FileStream, Operation::WriteChunked),
    entry(12, "file_stream_seq_read", "file_stream_seq", BackendKind::FileStream, Operation::ReadChunked),
    entry(13, "file_stream_sync_write", "file_stream_sync", BackendKind::SyncedFileStream, Operation::Write),
    entry(14, "raw_io_write", "raw_io", BackendKind::RawFile, Operation::Write),
    entry(15, "raw_io_read", "raw_io", BackendKind::RawFile, Operation::Read),
    entry(16, "raw_io_seq_write", "raw_io_seq", BackendKind::RawFile, Operation::WriteChunked),
    entry(17, "raw_io_seq_read", "raw_io_seq", BackendKind::RawFile, Operation::ReadChunked),
    entry(18, "mmap_write", "mmap", BackendKind::MappedFile, Operation::Write),
    entry(19, "mmap_read", "mmap", BackendKind::MappedFile, Operation::Read),
    entry(20, "mmap_seq_write", "mmap_seq", BackendKind::MappedFile, Operation::WriteChunked),
    entry(21, "mmap_seq_read", "mmap_seq", BackendKind::MappedFile, Operation::ReadChunked),
    entry(22, "archive_write", "archive", BackendKind::Archive, Operation::Write),
    entry(23, "archive_read", "archive", BackendKind::Archive, Operation::Read),
    entry(24, "archive_seq_write", "archive_seq", BackendKind::Archive, Operation::WriteChunked),
    entry(25, "archive_seq_read", "archive_seq", BackendKind::Archive, Operation::ReadChunked),
];

/// Benchmarks whose id is in `ids`, in catalogue order. An empty list selects all.
///
/// Unknown ids are skipped with a warning.
pub fn select(ids: &[u32]) -> Vec<&'static Benchmark> {
    if ids.is_empty() {
        return CATALOGUE.iter().collect();
    }
    for id in ids {
        if !CATALOGUE.iter().any(|b| b.id == *id) {
            warn!(id, "unknown benchmark id, skipping");
        }
    }
    CATALOGUE.iter().filter(|b| ids.contains(&b.id)).collect()
}

/// Parameters shared by every benchmark of a run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub dir: PathBuf,
    pub blob_size: usize,
    pub count: usize,
    pub fill: FillMode,
    /// Print one `#` per completed iteration on stdout.
    pub progress: bool,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            blob_size: constants::DEFAULT_BLOB_SIZE,
            count: constants::DEFAULT_BLOB_COUNT,
            fill: FillMode::Constant,
            progress: false,
        }
    }
}

impl RunPlan {
    /// `<dir>/<artifact>[_rand-]`
    pub fn target(&self, artifact: &str) -> Target {
        let mut name = artifact.to_string();
        if self.fill.is_random() {
            name.push_str(constants::RANDOM_SUFFIX);
        }
        let capacity = (self.blob_size as u64).saturating_mul(self.count as u64);
        Target::new(self.dir.join(name), capacity)
    }
}

/// Runs one catalogue entry against its backend.
pub fn execute(benchmark: &Benchmark, plan: &RunPlan, blob: &mut Blob) -> Measurement {
    let target = plan.target(benchmark.artifact);
    match benchmark.backend {
        BackendKind::Lmdb => run(&Lmdb::new(), &target, benchmark.op, plan, blob),
        BackendKind::Lsm => run(&Lsm::new(), &target, benchmark.op, plan, blob),
        BackendKind::FileStream => run(&FileStream::new(), &target, benchmark.op, plan, blob),
        BackendKind::SyncedFileStream => {
            run(&FileStream::synced(), &target, benchmark.op, plan, blob)
        }
        BackendKind::RawFile => run(&RawFile, &target, benchmark.op, plan, blob),
        BackendKind::MappedFile => run(&MappedFile, &target, benchmark.op, plan, blob),
        BackendKind::Archive => run(&ArchiveFile, &target, benchmark.op, plan, blob),
    }
}

/// Setup, then `count` measured iterations of `op`, then teardown.
///
/// Only the operations themselves are timed. Whole-blob writes with random fill
/// regenerate the blob before each iteration, outside the measured region.
pub fn run<B: Backend>(
    backend: &B,
    target: &Target,
    op: Operation,
    plan: &RunPlan,
    blob: &mut Blob,
) -> Measurement {
    let opening = Instant::now();
    let mut session = match backend.open(target, op.intent()) {
        Ok(session) => session,
        Err(e) => return Measurement::aborted(e),
    };
    debug!(path = %target.base.display(), elapsed = ?opening.elapsed(), "session opened");

    let mut stopwatch = Stopwatch::new();
    let mut chunks = match op {
        Operation::WriteChunked => ChunkSet::for_write(),
        _ => ChunkSet::for_read(),
    };
    let mut bytes_transferred = 0u64;
    let mut failed_ops = 0;

    for index in 0..plan.count {
        if op == Operation::Write {
            blob.refill(plan.fill);
        }

        let outcome = match op {
            Operation::Write => measured!(
                stopwatch,
                backend
                    .write_blob(&mut session, index, blob.as_slice())
                    .map(|()| blob.len())
            ),
            Operation::Read => measured!(
                stopwatch,
                backend.read_blob(&mut session, index, blob.as_mut_slice())
            ),
            Operation::WriteChunked => measured!(
                stopwatch,
                backend.write_chunked(
                    &mut session,
                    index,
                    plan.blob_size,
                    &mut chunks,
                    plan.fill,
                    &mut stopwatch,
                )
            ),
            Operation::ReadChunked => measured!(
                stopwatch,
                backend.read_chunked(&mut session, index, plan.blob_size, &mut chunks)
            ),
        };

        match outcome {
            Ok(bytes) => bytes_transferred += bytes as u64,
            Err(e) if backend.tolerates_op_failures() => {
                warn!(index, error = %e, "operation failed, continuing");
                failed_ops += 1;
            }
            Err(e) => {
                if let Err(close_err) = backend.close(session) {
                    debug!(error = %close_err, "close after abort failed");
                }
                end_progress(plan);
                return Measurement::aborted(format!("iteration {index}: {e}"));
            }
        }

        if plan.progress {
            print!("#");
            let _ = std::io::stdout().flush();
        }
    }
    end_progress(plan);

    let closing = Instant::now();
    if let Err(e) = backend.close(session) {
        return Measurement::aborted(e);
    }
    debug!(path = %target.base.display(), elapsed = ?closing.elapsed(), "session closed");

    Measurement::Completed(Completed {
        elapsed: stopwatch.elapsed(),
        bytes_transferred,
        failed_ops,
    })
}

fn end_progress(plan: &RunPlan) {
    if plan.progress && plan.count > 0 {
        println!();
    }
}
