use std::fs;

use blobbench::backend::{ArchiveFile, Backend, FileStream, Lmdb, Lsm, MappedFile, RawFile, Target};
use blobbench::bench::{self, Operation, RunPlan};
use blobbench::payload::{Blob, FillMode};
use blobbench::report::Measurement;
use tempfile::{tempdir, TempDir};

fn plan(dir: &TempDir, blob_size: usize, count: usize) -> RunPlan {
    RunPlan {
        dir: dir.path().to_path_buf(),
        blob_size,
        count,
        fill: FillMode::Constant,
        progress: false,
    }
}

fn random_blob(size: usize) -> Blob {
    let mut blob = Blob::new(size);
    blob.refill(FillMode::Random);
    blob
}

fn zeroed_blob(size: usize) -> Blob {
    let mut blob = Blob::new(size);
    blob.as_mut_slice().fill(0);
    blob
}

fn completed_bytes(measurement: &Measurement) -> u64 {
    match measurement {
        Measurement::Completed(c) => {
            assert_eq!(c.failed_ops, 0);
            c.bytes_transferred
        }
        Measurement::Aborted { reason } => panic!("benchmark aborted: {reason}"),
    }
}

/// Writes one random blob through `backend`, reads it back into a zeroed blob and
/// compares.
fn assert_round_trip<B: Backend>(backend: &B, artifact: &str) {
    let dir = tempdir().unwrap();
    let plan = plan(&dir, 1024, 1);
    let target = plan.target(artifact);

    let mut written = random_blob(1024);
    let m = bench::run(backend, &target, Operation::Write, &plan, &mut written);
    assert_eq!(completed_bytes(&m), 1024);

    let mut read = zeroed_blob(1024);
    let m = bench::run(backend, &target, Operation::Read, &plan, &mut read);
    assert_eq!(completed_bytes(&m), 1024);
    assert_eq!(read, written);
}

#[test]
fn test_file_stream_round_trip() {
    assert_round_trip(&FileStream::new(), "file_stream");
}

#[test]
fn test_synced_file_stream_round_trip() {
    assert_round_trip(&FileStream::synced(), "file_stream_sync");
}

#[test]
fn test_raw_file_round_trip() {
    assert_round_trip(&RawFile, "raw_io");
}

#[test]
fn test_mapped_file_round_trip() {
    assert_round_trip(&MappedFile, "mmap");
}

#[test]
fn test_archive_round_trip() {
    assert_round_trip(&ArchiveFile, "archive");
}

#[test]
fn test_lmdb_round_trip() {
    assert_round_trip(&Lmdb::new(), "lmdb");
}

#[test]
fn test_lsm_round_trip() {
    assert_round_trip(&Lsm::new(), "lsm");
}

#[test]
fn test_file_stream_artifact_layout() {
    let dir = tempdir().unwrap();
    let plan = plan(&dir, 1024, 3);
    let target = plan.target("file_stream");

    let m = bench::run(&FileStream::new(), &target, Operation::Write, &plan, &mut Blob::new(1024));
    assert_eq!(completed_bytes(&m), 3 * 1024);

    for i in 0..3 {
        let bytes = fs::read(dir.path().join(format!("file_stream{i}"))).unwrap();
        assert_eq!(bytes, vec![b'1'; 1024]);
    }
}

#[test]
fn test_mapped_files_use_mio_extension() {
    let dir = tempdir().unwrap();
    let plan = plan(&dir, 512, 2);
    let target = plan.target("mmap");

    let m = bench::run(&MappedFile, &target, Operation::Write, &plan, &mut Blob::new(512));
    assert!(!m.is_aborted());
    assert_eq!(fs::metadata(dir.path().join("mmap0.mio")).unwrap().len(), 512);
    assert_eq!(fs::metadata(dir.path().join("mmap1.mio")).unwrap().len(), 512);
}

#[test]
fn test_chunked_transfer_drops_partial_cycle() {
    let dir = tempdir().unwrap();
    let plan = plan(&dir, 1000, 1);
    let target = plan.target("raw_io_seq");
    let mut blob = Blob::new(1000);

    let m = bench::run(&RawFile, &target, Operation::WriteChunked, &plan, &mut blob);
    assert_eq!(completed_bytes(&m), 684);

    let contents = fs::read(dir.path().join("raw_io_seq0")).unwrap();
    assert_eq!(contents.len(), 684);
    assert_eq!(&contents[..96], &[b'1'; 96][..]);
    assert_eq!(&contents[96..186], &[b'2'; 90][..]);
    assert_eq!(&contents[186..282], &[b'3'; 96][..]);
    assert_eq!(&contents[282..342], &[b'4'; 60][..]);

    let m = bench::run(&RawFile, &target, Operation::ReadChunked, &plan, &mut blob);
    assert_eq!(completed_bytes(&m), 684);
}

#[test]
fn test_chunked_round_trip_across_strategies() {
    let dir = tempdir().unwrap();
    let plan = plan(&dir, 1000, 2);
    let mut blob = Blob::new(1000);

    fn check<B: Backend>(backend: &B, target: &Target, plan: &RunPlan, blob: &mut Blob) {
        let m = bench::run(backend, target, Operation::WriteChunked, plan, blob);
        assert_eq!(completed_bytes(&m), 2 * 684);
        let m = bench::run(backend, target, Operation::ReadChunked, plan, blob);
        assert_eq!(completed_bytes(&m), 2 * 684);
    }

    check(&FileStream::new(), &plan.target("file_stream_seq"), &plan, &mut blob);
    check(&MappedFile, &plan.target("mmap_seq"), &plan, &mut blob);
    check(&ArchiveFile, &plan.target("archive_seq"), &plan, &mut blob);
    check(&Lmdb::new(), &plan.target("lmdb_seq"), &plan, &mut blob);
}

#[test]
fn test_random_chunked_write_changes_chunk_content() {
    let dir = tempdir().unwrap();
    let mut plan = plan(&dir, 684, 1);
    plan.fill = FillMode::Random;
    let target = plan.target("raw_io_seq");

    let m = bench::run(&RawFile, &target, Operation::WriteChunked, &plan, &mut Blob::new(684));
    assert_eq!(completed_bytes(&m), 684);

    let contents = fs::read(dir.path().join("raw_io_seq_rand-0")).unwrap();
    assert_eq!(contents.len(), 684);
    assert_ne!(&contents[..96], &[b'1'; 96][..]);
}

#[test]
fn test_read_before_write_aborts() {
    let dir = tempdir().unwrap();
    let plan = plan(&dir, 256, 1);
    let mut blob = Blob::new(256);

    let m = bench::run(&FileStream::new(), &plan.target("file_stream"), Operation::Read, &plan, &mut blob);
    assert!(m.is_aborted());

    let m = bench::run(&MappedFile, &plan.target("mmap"), Operation::Read, &plan, &mut blob);
    assert!(m.is_aborted());

    let m = bench::run(&Lmdb::new(), &plan.target("lmdb"), Operation::Read, &plan, &mut blob);
    assert!(m.is_aborted());

    let m = bench::run(&Lsm::new(), &plan.target("lsm"), Operation::Read, &plan, &mut blob);
    assert!(m.is_aborted());
}

#[test]
fn test_lmdb_counts_missing_keys_without_aborting() {
    let dir = tempdir().unwrap();
    let mut plan = plan(&dir, 256, 2);
    let target = plan.target("lmdb");
    let mut blob = Blob::new(256);

    let m = bench::run(&Lmdb::new(), &target, Operation::Write, &plan, &mut blob);
    assert!(!m.is_aborted());

    plan.count = 3;
    let m = bench::run(&Lmdb::new(), &target, Operation::Read, &plan, &mut blob);
    let completed = m.completed().expect("read should complete");
    assert_eq!(completed.failed_ops, 1);
    assert_eq!(completed.bytes_transferred, 2 * 256);
}

#[test]
fn test_short_file_aborts_read() {
    let dir = tempdir().unwrap();
    let plan = plan(&dir, 256, 1);
    fs::write(dir.path().join("raw_io0"), [0u8; 100]).unwrap();

    let m = bench::run(&RawFile, &plan.target("raw_io"), Operation::Read, &plan, &mut Blob::new(256));
    assert!(m.is_aborted());
}

#[test]
fn test_lsm_write_completes() {
    let dir = tempdir().unwrap();
    let plan = plan(&dir, 4096, 4);
    let target = plan.target("lsm");

    let m = bench::run(&Lsm::new(), &target, Operation::Write, &plan, &mut Blob::new(4096));
    assert_eq!(completed_bytes(&m), 4 * 4096);
    assert!(dir.path().join("lsm").is_dir());
}

#[test]
fn test_lmdb_chunked_store_fits_multi_mib_blobs() {
    let dir = tempdir().unwrap();
    let plan = plan(&dir, 4 * 1024 * 1024, 4);
    let target = plan.target("lmdb_seq");
    let mut blob = Blob::new(plan.blob_size);
    let per_item = (plan.blob_size / 342 * 342) as u64;

    let m = bench::run(&Lmdb::new(), &target, Operation::WriteChunked, &plan, &mut blob);
    assert_eq!(completed_bytes(&m), 4 * per_item);

    let m = bench::run(&Lmdb::new(), &target, Operation::ReadChunked, &plan, &mut blob);
    assert_eq!(completed_bytes(&m), 4 * per_item);
}

#[test]
fn test_lmdb_chunked_store_can_be_rewritten() {
    let dir = tempdir().unwrap();
    let plan = plan(&dir, 1000, 3);
    let target = plan.target("lmdb_seq");
    let mut blob = Blob::new(plan.blob_size);

    for _ in 0..2 {
        let m = bench::run(&Lmdb::new(), &target, Operation::WriteChunked, &plan, &mut blob);
        assert_eq!(completed_bytes(&m), 3 * 684);
    }
    let m = bench::run(&Lmdb::new(), &target, Operation::ReadChunked, &plan, &mut blob);
    assert_eq!(completed_bytes(&m), 3 * 684);
}
