// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

//! Persistence strategies behind one capability interface.
//!
//! A [`Backend`] only knows how to open, operate on and close its resource; the
//! timing loop lives in [`crate::bench::run`] and is shared by every strategy.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::chunk::ChunkSet;
use crate::error::Result;
use crate::payload::FillMode;
use crate::timer::Stopwatch;

pub mod archive;
pub mod file;
pub mod lmdb;
pub mod lsm;
pub mod mmap;

pub use archive::ArchiveFile;
pub use file::{FileStream, RawFile};
pub use lmdb::{Lmdb, LmdbConfig};
pub use lsm::{Lsm, LsmConfig};
pub use mmap::MappedFile;

/// What a session is opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Write,
    Read,
}

/// Where a benchmark puts its artifacts.
///
/// `base` is `<dir>/<artifact><suffix>`. Per-iteration strategies append the index
/// and extension; storage engines use `base` itself as their directory.
#[derive(Debug, Clone)]
pub struct Target {
    pub base: PathBuf,
    /// Upper bound of bytes the run will store, for engines that preallocate.
    pub capacity_hint: u64,
}

impl Target {
    pub fn new(base: impl Into<PathBuf>, capacity_hint: u64) -> Self {
        Self {
            base: base.into(),
            capacity_hint,
        }
    }

    /// `<base><index>[.<extension>]`
    pub fn indexed(&self, index: usize, extension: Option<&str>) -> PathBuf {
        let mut name = OsString::from(self.base.as_os_str());
        name.push(index.to_string());
        if let Some(ext) = extension {
            name.push(".");
            name.push(ext);
        }
        PathBuf::from(name)
    }
}

/// A persistence strategy.
///
/// `open` and `close` bracket a run and are never timed. The operation methods are
/// called once per iteration inside the measured region.
pub trait Backend {
    type Session;

    /// Setup. Read sessions must fail if nothing was written before.
    fn open(&self, target: &Target, intent: Intent) -> Result<Self::Session>;

    /// Stores the whole blob as item `index`.
    fn write_blob(&self, session: &mut Self::Session, index: usize, blob: &[u8]) -> Result<()>;

    /// Stores item `index` as a chunked pass over `budget` bytes.
    ///
    /// Implementations drive [`crate::chunk::write_chunked`] and return its byte count.
    fn write_chunked(
        &self,
        session: &mut Self::Session,
        index: usize,
        budget: usize,
        chunks: &mut ChunkSet,
        fill: FillMode,
        stopwatch: &mut Stopwatch,
    ) -> Result<usize>;

    /// Loads item `index` into `blob`, returning the bytes copied.
    fn read_blob(&self, session: &mut Self::Session, index: usize, blob: &mut [u8]) -> Result<usize>;

    /// Loads item `index` chunk by chunk, returning the bytes copied.
    fn read_chunked(
        &self,
        session: &mut Self::Session,
        index: usize,
        budget: usize,
        chunks: &mut ChunkSet,
    ) -> Result<usize>;

    /// Teardown: flush and release everything `open` acquired.
    fn close(&self, session: Self::Session) -> Result<()>;

    /// Extension of per-iteration files, if any.
    fn extension(&self) -> Option<&'static str> {
        None
    }

    /// Whether a failed operation is counted and skipped instead of aborting the run.
    fn tolerates_op_failures(&self) -> bool {
        false
    }
}

/// Key of item `index` in a key-value store: the index as a big-endian `u64`.
pub(crate) fn item_key(index: usize) -> [u8; 8] {
    (index as u64).to_be_bytes()
}

/// Key of the `n`th chunk of item `index`: big-endian `(index, n)`, so keys sort
/// in the order a chunked pass produces them.
pub(crate) fn chunk_key(index: usize, n: usize) -> [u8; 12] {
    let mut key = [0u8; 12];
    key[..8].copy_from_slice(&item_key(index));
    key[8..].copy_from_slice(&(n as u32).to_be_bytes());
    key
}

/// Copies `value` into the front of `dst`, failing if `value` is too short.
pub(crate) fn copy_exact(dst: &mut [u8], value: &[u8]) -> Result<usize> {
    if value.len() < dst.len() {
        return Err(crate::error::Error::ShortRead {
            expected: dst.len(),
            actual: value.len(),
        });
    }
    dst.copy_from_slice(&value[..dst.len()]);
    Ok(dst.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_indexed_path_without_extension() {
        let target = Target::new(Path::new("out").join("file_stream"), 0);
        assert_eq!(target.indexed(3, None), Path::new("out").join("file_stream3"));
    }

    #[test]
    fn test_indexed_path_with_extension() {
        let target = Target::new(Path::new("out").join("mmap_rand-"), 0);
        assert_eq!(
            target.indexed(12, Some("mio")),
            Path::new("out").join("mmap_rand-12.mio")
        );
    }

    #[test]
    fn test_copy_exact_rejects_short_values() {
        let mut dst = [0u8; 4];
        assert!(copy_exact(&mut dst, b"abc").is_err());
        assert_eq!(copy_exact(&mut dst, b"abcdef").unwrap(), 4);
        assert_eq!(&dst, b"abcd");
    }

    #[test]
    fn test_keys() {
        assert_eq!(item_key(7), [0, 0, 0, 0, 0, 0, 0, 7]);
        assert_eq!(chunk_key(7, 2), [0, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0, 2]);
    }

    #[test]
    fn test_chunk_keys_sort_in_write_order() {
        assert!(chunk_key(0, 9) < chunk_key(0, 10));
        assert!(chunk_key(0, 1000) < chunk_key(1, 0));
        assert!(chunk_key(255, 0) < chunk_key(256, 0));
    }
}
