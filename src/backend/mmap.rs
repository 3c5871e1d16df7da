// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

use std::fs::{File, OpenOptions};
use std::path::Path;

use memmap2::{Mmap, MmapMut};

use super::{copy_exact, Backend, Intent, Target};
use crate::chunk::{self, ChunkSet};
use crate::constants;
use crate::error::{Error, Result};
use crate::payload::FillMode;
use crate::timer::Stopwatch;

/// Memory-mapped file I/O (`.mio` files).
///
/// Writes size the file up front, copy into a writable map and sync it before
/// unmapping. Any map, sync or size failure aborts the benchmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappedFile;

fn create_mapped(path: &Path, len: usize) -> Result<MmapMut> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.set_len(len as u64).map_err(|e| Error::mmap(path, e))?;
    // SAFETY: the file was just created and truncated by us and is not shared with
    // any other process for the duration of the map.
    unsafe { MmapMut::map_mut(&file) }.map_err(|e| Error::mmap(path, e))
}

fn open_mapped(path: &Path) -> Result<Mmap> {
    let file = File::open(path)?;
    // SAFETY: benchmark artifacts are only modified by this process, never while mapped.
    unsafe { Mmap::map(&file) }.map_err(|e| Error::mmap(path, e))
}

fn sync_and_unmap(path: &Path, map: MmapMut) -> Result<()> {
    map.flush().map_err(|e| Error::mmap(path, e))
}

impl Backend for MappedFile {
    type Session = Target;

    fn open(&self, target: &Target, _intent: Intent) -> Result<Target> {
        Ok(target.clone())
    }

    fn write_blob(&self, target: &mut Target, index: usize, blob: &[u8]) -> Result<()> {
        let path = target.indexed(index, self.extension());
        let mut map = create_mapped(&path, blob.len())?;
        map.copy_from_slice(blob);
        sync_and_unmap(&path, map)
    }

    fn write_chunked(
        &self,
        target: &mut Target,
        index: usize,
        budget: usize,
        chunks: &mut ChunkSet,
        fill: FillMode,
        stopwatch: &mut Stopwatch,
    ) -> Result<usize> {
        let path = target.indexed(index, self.extension());
        let mut map = create_mapped(&path, chunk::transferable(budget))?;
        let mut offset = 0;
        let written = chunk::write_chunked(budget, chunks, fill, stopwatch, |bytes| {
            map[offset..offset + bytes.len()].copy_from_slice(bytes);
            offset += bytes.len();
            Ok(())
        })?;
        sync_and_unmap(&path, map)?;
        Ok(written)
    }

    fn read_blob(&self, target: &mut Target, index: usize, blob: &mut [u8]) -> Result<usize> {
        let map = open_mapped(&target.indexed(index, self.extension()))?;
        copy_exact(blob, &map)
    }

    fn read_chunked(
        &self,
        target: &mut Target,
        index: usize,
        budget: usize,
        chunks: &mut ChunkSet,
    ) -> Result<usize> {
        let map = open_mapped(&target.indexed(index, self.extension()))?;
        let mut offset = 0;
        chunk::read_chunked(budget, chunks, |buf| {
            let end = offset + buf.len();
            let Some(src) = map.get(offset..end) else {
                return Err(Error::ShortRead {
                    expected: end,
                    actual: map.len(),
                });
            };
            buf.copy_from_slice(src);
            offset = end;
            Ok(())
        })
    }

    fn close(&self, _target: Target) -> Result<()> {
        Ok(())
    }

    fn extension(&self) -> Option<&'static str> {
        Some(constants::MMAP_EXTENSION)
    }
}
