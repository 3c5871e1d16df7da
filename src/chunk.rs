// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

//! Chunked transfers: a byte budget is split into a repeating cycle of four
//! fixed-size chunks, simulating structured incremental writes instead of one
//! monolithic write.

use crate::error::Result;
use crate::payload::{self, FillMode};
use crate::timer::Stopwatch;

/// Sizes of the four chunks, in presentation order.
pub const CHUNK_SIZES: [usize; 4] = [96, 90, 96, 60];

/// Bytes moved by one full cycle of four chunks.
pub const CYCLE_SIZE: usize = CHUNK_SIZES[0] + CHUNK_SIZES[1] + CHUNK_SIZES[2] + CHUNK_SIZES[3];

/// Fill byte of each write chunk.
pub const CHUNK_FILL: [u8; 4] = *b"1234";

/// Number of full cycles that fit in `budget`.
pub fn cycles(budget: usize) -> usize {
    budget / CYCLE_SIZE
}

/// Bytes a chunked pass over `budget` actually moves.
///
/// The remainder below one full cycle is dropped, never flushed as a partial chunk.
pub fn transferable(budget: usize) -> usize {
    cycles(budget) * CYCLE_SIZE
}

/// The four chunk buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSet {
    chunks: [Box<[u8]>; 4],
}

impl ChunkSet {
    /// Chunks filled with `'1'`, `'2'`, `'3'` and `'4'`.
    pub fn for_write() -> Self {
        Self {
            chunks: std::array::from_fn(|i| vec![CHUNK_FILL[i]; CHUNK_SIZES[i]].into_boxed_slice()),
        }
    }

    /// Zeroed chunks that absorb bytes read from a resource.
    pub fn for_read() -> Self {
        Self {
            chunks: std::array::from_fn(|i| vec![0u8; CHUNK_SIZES[i]].into_boxed_slice()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.chunks.iter().map(|c| &**c)
    }

    pub fn refill(&mut self, mode: FillMode) {
        for chunk in self.chunks.iter_mut() {
            payload::refill(chunk, mode);
        }
    }
}

/// Presents the chunk cycle to `sink` until less than one cycle of `budget` remains.
///
/// With [`FillMode::Random`] the chunks are refilled at the start of every cycle, with
/// `stopwatch` stopped around the refill so it never counts toward the measured time.
/// The caller is expected to have started `stopwatch`.
///
/// Returns the number of bytes handed to `sink`.
pub fn write_chunked<F>(
    budget: usize,
    chunks: &mut ChunkSet,
    fill: FillMode,
    stopwatch: &mut Stopwatch,
    mut sink: F,
) -> Result<usize>
where
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut remaining = budget;
    let mut written = 0;

    while remaining >= CYCLE_SIZE {
        if fill.is_random() {
            stopwatch.stop();
            chunks.refill(fill);
            stopwatch.start();
        }
        for chunk in chunks.iter() {
            sink(chunk)?;
        }
        remaining -= CYCLE_SIZE;
        written += CYCLE_SIZE;
    }

    Ok(written)
}

/// Presents each chunk buffer mutably to `source`, in cycle order, until less than
/// one cycle of `budget` remains.
///
/// Returns the number of bytes the chunks were offered.
pub fn read_chunked<F>(budget: usize, chunks: &mut ChunkSet, mut source: F) -> Result<usize>
where
    F: FnMut(&mut [u8]) -> Result<()>,
{
    let mut remaining = budget;
    let mut read = 0;

    while remaining >= CYCLE_SIZE {
        for chunk in chunks.chunks.iter_mut() {
            source(chunk)?;
        }
        remaining -= CYCLE_SIZE;
        read += CYCLE_SIZE;
    }

    Ok(read)
}
