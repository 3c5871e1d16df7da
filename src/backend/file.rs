// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

//! Plain file strategies. Every iteration creates (or opens) its own file, and the
//! open/close is part of the measured operation.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};

use super::{Backend, Intent, Target};
use crate::chunk::{self, ChunkSet};
use crate::constants;
use crate::error::Result;
use crate::payload::FillMode;
use crate::timer::Stopwatch;

/// Buffered file stream with a fixed buffer capacity.
///
/// With `sync` set, every file is flushed to stable storage before it is closed.
#[derive(Debug, Clone)]
pub struct FileStream {
    pub buffer_size: usize,
    pub sync: bool,
}

impl Default for FileStream {
    fn default() -> Self {
        Self {
            buffer_size: constants::STREAM_BUFFER_SIZE,
            sync: false,
        }
    }
}

impl FileStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn synced() -> Self {
        Self {
            sync: true,
            ..Self::default()
        }
    }

    fn finish(&self, writer: BufWriter<File>) -> Result<()> {
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        if self.sync {
            file.sync_all()?;
        }
        Ok(())
    }
}

impl Backend for FileStream {
    type Session = Target;

    fn open(&self, target: &Target, _intent: Intent) -> Result<Target> {
        Ok(target.clone())
    }

    fn write_blob(&self, target: &mut Target, index: usize, blob: &[u8]) -> Result<()> {
        let file = File::create(target.indexed(index, None))?;
        let mut writer = BufWriter::with_capacity(self.buffer_size, file);
        writer.write_all(blob)?;
        self.finish(writer)
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
        let file = File::create(target.indexed(index, None))?;
        let mut writer = BufWriter::with_capacity(self.buffer_size, file);
        let written = chunk::write_chunked(budget, chunks, fill, stopwatch, |bytes| {
            writer.write_all(bytes)?;
            Ok(())
        })?;
        self.finish(writer)?;
        Ok(written)
    }

    fn read_blob(&self, target: &mut Target, index: usize, blob: &mut [u8]) -> Result<usize> {
        let file = File::open(target.indexed(index, None))?;
        let mut reader = BufReader::with_capacity(self.buffer_size, file);
        reader.read_exact(blob)?;
        Ok(blob.len())
    }

    fn read_chunked(
        &self,
        target: &mut Target,
        index: usize,
        budget: usize,
        chunks: &mut ChunkSet,
    ) -> Result<usize> {
        let file = File::open(target.indexed(index, None))?;
        let mut reader = BufReader::with_capacity(self.buffer_size, file);
        chunk::read_chunked(budget, chunks, |buf| {
            reader.read_exact(buf)?;
            Ok(())
        })
    }

    fn close(&self, _target: Target) -> Result<()> {
        Ok(())
    }
}

/// Unbuffered file I/O: every write or read goes straight to the file descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFile;

impl Backend for RawFile {
    type Session = Target;

    fn open(&self, target: &Target, _intent: Intent) -> Result<Target> {
        Ok(target.clone())
    }

    fn write_blob(&self, target: &mut Target, index: usize, blob: &[u8]) -> Result<()> {
        let mut file = File::create(target.indexed(index, None))?;
        file.write_all(blob)?;
        Ok(())
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
        let mut file = File::create(target.indexed(index, None))?;
        chunk::write_chunked(budget, chunks, fill, stopwatch, |bytes| {
            file.write_all(bytes)?;
            Ok(())
        })
    }

    fn read_blob(&self, target: &mut Target, index: usize, blob: &mut [u8]) -> Result<usize> {
        let mut file = File::open(target.indexed(index, None))?;
        file.read_exact(blob)?;
        Ok(blob.len())
    }

    fn read_chunked(
        &self,
        target: &mut Target,
        index: usize,
        budget: usize,
        chunks: &mut ChunkSet,
    ) -> Result<usize> {
        let mut file = File::open(target.indexed(index, None))?;
        chunk::read_chunked(budget, chunks, |buf| {
            file.read_exact(buf)?;
            Ok(())
        })
    }

    fn close(&self, _target: Target) -> Result<()> {
        Ok(())
    }
}
