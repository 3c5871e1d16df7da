// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

//! Binary serialization strategy (`rkyv`).
//!
//! Whole blobs are written as one archived [`BlobRecord`] per file. Chunked items are
//! written as a stream of length-prefixed archived [`ChunkRecord`]s, one per cycle.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};

use rkyv::rancor;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

use super::{copy_exact, Backend, Intent, Target};
use crate::chunk::{self, ChunkSet, CHUNK_SIZES};
use crate::constants;
use crate::error::{Error, Result};
use crate::payload::FillMode;
use crate::timer::Stopwatch;

#[derive(Archive, Serialize, Deserialize, Debug, PartialEq)]
#[rkyv(derive(Debug))]
pub struct BlobRecord {
    pub index: u64,
    pub data: Vec<u8>,
}

/// One chunk cycle, field by field.
#[derive(Archive, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[rkyv(derive(Debug))]
pub struct ChunkRecord {
    pub d1: [u8; 96],
    pub d2: [u8; 90],
    pub d3: [u8; 96],
    pub d4: [u8; 60],
}

impl Default for ChunkRecord {
    fn default() -> Self {
        Self {
            d1: [0; 96],
            d2: [0; 90],
            d3: [0; 96],
            d4: [0; 60],
        }
    }
}

impl ChunkRecord {
    pub fn slot(&self, slot: usize) -> &[u8] {
        match slot {
            0 => &self.d1,
            1 => &self.d2,
            2 => &self.d3,
            _ => &self.d4,
        }
    }

    pub fn slot_mut(&mut self, slot: usize) -> &mut [u8] {
        match slot {
            0 => &mut self.d1,
            1 => &mut self.d2,
            2 => &mut self.d3,
            _ => &mut self.d4,
        }
    }
}

/// Upper bound of one chunk frame; larger length prefixes mean a corrupt stream.
const MAX_FRAME_LEN: usize = 64 * 1024;

fn write_frame<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<()> {
    let len = u32::try_from(bytes.len())
        .map_err(|_| Error::Serialization(format!("frame of {} bytes is too large", bytes.len())))?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(bytes)?;
    Ok(())
}

fn read_frame<R: Read>(reader: &mut R, frame: &mut AlignedVec) -> Result<ChunkRecord> {
    let mut len = [0u8; 4];
    reader.read_exact(&mut len)?;
    let len = u32::from_le_bytes(len) as usize;
    if len > MAX_FRAME_LEN {
        return Err(Error::Serialization(format!("frame length {len} is out of range")));
    }

    frame.clear();
    frame.resize(len, 0);
    reader.read_exact(frame.as_mut_slice())?;
    Ok(rkyv::from_bytes::<ChunkRecord, rancor::Error>(frame.as_slice())?)
}

/// Serialization through `rkyv`, one file per iteration, no extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveFile;

impl Backend for ArchiveFile {
    type Session = Target;

    fn open(&self, target: &Target, _intent: Intent) -> Result<Target> {
        Ok(target.clone())
    }

    fn write_blob(&self, target: &mut Target, index: usize, blob: &[u8]) -> Result<()> {
        let record = BlobRecord {
            index: index as u64,
            data: blob.to_vec(),
        };
        let bytes = rkyv::to_bytes::<rancor::Error>(&record)?;
        let mut file = File::create(target.indexed(index, None))?;
        file.write_all(&bytes)?;
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
        let file = File::create(target.indexed(index, None))?;
        let mut writer = BufWriter::with_capacity(constants::STREAM_BUFFER_SIZE, file);
        let mut record = ChunkRecord::default();
        let mut slot = 0;

        let written = chunk::write_chunked(budget, chunks, fill, stopwatch, |bytes| {
            record.slot_mut(slot).copy_from_slice(bytes);
            slot += 1;
            if slot == CHUNK_SIZES.len() {
                slot = 0;
                let archived = rkyv::to_bytes::<rancor::Error>(&record)?;
                write_frame(&mut writer, &archived)?;
            }
            Ok(())
        })?;

        writer.flush()?;
        Ok(written)
    }

    fn read_blob(&self, target: &mut Target, index: usize, blob: &mut [u8]) -> Result<usize> {
        let mut file = File::open(target.indexed(index, None))?;
        let len = file.metadata()?.len() as usize;

        let mut bytes = AlignedVec::<16>::with_capacity(len);
        bytes.resize(len, 0);
        file.read_exact(bytes.as_mut_slice())?;

        let archived = rkyv::access::<ArchivedBlobRecord, rancor::Error>(bytes.as_slice())?;
        copy_exact(blob, archived.data.as_slice())
    }

    fn read_chunked(
        &self,
        target: &mut Target,
        index: usize,
        budget: usize,
        chunks: &mut ChunkSet,
    ) -> Result<usize> {
        let file = File::open(target.indexed(index, None))?;
        let mut reader = BufReader::with_capacity(constants::STREAM_BUFFER_SIZE, file);
        let mut frame = AlignedVec::new();
        let mut record = ChunkRecord::default();
        let mut slot = 0;

        chunk::read_chunked(budget, chunks, |buf| {
            if slot == 0 {
                record = read_frame(&mut reader, &mut frame)?;
            }
            buf.copy_from_slice(record.slot(slot));
            slot = (slot + 1) % CHUNK_SIZES.len();
            Ok(())
        })
    }

    fn close(&self, _target: Target) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_record_slots_match_chunk_sizes() {
        let record = ChunkRecord::default();
        for (slot, size) in CHUNK_SIZES.iter().enumerate() {
            assert_eq!(record.slot(slot).len(), *size);
        }
    }

    #[test]
    fn test_frame_round_trip() {
        let mut record = ChunkRecord::default();
        record.slot_mut(2).fill(b'3');

        let archived = rkyv::to_bytes::<rancor::Error>(&record).unwrap();
        let mut stream = Vec::new();
        write_frame(&mut stream, &archived).unwrap();

        let mut frame = AlignedVec::new();
        let decoded = read_frame(&mut stream.as_slice(), &mut frame).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_truncated_frame_is_an_error() {
        let mut frame = AlignedVec::new();
        let mut stream: &[u8] = &[10, 0, 0, 0, 1, 2];
        assert!(read_frame(&mut stream, &mut frame).is_err());
    }

    #[test]
    fn test_oversized_frame_is_rejected() {
        let mut frame = AlignedVec::new();
        let mut stream: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        assert!(matches!(
            read_frame(&mut stream, &mut frame),
            Err(Error::Serialization(_))
        ));
    }
}
