// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use tracing::debug;

use super::{chunk_key, copy_exact, item_key, Backend, Intent, Target};
use crate::chunk::{self, ChunkSet};
use crate::constants;
use crate::error::{Error, Result};
use crate::payload::FillMode;
use crate::timer::Stopwatch;

#[derive(Debug, Clone)]
pub struct LsmConfig {
    pub partition: String,
}

impl Default for LsmConfig {
    fn default() -> Self {
        Self {
            partition: constants::LSM_PARTITION_NAME.to_string(),
        }
    }
}

/// Log-structured merge-tree key-value engine (`fjall`).
///
/// Chunked items are written as one atomic batch per iteration.
#[derive(Debug, Clone, Default)]
pub struct Lsm {
    config: LsmConfig,
}

pub struct LsmSession {
    keyspace: Keyspace,
    blobs: PartitionHandle,
    intent: Intent,
}

impl Lsm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LsmConfig) -> Self {
        Self { config }
    }
}

impl Backend for Lsm {
    type Session = LsmSession;

    fn open(&self, target: &Target, intent: Intent) -> Result<LsmSession> {
        if intent == Intent::Read && !target.base.is_dir() {
            return Err(Error::DatabaseNotFound(target.base.display().to_string()));
        }

        debug!(path = %target.base.display(), "opening LSM keyspace");
        let keyspace = Config::new(&target.base).open()?;

        if intent == Intent::Read && !keyspace.partition_exists(&self.config.partition) {
            return Err(Error::DatabaseNotFound(self.config.partition.clone()));
        }
        let blobs = keyspace.open_partition(&self.config.partition, PartitionCreateOptions::default())?;

        Ok(LsmSession {
            keyspace,
            blobs,
            intent,
        })
    }

    fn write_blob(&self, session: &mut LsmSession, index: usize, blob: &[u8]) -> Result<()> {
        session.blobs.insert(item_key(index).as_slice(), blob)?;
        Ok(())
    }

    fn write_chunked(
        &self,
        session: &mut LsmSession,
        index: usize,
        budget: usize,
        chunks: &mut ChunkSet,
        fill: FillMode,
        stopwatch: &mut Stopwatch,
    ) -> Result<usize> {
        let mut batch = session.keyspace.batch();
        let mut n = 0;
        let written = chunk::write_chunked(budget, chunks, fill, stopwatch, |bytes| {
            batch.insert(&session.blobs, chunk_key(index, n).as_slice(), bytes);
            n += 1;
            Ok(())
        })?;
        batch.commit()?;
        Ok(written)
    }

    fn read_blob(&self, session: &mut LsmSession, index: usize, blob: &mut [u8]) -> Result<usize> {
        let Some(value) = session.blobs.get(item_key(index))? else {
            return Err(Error::KeyNotFound(index.to_string()));
        };
        copy_exact(blob, &value)
    }

    fn read_chunked(
        &self,
        session: &mut LsmSession,
        index: usize,
        budget: usize,
        chunks: &mut ChunkSet,
    ) -> Result<usize> {
        let blobs = &session.blobs;
        let mut n = 0;
        chunk::read_chunked(budget, chunks, |buf| {
            let Some(value) = blobs.get(chunk_key(index, n))? else {
                return Err(Error::KeyNotFound(format!("{index}:{n}")));
            };
            copy_exact(buf, &value)?;
            n += 1;
            Ok(())
        })
    }

    fn close(&self, session: LsmSession) -> Result<()> {
        if session.intent == Intent::Write {
            session.keyspace.persist(PersistMode::SyncAll)?;
        }
        Ok(())
    }

    fn tolerates_op_failures(&self) -> bool {
        true
    }
}
