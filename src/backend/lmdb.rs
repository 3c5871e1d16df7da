// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, PutFlags};
use tracing::debug;

use super::{chunk_key, copy_exact, item_key, Backend, Intent, Target};
use crate::chunk::{self, ChunkSet, CHUNK_SIZES, CYCLE_SIZE};
use crate::constants;
use crate::error::{Error, Result};
use crate::payload::FillMode;
use crate::timer::Stopwatch;

pub type BlobDb = Database<Bytes, Bytes>;

/// Configuration for the LMDB environment.
#[derive(Debug, Clone)]
pub struct LmdbConfig {
    /// Lower bound of the map size; grown to fit the run when needed.
    pub map_size: usize,
    pub max_dbs: u32,
}

impl Default for LmdbConfig {
    fn default() -> Self {
        Self {
            map_size: constants::DEFAULT_MAP_SIZE,
            max_dbs: constants::DEFAULT_MAX_DBS,
        }
    }
}

/// B-tree key-value engine (LMDB via `heed`). Item `i` is stored under `i` as a
/// big-endian `u64`; chunk records are appended under big-endian `(i, n)`.
#[derive(Debug, Clone, Default)]
pub struct Lmdb {
    config: LmdbConfig,
}

pub struct LmdbSession {
    env: Env,
    db: BlobDb,
}

impl Lmdb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LmdbConfig) -> Self {
        Self { config }
    }

    /// Room for `capacity_hint` bytes stored either as whole blobs or as chunk
    /// records, doubled and rounded up to a whole MiB, never below the configured size.
    ///
    /// The chunked layout stores one record per chunk, so the per-record overhead
    /// is counted for every chunk the payload can be split into.
    fn map_size_for(&self, capacity_hint: u64) -> Result<usize> {
        let mib = constants::MIB as u64;
        let records = (capacity_hint / CYCLE_SIZE as u64) * CHUNK_SIZES.len() as u64;
        let required = records
            .checked_mul(constants::LMDB_RECORD_OVERHEAD)
            .and_then(|overhead| overhead.checked_add(capacity_hint))
            .and_then(|n| n.checked_mul(2))
            .and_then(|n| n.checked_add(mib - 1))
            .map(|n| n / mib * mib)
            .ok_or_else(|| {
                Error::InvalidConfig(format!("map size overflow for {capacity_hint} bytes"))
            })?;
        let required = usize::try_from(required).map_err(|_| {
            Error::InvalidConfig(format!("map size {required} exceeds the address space"))
        })?;
        Ok(required.max(self.config.map_size))
    }
}

impl Backend for Lmdb {
    type Session = LmdbSession;

    fn open(&self, target: &Target, intent: Intent) -> Result<LmdbSession> {
        match intent {
            Intent::Write => std::fs::create_dir_all(&target.base)?,
            Intent::Read if !target.base.is_dir() => {
                return Err(Error::DatabaseNotFound(target.base.display().to_string()))
            }
            Intent::Read => {}
        }

        let map_size = self.map_size_for(target.capacity_hint)?;
        debug!(path = %target.base.display(), map_size, "opening LMDB environment");

        // SAFETY: each environment is opened once per run and closed in `close`
        // before any other benchmark opens the same path.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(self.config.max_dbs)
                .open(&target.base)?
        };

        let db: BlobDb = match intent {
            Intent::Write => {
                let mut wtxn = env.write_txn()?;
                let db: BlobDb = env.create_database(&mut wtxn, Some(constants::LMDB_DB_NAME))?;
                // Chunk records are appended, which needs an empty store.
                db.clear(&mut wtxn)?;
                wtxn.commit()?;
                db
            }
            Intent::Read => {
                let rtxn = env.read_txn()?;
                let db = env
                    .open_database(&rtxn, Some(constants::LMDB_DB_NAME))?
                    .ok_or(Error::DatabaseNotFound(
                        constants::LMDB_DB_NAME.to_string(),
                    ))?;
                rtxn.commit()?;
                db
            }
        };

        Ok(LmdbSession { env, db })
    }

    fn write_blob(&self, session: &mut LmdbSession, index: usize, blob: &[u8]) -> Result<()> {
        let mut wtxn = session.env.write_txn()?;
        session.db.put(&mut wtxn, item_key(index).as_slice(), blob)?;
        wtxn.commit()?;
        Ok(())
    }

    fn write_chunked(
        &self,
        session: &mut LmdbSession,
        index: usize,
        budget: usize,
        chunks: &mut ChunkSet,
        fill: FillMode,
        stopwatch: &mut Stopwatch,
    ) -> Result<usize> {
        let db = session.db;
        let mut wtxn = session.env.write_txn()?;
        let mut n = 0;
        let written = chunk::write_chunked(budget, chunks, fill, stopwatch, |bytes| {
            let key = chunk_key(index, n);
            db.put_with_flags(&mut wtxn, PutFlags::APPEND, key.as_slice(), bytes)?;
            n += 1;
            Ok(())
        })?;
        wtxn.commit()?;
        Ok(written)
    }

    fn read_blob(&self, session: &mut LmdbSession, index: usize, blob: &mut [u8]) -> Result<usize> {
        let rtxn = session.env.read_txn()?;
        let Some(value) = session.db.get(&rtxn, item_key(index).as_slice())? else {
            return Err(Error::KeyNotFound(index.to_string()));
        };
        copy_exact(blob, value)
    }

    fn read_chunked(
        &self,
        session: &mut LmdbSession,
        index: usize,
        budget: usize,
        chunks: &mut ChunkSet,
    ) -> Result<usize> {
        let db = session.db;
        let rtxn = session.env.read_txn()?;
        let mut n = 0;
        chunk::read_chunked(budget, chunks, |buf| {
            let Some(value) = db.get(&rtxn, chunk_key(index, n).as_slice())? else {
                return Err(Error::KeyNotFound(format!("{index}:{n}")));
            };
            copy_exact(buf, value)?;
            n += 1;
            Ok(())
        })
    }

    fn close(&self, session: LmdbSession) -> Result<()> {
        let LmdbSession { env, .. } = session;
        env.prepare_for_closing().wait();
        Ok(())
    }

    fn tolerates_op_failures(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_size_never_below_config() {
        let lmdb = Lmdb::new();
        assert_eq!(lmdb.map_size_for(0).unwrap(), constants::DEFAULT_MAP_SIZE);
    }

    #[test]
    fn test_map_size_grows_to_fit_run() {
        let lmdb = Lmdb::new();
        let hint = 100 * 15 * constants::MIB as u64;
        let size = lmdb.map_size_for(hint).unwrap() as u64;
        let records = hint / CYCLE_SIZE as u64 * 4;
        assert_eq!(size % constants::MIB as u64, 0);
        assert!(size >= 2 * (hint + records * constants::LMDB_RECORD_OVERHEAD));
        assert!(size < 2 * (hint + records * constants::LMDB_RECORD_OVERHEAD) + constants::MIB as u64);
    }

    #[test]
    fn test_map_size_rounds_to_mib() {
        let lmdb = Lmdb::with_config(LmdbConfig {
            map_size: 0,
            max_dbs: 1,
        });
        assert_eq!(lmdb.map_size_for(1).unwrap(), constants::MIB);
    }
}
