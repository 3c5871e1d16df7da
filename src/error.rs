// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

/// Custom error type for BlobBench operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred (e.g., file system issues).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// LMDB storage error (via `heed`).
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    /// LSM storage error (via `fjall`).
    #[error("LSM error: {0}")]
    Fjall(#[from] fjall::Error),

    /// Record serialization or validation failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Mapping, syncing or unmapping a file failed.
    #[error("Memory map failed for {}: {source}", path.display())]
    Mmap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store to read from was never written.
    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    /// Key not found.
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Fewer bytes were available than the target buffer needs.
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<rkyv::rancor::Error> for Error {
    fn from(e: rkyv::rancor::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl Error {
    pub(crate) fn mmap(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Mmap {
            path: path.into(),
            source,
        }
    }
}
