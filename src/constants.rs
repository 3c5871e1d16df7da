// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

pub const MIB: usize = 1024 * 1024;

pub const DEFAULT_BLOB_COUNT: usize = 100;
pub const DEFAULT_BLOB_SIZE: usize = 15 * MIB;
pub const DEFAULT_OUTPUT_DIR: &str = "disk-test";
pub const DEFAULT_LOG_DIR: &str = ".";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const LOG_FILE_PREFIX: &str = "blobbench.log";

/// Inserted between the artifact name and the iteration index when blobs are randomized.
pub const RANDOM_SUFFIX: &str = "_rand-";

/// Capacity of the `BufWriter`/`BufReader` used by the file-stream strategy.
pub const STREAM_BUFFER_SIZE: usize = 64 * 1024;

pub const MMAP_EXTENSION: &str = "mio";

pub const LMDB_DB_NAME: &str = "blobs";
pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024; // 10 MB
pub const DEFAULT_MAX_DBS: u32 = 1;
/// Upper bound of LMDB bytes per small record beyond its value (node header, key, pointer).
pub const LMDB_RECORD_OVERHEAD: u64 = 64;

pub const LSM_PARTITION_NAME: &str = "blobs";
