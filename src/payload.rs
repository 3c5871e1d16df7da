// This file is part of BlobBench.
//
// Copyright (C) 2025 Matheus Cardoso <varvedb@matheus.sbs>
//
// This Source Code Form is subject to the terms of the Mozilla Public License
// v. 2.0. If a copy of the MPL was not distributed with this file, You can
// obtain one at http://mozilla.org/MPL/2.0/.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Byte value a fresh [`Blob`] is filled with.
pub const BLOB_FILL: u8 = b'1';

/// Whether payload bytes are regenerated before each write.
///
/// Random content defeats duplicate-content short-circuiting in filesystems and
/// storage engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillMode {
    #[default]
    Constant,
    Random,
}

impl FillMode {
    pub fn from_random_flag(random: bool) -> Self {
        if random {
            Self::Random
        } else {
            Self::Constant
        }
    }

    pub fn is_random(self) -> bool {
        matches!(self, Self::Random)
    }
}

/// Refills `buf` in place according to `mode`.
///
/// `Constant` leaves the buffer untouched. `Random` draws every byte uniformly
/// from a freshly OS-seeded generator.
pub fn refill(buf: &mut [u8], mode: FillMode) {
    if let FillMode::Random = mode {
        let mut rng = StdRng::from_os_rng();
        rng.fill_bytes(buf);
    }
}

/// The in-memory payload whose persistence is measured.
///
/// The length is fixed at construction; benchmarks get mutable access to the bytes
/// but cannot resize them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Vec<u8>,
}

impl Blob {
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![BLOB_FILL; size],
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn refill(&mut self, mode: FillMode) {
        refill(&mut self.bytes, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_blob_has_constant_fill() {
        let blob = Blob::new(128);
        assert_eq!(blob.len(), 128);
        assert!(blob.as_slice().iter().all(|&b| b == BLOB_FILL));
    }

    #[test]
    fn test_constant_refill_is_noop() {
        let mut blob = Blob::new(64);
        blob.as_mut_slice()[7] = 0xAB;
        let before = blob.clone();
        for _ in 0..10 {
            blob.refill(FillMode::Constant);
        }
        assert_eq!(blob, before);
    }

    #[test]
    fn test_random_refill_changes_content() {
        let mut buf = [BLOB_FILL; 64];
        refill(&mut buf, FillMode::Random);
        assert!(buf.iter().any(|&b| b != BLOB_FILL));
    }

    #[test]
    fn test_random_refill_preserves_length() {
        let mut blob = Blob::new(1000);
        blob.refill(FillMode::Random);
        assert_eq!(blob.len(), 1000);
    }

    #[test]
    fn test_refill_empty_buffer() {
        let mut blob = Blob::new(0);
        blob.refill(FillMode::Random);
        assert!(blob.is_empty());
    }

    #[test]
    fn test_fill_mode_from_flag() {
        assert_eq!(FillMode::from_random_flag(true), FillMode::Random);
        assert_eq!(FillMode::from_random_flag(false), FillMode::Constant);
        assert!(!FillMode::default().is_random());
    }
}
