use blobbench::chunk::{self, ChunkSet, CHUNK_SIZES, CYCLE_SIZE};
use blobbench::payload::FillMode;
use blobbench::timer::Stopwatch;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_budget_below_one_cycle_writes_nothing(budget in 0..CYCLE_SIZE) {
        let mut chunks = ChunkSet::for_write();
        let mut stopwatch = Stopwatch::new();
        let mut calls = 0;
        let written = chunk::write_chunked(budget, &mut chunks, FillMode::Constant, &mut stopwatch, |_| {
            calls += 1;
            Ok(())
        }).unwrap();
        prop_assert_eq!(calls, 0);
        prop_assert_eq!(written, 0);
    }

    #[test]
    fn test_chunk_sequence_follows_cycle(budget in 0usize..20_000) {
        let mut chunks = ChunkSet::for_write();
        let mut stopwatch = Stopwatch::new();
        let mut sizes = Vec::new();
        let written = chunk::write_chunked(budget, &mut chunks, FillMode::Constant, &mut stopwatch, |bytes| {
            sizes.push(bytes.len());
            Ok(())
        }).unwrap();

        prop_assert_eq!(sizes.len(), 4 * (budget / CYCLE_SIZE));
        for (i, size) in sizes.iter().enumerate() {
            prop_assert_eq!(*size, CHUNK_SIZES[i % 4]);
        }
        prop_assert_eq!(written, chunk::transferable(budget));
        prop_assert!(budget - written < CYCLE_SIZE);
    }

    #[test]
    fn test_read_matches_write_count(budget in 0usize..20_000) {
        let mut chunks = ChunkSet::for_read();
        let mut calls = 0;
        let read = chunk::read_chunked(budget, &mut chunks, |_| {
            calls += 1;
            Ok(())
        }).unwrap();
        prop_assert_eq!(calls, 4 * chunk::cycles(budget));
        prop_assert_eq!(read, chunk::transferable(budget));
    }

    #[test]
    fn test_constant_refill_is_identity(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut buf = bytes.clone();
        blobbench::payload::refill(&mut buf, FillMode::Constant);
        prop_assert_eq!(buf, bytes);
    }
}
