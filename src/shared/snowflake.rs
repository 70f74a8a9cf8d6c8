//! Snowflake IDs
//!
//! 64-bit row IDs ordered by creation time:
//!
//! ```text
//! | 1 unused | 41 ms since EPOCH_MS | 10 worker | 12 sequence |
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// 2024-01-01T00:00:00Z
pub const EPOCH_MS: u64 = 1_704_067_200_000;

const WORKER_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const WORKER_MASK: u64 = (1 << WORKER_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

/// Lock-free generator.
///
/// `state` packs the last used millisecond and sequence the same way
/// they appear in an ID, so one compare-exchange advances both.
pub struct SnowflakeGenerator {
    worker: u64,
    state: AtomicU64,
}

impl SnowflakeGenerator {
    /// `worker_id` is truncated to 10 bits.
    pub fn new(worker_id: u16) -> Self {
        Self {
            worker: u64::from(worker_id) & WORKER_MASK,
            state: AtomicU64::new(0),
        }
    }

    pub fn generate(&self) -> i64 {
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let last_ms = current >> SEQUENCE_BITS;
            let now = elapsed_ms().max(last_ms);

            let next = if now == last_ms {
                let sequence = (current & SEQUENCE_MASK) + 1;
                if sequence > SEQUENCE_MASK {
                    // Sequence exhausted; borrow the next millisecond.
                    (now + 1) << SEQUENCE_BITS
                } else {
                    current + 1
                }
            } else {
                now << SEQUENCE_BITS
            };

            match self.state.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return self.compose(next),
                Err(actual) => current = actual,
            }
        }
    }

    fn compose(&self, state: u64) -> i64 {
        let ms = state >> SEQUENCE_BITS;
        let sequence = state & SEQUENCE_MASK;
        ((ms << (WORKER_BITS + SEQUENCE_BITS)) | (self.worker << SEQUENCE_BITS) | sequence) as i64
    }
}

fn elapsed_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_millis() as u64).saturating_sub(EPOCH_MS))
        .unwrap_or(0)
}

/// Unix milliseconds at which `id` was generated
pub fn created_at_ms(id: i64) -> u64 {
    ((id as u64) >> (WORKER_BITS + SEQUENCE_BITS)) + EPOCH_MS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_increase() {
        let ids = SnowflakeGenerator::new(3);
        let mut last = 0;
        for _ in 0..10_000 {
            let id = ids.generate();
            assert!(id > last);
            last = id;
        }
    }

    #[test]
    fn test_worker_bits() {
        let id = SnowflakeGenerator::new(5).generate() as u64;
        assert_eq!((id >> SEQUENCE_BITS) & WORKER_MASK, 5);
    }

    #[test]
    fn test_created_at_is_now() {
        let id = SnowflakeGenerator::new(1).generate();
        let now = elapsed_ms() + EPOCH_MS;
        let at = created_at_ms(id);
        assert!(at <= now + 1);
        assert!(now - at < 1_000);
    }

    #[test]
    fn test_unique_across_threads() {
        let ids = Arc::new(SnowflakeGenerator::new(1));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..2_000).map(|_| ids.generate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 8_000);
    }
}
