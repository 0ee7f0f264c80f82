/// Exclusive upper bound for freshly drawn seeds, short enough to type back in
pub const SEED_RANGE: u64 = 1_000_000;

/// Seeded PRNG shared by every generation phase and the hint advisor.
///
/// All puzzle randomness comes from one stream so a seed replays the
/// exact same puzzle on any platform.
#[derive(Debug, Clone)]
pub struct PuzzleRng {
    state: u64,
}

impl PuzzleRng {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        // PCG-like PRNG
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    /// Uniform value in `0..bound`. `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        (self.next_u64() as usize) % bound
    }
}

/// Draw a fresh seed from the OS in `0..SEED_RANGE`
pub fn random_seed() -> u64 {
    let mut seed_bytes = [0u8; 8];
    getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|err| {
        log::warn!("getrandom failed ({}), falling back to a counter seed", err);
        static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
        let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        seed_bytes = counter.to_le_bytes();
    });
    u64::from_le_bytes(seed_bytes) % SEED_RANGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = PuzzleRng::with_seed(1234);
        let mut b = PuzzleRng::with_seed(1234);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_below_stays_in_range() {
        let mut rng = PuzzleRng::with_seed(7);
        for bound in 1..50 {
            assert!(rng.below(bound) < bound);
        }
    }

    #[test]
    fn test_random_seed_range() {
        for _ in 0..10 {
            assert!(random_seed() < SEED_RANGE);
        }
    }
}
