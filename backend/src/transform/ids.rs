//! Identifier generation for bulk sheet entities.
//!
//! Identifiers are 10 characters drawn from `A-Z0-9`. They are only unique in
//! the probabilistic sense (36^10 possibilities); collisions are not checked.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

pub const ID_LENGTH: usize = 10;

const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Source of entity identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random identifiers backed by any [`Rng`].
pub struct RandomIdGenerator<R: Rng> {
    rng: R,
}

impl RandomIdGenerator<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomIdGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomIdGenerator<StdRng> {
    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> IdGenerator for RandomIdGenerator<R> {
    fn next_id(&mut self) -> String {
        (0..ID_LENGTH)
            .map(|_| ID_CHARSET[self.rng.gen_range(0..ID_CHARSET.len())] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_shape() {
        let mut ids = RandomIdGenerator::new();
        for _ in 0..100 {
            let id = ids.next_id();
            assert_eq!(id.len(), ID_LENGTH);
            assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = RandomIdGenerator::seeded(42);
        let mut b = RandomIdGenerator::seeded(42);
        for _ in 0..5 {
            assert_eq!(a.next_id(), b.next_id());
        }
    }

    #[test]
    fn test_ids_do_not_repeat_in_practice() {
        let mut ids = RandomIdGenerator::seeded(7);
        let seen: HashSet<String> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 1000);
    }
}
