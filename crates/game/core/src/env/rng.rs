//! Deterministic random rolls for block and critical checks.
//!
//! Rolls are a pure function of a seed. The seed mixes the arena seed, the
//! tick nonce, the acting entity, and the roll kind, so replaying the same
//! inputs on any authority reproduces the same hits.

/// RNG oracle for deterministic random number generation.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll 0..100 and succeed when the roll is below `percent`.
    ///
    /// `0` never succeeds, `100` always does.
    fn chance(&self, seed: u64, percent: u32) -> bool {
        (self.next_u32(seed) % 100) < percent.min(100)
    }
}

/// PCG-XSH-RR generator: one LCG step followed by a xorshift/rotate output permutation.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = seed
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

/// Independent roll kinds within a single skill application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RollKind {
    Block = 1,
    Critical = 2,
}

/// Mix the roll inputs into a seed (SplitMix64-style avalanche).
pub fn compute_seed(game_seed: u64, nonce: u64, actor: u32, target: u32, roll: RollKind) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(actor).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(target).wrapping_mul(0xc2b2ae3d27d4eb4f);
    hash ^= u64::from(roll as u32).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
