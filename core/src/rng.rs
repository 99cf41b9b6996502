//! Deterministic random number generation.
//!
//! RULE: Nothing in the pipeline may call any platform RNG.
//! All randomness flows through StageRng instances derived
//! from the single seed carried on SimulationParameters.
//!
//! Each pipeline stage gets its own RNG stream, seeded deterministically
//! from (seed XOR stage_index * golden-ratio constant). This means:
//!   - Changing how many draws one stage makes never shifts another stage's stream.
//!   - Each stage's stream is fully reproducible in isolation.
//!   - Two runs built from the same seed share nothing but the seed.

use rand::distributions::Distribution;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single pipeline stage.
pub struct StageRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StageRng {
    /// Create a stage RNG from the run seed and a stable stage index.
    /// The index must never change once assigned.
    pub fn new(seed: u64, stage_index: u64) -> Self {
        let derived_seed = seed ^ (stage_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Draw one value from any `rand` distribution using this stream.
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        dist.sample(&mut self.inner)
    }
}

/// Hands out the per-stage RNGs for a single run.
pub struct RngBank {
    seed: u64,
}

impl RngBank {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// A fresh stream for `slot`. Calling twice yields two identical streams.
    pub fn for_stage(&self, slot: StageSlot) -> StageRng {
        StageRng::new(self.seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stage slot assignments.
/// NEVER reorder or remove entries, only append.
/// Reordering changes every stage's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StageSlot {
    Assignment = 0,
    Conversion = 1,
    Purchase   = 2,
}

impl StageSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::Conversion => "conversion",
            Self::Purchase   => "purchase",
        }
    }
}
