use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of copy variant numbers, injected so tests can script the choice.
pub trait VariantSource {
    /// A number in `1..=upper`. `upper` is at least 1.
    fn pick(&mut self, upper: u8) -> u8;
}

/// Uniform variant picker backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct RandomVariantSource {
    rng: StdRng,
}

impl RandomVariantSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl Default for RandomVariantSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl VariantSource for RandomVariantSource {
    fn pick(&mut self, upper: u8) -> u8 {
        if upper <= 1 {
            return 1;
        }
        self.rng.random_range(1..=upper)
    }
}
