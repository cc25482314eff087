//! Short code generator
//!
//! Codes are drawn uniformly from `[a-zA-Z0-9]`. The generator owns its RNG so
//! callers decide where randomness comes from: entropy in production, a fixed
//! seed in tests.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 62 个候选字符：小写、大写、数字
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub struct CodeGenerator {
    rng: Mutex<StdRng>,
}

impl CodeGenerator {
    /// Seeded from the thread-local OS-backed RNG.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic sequence; same seed, same codes.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// 生成一个候选短码，不保证唯一
    pub fn generate(&self, length: usize) -> String {
        let mut rng = self.rng.lock();
        (0..length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
