//! Random adapter: the stand-in fracture "model".
//!
//! Scores are uniform draws from a ChaCha20 stream and ignore the image
//! entirely. Seed it for reproducible demos.
//!
//! # Mutex Behavior
//!
//! The RNG sits behind a `Mutex`. A poisoned mutex falls back to a score of
//! 0.0 rather than panicking inside the worker thread.

use std::sync::Mutex;

use image::RgbImage;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::ports::Scorer;

/// Build a ChaCha20 RNG from an optional seed.
///
/// `stream` separates consumers sharing one configured seed so they do not
/// replay each other's draws.
#[must_use]
pub fn seeded_rng(seed: Option<u64>, stream: u64) -> ChaCha20Rng {
    match seed {
        Some(seed) => {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            rng.set_stream(stream);
            rng
        }
        None => ChaCha20Rng::from_entropy(),
    }
}

/// Scorer returning uniform random confidence scores.
pub struct RandomScorer {
    rng: Mutex<ChaCha20Rng>,
}

impl RandomScorer {
    /// Scorer seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(None)
    }

    /// Scorer with an optional fixed seed.
    #[must_use]
    pub fn with_seed(seed: Option<u64>) -> Self {
        Self {
            rng: Mutex::new(seeded_rng(seed, 1)),
        }
    }
}

impl Default for RandomScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer for RandomScorer {
    fn score(&self, _image: &RgbImage) -> f64 {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen::<f64>(),
            Err(_) => {
                tracing::error!("Scorer RNG lock poisoned");
                0.0
            }
        }
    }

    fn name(&self) -> &'static str {
        "random-stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_in_unit_interval() {
        let scorer = RandomScorer::with_seed(Some(3));
        let img = RgbImage::new(4, 4);
        for _ in 0..1000 {
            let s = scorer.score(&img);
            assert!((0.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn test_seeded_scorers_repeat() {
        let a = RandomScorer::with_seed(Some(11));
        let b = RandomScorer::with_seed(Some(11));
        let img = RgbImage::new(1, 1);
        assert_eq!(a.score(&img), b.score(&img));
    }

    #[test]
    fn test_streams_differ() {
        let mut a = seeded_rng(Some(5), 1);
        let mut b = seeded_rng(Some(5), 2);
        assert_ne!(a.gen::<u64>(), b.gen::<u64>());
    }
}
