//! Scorer port: the fracture "model".
//!
//! The dashboard ships with a random stub. A real classifier can be plugged in
//! here without touching the rest of the pipeline.

use image::RgbImage;

/// Trait for producing a fracture confidence score.
pub trait Scorer: Send + Sync {
    /// Score an image. Implementations should return a value in [0, 1];
    /// the pipeline clamps anything outside that range.
    fn score(&self, image: &RgbImage) -> f64;

    /// Short name for logs and the UI.
    fn name(&self) -> &'static str;
}
