//! Image analysis pipeline.
//!
//! For each uploaded X-ray:
//! 1. Load and convert to RGB
//! 2. Resize by the zoom factor for display
//! 3. Optionally composite a synthetic 224x224 heatmap over the image
//! 4. After a fixed delay, ask the `Scorer` for a confidence score
//! 5. Append the prediction to the session
//!
//! The heatmap is uniform noise and the default scorer is random: nothing
//! produced here says anything about the image.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

use crate::adapters::random::seeded_rng;
use crate::domain::{has_extension, PredictionResult};
use crate::ports::{Scorer, SessionError, SessionId, SessionStore};
use crate::{BonescopeError, Result};

/// Side length of the synthetic heatmap and of the image it is drawn over.
pub const HEATMAP_SIZE: u32 = 224;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.1;
pub const DEFAULT_ZOOM: f64 = 1.0;

pub const DEFAULT_OPACITY: f64 = 0.4;
pub const OPACITY_STEP: f64 = 0.05;

/// Extensions accepted by the image uploader.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Step a zoom factor by one notch, staying within [0.5, 3.0].
#[must_use]
pub fn step_zoom(zoom: f64, up: bool) -> f64 {
    let next = if up { zoom + ZOOM_STEP } else { zoom - ZOOM_STEP };
    ((next * 10.0).round() / 10.0).clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Step an opacity by one notch, staying within [0, 1].
#[must_use]
pub fn step_opacity(opacity: f64, up: bool) -> f64 {
    let next = if up { opacity + OPACITY_STEP } else { opacity - OPACITY_STEP };
    ((next * 100.0).round() / 100.0).clamp(0.0, 1.0)
}

/// Display dimensions for a zoom factor: `(round(w*zoom), round(h*zoom))`,
/// never below 1 pixel.
#[must_use]
pub fn zoomed_dimensions(width: u32, height: u32, zoom: f64) -> (u32, u32) {
    let scale = |v: u32| ((f64::from(v) * zoom).round() as u32).max(1);
    (scale(width), scale(height))
}

/// Resize an image by a zoom factor.
#[must_use]
pub fn resize_for_display(image: &RgbImage, zoom: f64) -> RgbImage {
    let (w, h) = zoomed_dimensions(image.width(), image.height(), zoom);
    imageops::resize(image, w, h, FilterType::Triangle)
}

/// Classic "jet" colormap: blue at 0, green at 0.5, red at 1.
#[must_use]
pub fn jet(value: f32) -> Rgb<u8> {
    let v = value.clamp(0.0, 1.0);
    let channel = |center: f32| {
        let c = (1.5 - (4.0 * v - center).abs()).clamp(0.0, 1.0);
        (c * 255.0).round() as u8
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

/// Square matrix of values in [0, 1).
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    size: u32,
    values: Vec<f32>,
}

impl Heatmap {
    /// Draw a `size` x `size` uniform random heatmap.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, size: u32) -> Self {
        let values = (0..size * size).map(|_| rng.gen::<f32>()).collect();
        Self { size, values }
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub fn value(&self, x: u32, y: u32) -> f32 {
        self.values[(y * self.size + x) as usize]
    }
}

/// Composite `heatmap` (jet-coloured) over `image` at `opacity`.
///
/// The image is first resized to the heatmap's size.
/// Per channel: `out = (1 - opacity) * image + opacity * jet(value)`.
#[must_use]
pub fn overlay_heatmap(image: &RgbImage, heatmap: &Heatmap, opacity: f64) -> RgbImage {
    let size = heatmap.size();
    let alpha = opacity.clamp(0.0, 1.0) as f32;
    let mut base = imageops::resize(image, size, size, FilterType::Triangle);

    for (x, y, pixel) in base.enumerate_pixels_mut() {
        let heat = jet(heatmap.value(x, y));
        for c in 0..3 {
            let blended = (1.0 - alpha) * f32::from(pixel[c]) + alpha * f32::from(heat[c]);
            pixel[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
    base
}

/// How one image should be displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub zoom: f64,
    pub show_heatmap: bool,
    pub opacity: f64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            show_heatmap: false,
            opacity: DEFAULT_OPACITY,
        }
    }
}

/// Load an uploaded image as RGB.
///
/// # Errors
/// Rejects non-image extensions; propagates decode failures.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let shown = path.display().to_string();
    if !has_extension(&shown, &IMAGE_EXTENSIONS) {
        return Err(BonescopeError::Validation(format!(
            "{shown}: unsupported image type (allowed: {})",
            IMAGE_EXTENSIONS.join(", ")
        )));
    }
    Ok(image::open(path)?.to_rgb8())
}

/// Service running the per-image pipeline for one session.
pub struct AnalysisPipeline<C, S>
where
    C: Scorer,
    S: SessionStore,
{
    scorer: Arc<C>,
    store: Arc<S>,
    session: SessionId,
    delay: Duration,
    rng: Mutex<ChaCha20Rng>,
}

impl<C, S> AnalysisPipeline<C, S>
where
    C: Scorer,
    S: SessionStore,
{
    /// Create a new pipeline.
    ///
    /// `delay` is the artificial latency before each score is emitted;
    /// `seed` fixes the heatmap RNG.
    pub fn new(
        scorer: Arc<C>,
        store: Arc<S>,
        session: SessionId,
        delay: Duration,
        seed: Option<u64>,
    ) -> Self {
        Self {
            scorer,
            store,
            session,
            delay,
            rng: Mutex::new(seeded_rng(seed, 2)),
        }
    }

    /// Draw a fresh synthetic heatmap.
    ///
    /// # Errors
    /// Fails if the RNG lock is poisoned.
    pub fn new_heatmap(&self) -> Result<Heatmap> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| SessionError::LockPoisoned)?;
        Ok(Heatmap::random(&mut *rng, HEATMAP_SIZE))
    }

    /// Produce the display image for the given view options.
    ///
    /// With the heatmap on, the result is the 224x224 overlay; otherwise it is
    /// the zoomed image.
    #[must_use]
    pub fn render(&self, image: &RgbImage, heatmap: Option<&Heatmap>, view: &ViewOptions) -> RgbImage {
        match heatmap {
            Some(h) if view.show_heatmap => overlay_heatmap(image, h, view.opacity),
            _ => resize_for_display(image, view.zoom),
        }
    }

    /// Score one image and record the result.
    ///
    /// Blocks for the configured delay first.
    ///
    /// # Errors
    /// Returns error if the session is gone.
    pub fn analyze(&self, image_index: usize, image: &RgbImage) -> Result<PredictionResult> {
        tracing::debug!(
            image_index,
            width = image.width(),
            height = image.height(),
            "Analyzing image..."
        );
        thread::sleep(self.delay);

        let result = PredictionResult::new(image_index, self.scorer.score(image));
        self.store.append_prediction(self.session, result)?;

        tracing::info!(
            "Analysis complete ({}): image {} scored {:.4} -> {}",
            self.scorer.name(),
            image_index,
            result.confidence_score,
            result.label
        );
        Ok(result)
    }

    /// Predictions recorded in this session.
    ///
    /// # Errors
    /// Returns error if the session is gone.
    pub fn predictions(&self) -> Result<Vec<PredictionResult>> {
        Ok(self.store.predictions(self.session)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemorySessionStore, RandomScorer};
    use crate::domain::FractureLabel;

    struct FixedScorer(f64);

    impl Scorer for FixedScorer {
        fn score(&self, _image: &RgbImage) -> f64 {
            self.0
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn pipeline<C: Scorer>(scorer: C) -> AnalysisPipeline<C, MemorySessionStore> {
        let store = Arc::new(MemorySessionStore::new());
        let session = store.create_session().expect("Should create session");
        AnalysisPipeline::new(Arc::new(scorer), store, session, Duration::ZERO, Some(9))
    }

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]))
    }

    #[test]
    fn test_zoomed_dimensions_round() {
        assert_eq!(zoomed_dimensions(640, 480, 1.0), (640, 480));
        assert_eq!(zoomed_dimensions(333, 101, 0.5), (167, 51));
        assert_eq!(zoomed_dimensions(101, 77, 1.3), (131, 100));
        assert_eq!(zoomed_dimensions(1, 1, 0.5), (1, 1));
    }

    #[test]
    fn test_resize_matches_zoomed_dimensions() {
        let img = gradient(123, 45);
        for zoom in [0.5, 0.7, 1.0, 2.3, 3.0] {
            let out = resize_for_display(&img, zoom);
            assert_eq!(out.dimensions(), zoomed_dimensions(123, 45, zoom));
        }
    }

    #[test]
    fn test_step_controls_stay_in_range() {
        let mut z = DEFAULT_ZOOM;
        for _ in 0..40 {
            z = step_zoom(z, true);
        }
        assert_eq!(z, MAX_ZOOM);
        for _ in 0..40 {
            z = step_zoom(z, false);
        }
        assert_eq!(z, MIN_ZOOM);
        assert_eq!(step_zoom(1.0, true), 1.1);

        assert_eq!(step_opacity(DEFAULT_OPACITY, true), 0.45);
        assert_eq!(step_opacity(0.0, false), 0.0);
        assert_eq!(step_opacity(1.0, true), 1.0);
    }

    #[test]
    fn test_jet_endpoints() {
        assert_eq!(jet(0.0), Rgb([0, 0, 128]));
        assert_eq!(jet(0.5), Rgb([128, 255, 128]));
        assert_eq!(jet(1.0), Rgb([128, 0, 0]));
    }

    #[test]
    fn test_overlay_opacity_extremes() {
        let img = gradient(300, 200);
        let mut rng = seeded_rng(Some(1), 0);
        let heat = Heatmap::random(&mut rng, HEATMAP_SIZE);

        let clear = overlay_heatmap(&img, &heat, 0.0);
        let plain = imageops::resize(&img, HEATMAP_SIZE, HEATMAP_SIZE, FilterType::Triangle);
        assert_eq!(clear, plain);

        let opaque = overlay_heatmap(&img, &heat, 1.0);
        assert_eq!(opaque.dimensions(), (HEATMAP_SIZE, HEATMAP_SIZE));
        assert_eq!(*opaque.get_pixel(10, 20), jet(heat.value(10, 20)));
    }

    #[test]
    fn test_render_switches_on_heatmap() {
        let p = pipeline(FixedScorer(0.3));
        let img = gradient(100, 50);
        let heat = p.new_heatmap().expect("heatmap");

        let zoomed = p.render(&img, Some(&heat), &ViewOptions { zoom: 2.0, ..ViewOptions::default() });
        assert_eq!(zoomed.dimensions(), (200, 100));

        let overlaid = p.render(
            &img,
            Some(&heat),
            &ViewOptions { zoom: 2.0, show_heatmap: true, opacity: 0.4 },
        );
        assert_eq!(overlaid.dimensions(), (224, 224));
    }

    #[test]
    fn test_analyze_records_prediction() {
        let p = pipeline(FixedScorer(0.73));
        let result = p.analyze(1, &gradient(8, 8)).expect("Should analyze");
        assert_eq!(result.label, FractureLabel::FractureDetected);
        assert_eq!(p.predictions().expect("list"), vec![result]);

        let p = pipeline(FixedScorer(0.5));
        assert_eq!(p.analyze(2, &gradient(8, 8)).expect("ok").label, FractureLabel::NoFracture);
    }

    #[test]
    fn test_random_scores_are_valid() {
        let p = pipeline(RandomScorer::with_seed(Some(4)));
        let img = gradient(4, 4);
        for i in 1..=200 {
            let r = p.analyze(i, &img).expect("Should analyze");
            assert!((0.0..=1.0).contains(&r.confidence_score));
            assert_eq!(r.label == FractureLabel::FractureDetected, r.confidence_score > 0.5);
        }
        assert_eq!(p.predictions().expect("list").len(), 200);
    }

    #[test]
    fn test_load_image_rejects_other_types() {
        assert!(matches!(
            load_image(Path::new("notes.pdf")),
            Err(BonescopeError::Validation(_))
        ));
    }

    #[test]
    fn test_load_image_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("xray.png");
        gradient(20, 10).save(&path).expect("save png");
        let loaded = load_image(&path).expect("Should load");
        assert_eq!(loaded.dimensions(), (20, 10));
    }
}
