//! Synthetic model-evaluation data for the reporting view.
//!
//! The headline figures are fixed. The "advanced" charts are derived from a
//! randomly drawn set of ground-truth labels and scores that has no link to
//! the predictions made in the Prediction tab.

use rand::Rng;
use serde::Serialize;

use super::prediction::FRACTURE_THRESHOLD;

/// Number of synthetic score/label pairs drawn per evaluation.
pub const SYNTHETIC_SAMPLE_COUNT: usize = 100;

/// Number of histogram bins over [0, 1].
pub const HISTOGRAM_BINS: usize = 10;

pub const ACCURACY: f64 = 0.925;
pub const PRECISION: f64 = 0.902;
pub const RECALL: f64 = 0.887;

/// A headline metric card.
#[derive(Debug, Clone, Copy)]
pub struct HeadlineMetric {
    pub name: &'static str,
    pub display: &'static str,
}

/// Headline metrics shown at the top of the reporting view.
pub const HEADLINE_METRICS: [HeadlineMetric; 4] = [
    HeadlineMetric { name: "Accuracy", display: "92.5%" },
    HeadlineMetric { name: "Precision", display: "90.2%" },
    HeadlineMetric { name: "Recall", display: "88.7%" },
    HeadlineMetric { name: "Inference Time", display: "~120 ms" },
];

/// Errors raised while deriving evaluation metrics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    #[error("Labels and scores differ in length ({labels} vs {scores})")]
    LengthMismatch { labels: usize, scores: usize },

    #[error("At least 2 samples are required, got {0}")]
    TooFewSamples(usize),

    #[error("Only one class present in ground truth; ROC AUC is undefined")]
    SingleClass,
}

/// Score histogram with equal-width bins on [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, `counts.len() + 1` values
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width buckets over [0, 1].
    ///
    /// The last bucket is closed on the right; values outside [0, 1] land in
    /// the nearest edge bucket.
    #[must_use]
    pub fn unit_interval(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let edges = (0..=bins).map(|i| i as f64 / bins as f64).collect();
        let mut counts = vec![0; bins];
        for &v in values {
            let idx = ((v * bins as f64).floor().max(0.0) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Self { edges, counts }
    }

    /// Human-readable bin label, e.g. `0.3-0.4`.
    #[must_use]
    pub fn bin_label(&self, idx: usize) -> String {
        format!("{:.1}-{:.1}", self.edges[idx], self.edges[idx + 1])
    }
}

/// Receiver operating characteristic curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    /// Decision thresholds, descending; the first is `+inf`
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Compute the ROC curve, one point per distinct score.
    ///
    /// # Errors
    /// Fails on mismatched lengths or when only one class is present.
    pub fn compute(y_true: &[u8], y_scores: &[f64]) -> Result<Self, MetricsError> {
        let (positives, negatives) = class_counts(y_true, y_scores)?;

        let mut order: Vec<usize> = (0..y_scores.len()).collect();
        order.sort_by(|&a, &b| y_scores[b].total_cmp(&y_scores[a]));

        let mut fpr = vec![0.0];
        let mut tpr = vec![0.0];
        let mut thresholds = vec![f64::INFINITY];
        let (mut tp, mut fp) = (0usize, 0usize);

        for (pos, &i) in order.iter().enumerate() {
            if y_true[i] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            let last_of_tie = order
                .get(pos + 1)
                .map_or(true, |&next| y_scores[next] != y_scores[i]);
            if last_of_tie {
                fpr.push(fp as f64 / negatives as f64);
                tpr.push(tp as f64 / positives as f64);
                thresholds.push(y_scores[i]);
            }
        }

        Ok(Self { fpr, tpr, thresholds })
    }

    /// Area under the curve by the trapezoidal rule.
    #[must_use]
    pub fn trapezoid_area(&self) -> f64 {
        self.fpr
            .windows(2)
            .zip(self.tpr.windows(2))
            .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
            .sum()
    }

    /// Curve as `(fpr, tpr)` points for charting.
    #[must_use]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.fpr.iter().copied().zip(self.tpr.iter().copied()).collect()
    }
}

/// ROC AUC via the rank-sum statistic, with ties given average ranks.
///
/// # Errors
/// Fails on mismatched lengths or when only one class is present.
pub fn roc_auc(y_true: &[u8], y_scores: &[f64]) -> Result<f64, MetricsError> {
    let (positives, negatives) = class_counts(y_true, y_scores)?;

    let mut order: Vec<usize> = (0..y_scores.len()).collect();
    order.sort_by(|&a, &b| y_scores[a].total_cmp(&y_scores[b]));

    let mut ranks = vec![0.0; y_scores.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && y_scores[order[end + 1]] == y_scores[order[start]] {
            end += 1;
        }
        // 1-based ranks start+1..=end+1 share their mean
        let avg = (start + end) as f64 / 2.0 + 1.0;
        for &i in &order[start..=end] {
            ranks[i] = avg;
        }
        start = end + 1;
    }

    let positive_rank_sum: f64 = y_true
        .iter()
        .zip(&ranks)
        .filter(|(&y, _)| y == 1)
        .map(|(_, &r)| r)
        .sum();

    let p = positives as f64;
    let n = negatives as f64;
    Ok((positive_rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

fn class_counts(y_true: &[u8], y_scores: &[f64]) -> Result<(usize, usize), MetricsError> {
    if y_true.len() != y_scores.len() {
        return Err(MetricsError::LengthMismatch {
            labels: y_true.len(),
            scores: y_scores.len(),
        });
    }
    if y_true.len() < 2 {
        return Err(MetricsError::TooFewSamples(y_true.len()));
    }
    let positives = y_true.iter().filter(|&&y| y == 1).count();
    let negatives = y_true.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(MetricsError::SingleClass);
    }
    Ok((positives, negatives))
}

/// Binary confusion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    /// Tally actual vs predicted labels.
    #[must_use]
    pub fn from_predictions(y_true: &[u8], y_pred: &[u8]) -> Self {
        let mut m = Self::default();
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (t, p) {
                (1, 1) => m.true_positive += 1,
                (1, _) => m.false_negative += 1,
                (_, 1) => m.false_positive += 1,
                _ => m.true_negative += 1,
            }
        }
        m
    }

    /// Rows are actual class, columns predicted: `[[TN, FP], [FN, TP]]`.
    #[must_use]
    pub fn rows(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }
}

/// A synthetic evaluation run and everything derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticEvaluation {
    pub y_true: Vec<u8>,
    pub y_scores: Vec<f64>,
    pub histogram: Histogram,
    pub roc: RocCurve,
    pub auc: f64,
    pub confusion: ConfusionMatrix,
}

impl SyntheticEvaluation {
    /// Derive every chart from given labels and scores.
    ///
    /// # Errors
    /// Fails on mismatched lengths or when only one class is present.
    pub fn from_samples(y_true: Vec<u8>, y_scores: Vec<f64>) -> Result<Self, MetricsError> {
        let roc = RocCurve::compute(&y_true, &y_scores)?;
        let auc = roc_auc(&y_true, &y_scores)?;
        let y_pred: Vec<u8> = y_scores
            .iter()
            .map(|&s| u8::from(s > FRACTURE_THRESHOLD))
            .collect();
        let confusion = ConfusionMatrix::from_predictions(&y_true, &y_pred);
        let histogram = Histogram::unit_interval(&y_scores, HISTOGRAM_BINS);

        Ok(Self {
            y_true,
            y_scores,
            histogram,
            roc,
            auc,
            confusion,
        })
    }

    /// Draw `n` uniform labels and scores.
    ///
    /// Draws are repeated until both classes are present, so AUC is defined.
    ///
    /// # Errors
    /// Returns `TooFewSamples` when `n < 2`.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Result<Self, MetricsError> {
        if n < 2 {
            return Err(MetricsError::TooFewSamples(n));
        }
        loop {
            let y_true: Vec<u8> = (0..n).map(|_| rng.gen_range(0..=1u8)).collect();
            let y_scores: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
            match Self::from_samples(y_true, y_scores) {
                Err(MetricsError::SingleClass) => continue,
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_auc_perfect_and_inverted() {
        let y = [0, 0, 1, 1];
        assert!((roc_auc(&y, &[0.1, 0.2, 0.8, 0.9]).unwrap() - 1.0).abs() < 1e-12);
        assert!(roc_auc(&y, &[0.9, 0.8, 0.2, 0.1]).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_auc_known_value() {
        // sklearn.metrics.roc_auc_score([0, 0, 1, 1], [0.1, 0.4, 0.35, 0.8]) == 0.75
        let auc = roc_auc(&[0, 0, 1, 1], &[0.1, 0.4, 0.35, 0.8]).unwrap();
        assert!((auc - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_auc_with_ties() {
        let auc = roc_auc(&[0, 1, 0, 1], &[0.5, 0.5, 0.2, 0.9]).unwrap();
        // pairs (pos, neg): (0.5,0.5)=0.5 (0.5,0.2)=1 (0.9,0.5)=1 (0.9,0.2)=1 => 3.5/4
        assert!((auc - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_roc_curve_points() {
        let roc = RocCurve::compute(&[0, 0, 1, 1], &[0.1, 0.4, 0.35, 0.8]).unwrap();
        assert_eq!(roc.fpr, vec![0.0, 0.0, 0.5, 0.5, 1.0]);
        assert_eq!(roc.tpr, vec![0.0, 0.5, 0.5, 1.0, 1.0]);
        assert!(roc.thresholds[0].is_infinite());
        assert_eq!(&roc.thresholds[1..], &[0.8, 0.4, 0.35, 0.1]);
    }

    #[test]
    fn test_trapezoid_matches_rank_auc() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let eval = SyntheticEvaluation::sample(&mut rng, SYNTHETIC_SAMPLE_COUNT).unwrap();
        assert!((eval.roc.trapezoid_area() - eval.auc).abs() < 1e-9);
    }

    #[test]
    fn test_single_class_rejected() {
        assert_eq!(roc_auc(&[1, 1, 1], &[0.2, 0.4, 0.6]), Err(MetricsError::SingleClass));
        assert_eq!(
            roc_auc(&[1, 0], &[0.2]),
            Err(MetricsError::LengthMismatch { labels: 2, scores: 1 })
        );
    }

    #[test]
    fn test_confusion_matrix() {
        let m = ConfusionMatrix::from_predictions(&[0, 0, 1, 1, 1], &[0, 1, 1, 0, 1]);
        assert_eq!(m.rows(), [[1, 1], [1, 2]]);
    }

    #[test]
    fn test_histogram_bins() {
        let h = Histogram::unit_interval(&[0.0, 0.05, 0.1, 0.55, 0.99, 1.0], 10);
        assert_eq!(h.edges.len(), 11);
        assert_eq!(h.counts, vec![2, 1, 0, 0, 0, 1, 0, 0, 0, 2]);
        assert_eq!(h.bin_label(3), "0.3-0.4");
    }

    #[test]
    fn test_sample_shape() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let eval = SyntheticEvaluation::sample(&mut rng, SYNTHETIC_SAMPLE_COUNT).unwrap();
        assert_eq!(eval.y_true.len(), 100);
        assert_eq!(eval.y_scores.len(), 100);
        assert!(eval.y_scores.iter().all(|s| (0.0..1.0).contains(s)));
        assert_eq!(eval.histogram.counts.iter().sum::<usize>(), 100);
        let rows = eval.confusion.rows();
        assert_eq!(rows[0][0] + rows[0][1] + rows[1][0] + rows[1][1], 100);
        assert!((0.0..=1.0).contains(&eval.auc));
    }

    #[test]
    fn test_sample_needs_two_points() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(
            SyntheticEvaluation::sample(&mut rng, 1).unwrap_err(),
            MetricsError::TooFewSamples(1)
        );
    }
}
