use serde::Serialize;

/// Statistics for one cell of the analysis grid.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionMetrics {
    pub row: usize,
    pub col: usize,
    /// Mean `(r + g + b) / 3`.
    pub brightness: f32,
    /// Mean `(max - min) / max`.
    pub saturation: f32,
    /// `max(0, 1 - variance / K₁)`.
    pub uniformity: f32,
}

/// Per-frame scores produced by the analyzer and consumed by the classifier.
///
/// `Default` is the not-ready sentinel: every score is zero and `ready` is
/// false, so nothing in it can contribute confidence.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMetrics {
    pub ready: bool,
    /// Analysis resolution the scores were computed at.
    pub width: usize,
    pub height: usize,
    pub regions: Vec<RegionMetrics>,
    /// Mean brightness over all regions, `[0, 255]`.
    pub brightness: f32,
    /// Mean saturation over all regions, `[0, 1]`.
    pub saturation: f32,
    /// Mean intra-region uniformity, `[0, 1]`.
    pub uniformity: f32,
    /// Agreement between region means, `[0, 1]`.
    pub cross_uniformity: f32,
    /// Fraction of gradient samples above the strong threshold.
    pub strong_edge_density: f32,
    /// Fraction of gradient samples above the weak threshold.
    pub weak_edge_density: f32,
    /// Mean Laplacian magnitude at the sample points.
    pub texture: f32,
    /// `max(0, 1 - texture / K₂)`.
    pub smoothness: f32,
    /// Bottom-row minus top-row mean brightness. Positive reads as floor,
    /// negative as ceiling.
    pub orientation_gradient: f32,
    pub overexposed_ratio: f32,
    pub underexposed_ratio: f32,
}

impl FrameMetrics {
    pub fn not_ready() -> Self {
        Self::default()
    }
}
