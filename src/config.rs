use crate::foundation::error::{PlotlineError, PlotlineResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Measure of character-line wiggle minimized by the alignment engine.
pub enum AlignCriterion {
    /// Closed form: stack each layer contiguously, centered at zero. No solver.
    StrictCenter,
    /// Minimize the summed absolute wiggle, `Σ|Δ|`, as an LP.
    #[default]
    SumOfHeights,
    /// Minimize the squared wiggle, `Σ Δ²`, as a QP.
    LeastSquares,
    /// Approximate minimizing the number of nonzero wiggles via a big-M
    /// relaxation. A heuristic, not an exact cardinality minimizer.
    WiggleCount,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Horizontal spacing policy for layer transitions.
pub enum LayerStyle {
    /// Every transition gets the globally maximal required width.
    Uniform,
    /// Each transition gets its own minimal width.
    #[default]
    Condensed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// How same-direction lines are bundled into blocks.
pub enum BlockHandling {
    /// Blocks are recomputed at every slope-sign change in layer order.
    #[default]
    Continuous,
    /// Exactly one upward and one downward block per layer side.
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Alignment engine parameters.
pub struct AlignConfig {
    /// Wiggle measure to minimize.
    pub criterion: AlignCriterion,
    /// Minimum extra vertical spacing between distinct groups in the same
    /// layer, in units of one character row. Must be non-negative.
    pub gap_ratio: f64,
    /// Pin a repeated meeting's anchor to its predecessor's.
    pub align_continued_meetings: bool,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            criterion: AlignCriterion::default(),
            gap_ratio: 1.0,
            align_continued_meetings: false,
        }
    }
}

impl AlignConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> PlotlineResult<()> {
        if !(self.gap_ratio >= 0.0) {
            return Err(PlotlineError::structural(format!(
                "gap ratio must be >= 0, got {}",
                self.gap_ratio
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Justification engine parameters.
pub struct JustifyConfig {
    /// Horizontal spacing policy.
    pub layer_style: LayerStyle,
    /// Block bundling mode.
    pub block_handling: BlockHandling,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Complete configuration surface consumed by the layout pipeline.
pub struct LayoutConfig {
    /// Wiggle measure to minimize.
    pub alignment_mode: AlignCriterion,
    /// Minimum extra vertical spacing between groups in a layer.
    pub gap_ratio: f64,
    /// Pin repeated meetings to their predecessor's anchor.
    pub align_continued_meetings: bool,
    /// Horizontal spacing policy.
    pub layer_width: LayerStyle,
    /// Block bundling mode.
    pub block_handling: BlockHandling,
    /// Render scale: drawing units per character row. Passed through to the
    /// renderer, not used by the core geometry.
    pub one_distance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            alignment_mode: AlignCriterion::SumOfHeights,
            gap_ratio: 1.0,
            align_continued_meetings: false,
            layer_width: LayerStyle::Condensed,
            block_handling: BlockHandling::Continuous,
            one_distance: 20.0,
        }
    }
}

impl LayoutConfig {
    /// Alignment engine view of this configuration.
    pub fn align(&self) -> AlignConfig {
        AlignConfig {
            criterion: self.alignment_mode,
            gap_ratio: self.gap_ratio,
            align_continued_meetings: self.align_continued_meetings,
        }
    }

    /// Justification engine view of this configuration.
    pub fn justify(&self) -> JustifyConfig {
        JustifyConfig {
            layer_style: self.layer_width,
            block_handling: self.block_handling,
        }
    }

    /// Deserialize a configuration from JSON.
    pub fn from_json(json: &str) -> PlotlineResult<Self> {
        serde_json::from_str(json).map_err(|e| PlotlineError::serde(e.to_string()))
    }
}
