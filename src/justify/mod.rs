pub mod blocks;
pub mod engine;
pub mod lp;

/// Minimum turning radius of any S-curve arc.
pub(crate) const MIN_RADIUS: f64 = 1.0;
/// Width of the meeting-marker stub appended to every transition.
pub(crate) const MEETING_WIDTH: f64 = 0.5;
/// Floor for a layer's horizontal extent.
pub(crate) const MIN_LAYER_WIDTH: f64 = 0.8;
