/// Tolerance below which a vertical displacement counts as flat.
pub(crate) const EPS: f64 = 1e-6;

/// Slope sign of a character line across a layer transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slope {
    Up,
    Flat,
    Down,
}

impl Slope {
    /// Classify a vertical delta. NaN (unknown neighbor) counts as flat.
    pub(crate) fn of(dy: f64) -> Self {
        if dy.abs() > EPS {
            if dy > 0.0 { Slope::Down } else { Slope::Up }
        } else {
            Slope::Flat
        }
    }
}
