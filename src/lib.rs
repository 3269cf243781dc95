//! Plotline is a storyline diagram layout engine.
//!
//! Characters are horizontal threads that converge into group meetings across
//! discrete time layers and diverge afterward, producing a metro-map-like
//! drawing of co-occurrence over time. Plotline turns an abstract layered
//! grouping into concrete, crossing-minimized, smoothly-curved 2D geometry.
//!
//! # Pipeline overview
//!
//! 1. **Align**: `Storyline -> AlignedStoryline` (every group gains a vertical
//!    anchor, chosen by an LP/QP minimizing a wiggle criterion)
//! 2. **Justify**: `AlignedStoryline -> Vec<DrawingFrag>` (block-bundled
//!    S-curves, meeting markers, layer widths)
//! 3. **Render** (external): turn the fragment list into path primitives
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: models keep first-insertion variable order,
//!   so the emitted solver text is stable for a given input.
//! - **Narrow solver seam**: the external LP/QP solver sits behind the
//!   [`Solver`] trait; the default [`HighsSolver`] shells out to the system
//!   `highs` binary.
//!
//! Input parsing and on-screen rendering are out of scope: the contract starts
//! at the in-memory [`Storyline`] and ends at the [`DrawingFrag`] list.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod algebra;
mod align;
mod config;
mod drawing;
mod foundation;
mod justify;
mod metrics;
mod pipeline;
mod solver;
mod story;

pub use algebra::term::{
    Constraint, LinTerm, QuadTerm, Relation, Term, constant, equal, greater_or_equal,
    less_or_equal, variable,
};
pub use align::engine::align;
pub use config::{
    AlignConfig, AlignCriterion, BlockHandling, JustifyConfig, LayerStyle, LayoutConfig,
};
pub use drawing::frag::{CharState, DrawingFrag, SLine, drawing_bounds};
pub use foundation::error::{PlotlineError, PlotlineResult};
pub use justify::engine::justify;
pub use justify::lp::justify_lp;
pub use metrics::{StoryMetrics, story_metrics};
pub use pipeline::{layout, layout_with_alignment};
pub use solver::highs::{HighsSolver, Solver, is_highs_on_path, parse_solution};
pub use solver::model::{
    Direction, LpModel, Objective, Solution, SolveStatus, VarBounds,
};
pub use story::model::{
    AlignedGroup, AlignedLayer, AlignedStoryline, Group, GroupKind, Layer, Storyline,
};
