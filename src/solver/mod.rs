pub mod highs;
pub mod model;
