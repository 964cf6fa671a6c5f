//! Desktop/mobile screenshot divergence.
//!
//! [`measure`] is pure: it compares two decoded captures and returns numbers.
//! [`render_visuals`] is the only part that writes files, and nothing it produces feeds
//! back into a score.

pub mod divergence;
pub mod edges;
pub mod histogram;
pub mod render;

pub use divergence::{
    difference_map, layout_score, measure, DivergenceSignals, Measurement, PreparedPair,
    VisualOptions,
};
pub use edges::{canny, l1_distance, projections, to_gray, Projections};
pub use histogram::{color_histogram, color_similarity, correlation};
pub use render::{render_visuals, VisualArtifacts};
