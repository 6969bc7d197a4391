// Feature computation: per-document LIWC category vectors.

pub mod coarse;
pub mod normalize;
pub mod vector;

pub use coarse::{coarse_features, CoarseFeatures};
pub use vector::{compute_vector, count_matches, FeatureVector};
