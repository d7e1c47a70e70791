pub mod catalog;
pub mod color;
pub mod composer;
pub mod providers;
pub mod ranker;
pub mod requirements;

pub use catalog::{GarmentCatalog, RejectedRecord};
pub use color::color_compatibility;
pub use composer::{RecommendationEngine, RecommendationError};
pub use ranker::{DiversityRule, GarmentRanker, RANK_LIMIT};
pub use requirements::compute_requirements;
