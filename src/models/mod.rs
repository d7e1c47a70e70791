mod garment;
mod outfit;
mod weather;

pub use garment::{
    Category, Garment, GarmentRecord, LayerPosition, RecordRejection, Role,
    DEFAULT_LAYERING_SCORE,
};
pub use outfit::{Outfit, RankedGarment, Recommendation, RequirementScores, ScoreBreakdown};
pub use weather::{WeatherError, WeatherReading, WeatherRecord, WeatherSource};
