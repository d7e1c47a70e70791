use serde::{Deserialize, Serialize};

use super::{Garment, WeatherReading};

/// Target garment attributes derived from the weather
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequirementScores {
    /// 1 (hot) to 5 (very cold)
    pub warmth: u8,
    /// 1 (dry) to 3 (heavy rain)
    pub impermeability: u8,
    /// 3 or 4
    pub layering: u8,
}

/// Per-component contributions to a garment's ranking score
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ScoreBreakdown {
    pub warmth_fit: f64,
    pub impermeability_fit: f64,
    pub layering_fit: f64,
    pub diversity_penalty: f64,
}

/// A garment annotated with its ranking score
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedGarment {
    #[serde(flatten)]
    pub garment: Garment,
    pub breakdown: ScoreBreakdown,
    pub total_score: f64,
}

/// A composed outfit, either a single dress or layered slots
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outfit_type")]
pub enum Outfit {
    Dress {
        dress: RankedGarment,
        alternatives: Vec<RankedGarment>,
    },
    Layered {
        outer: Option<RankedGarment>,
        top: RankedGarment,
        bottom: RankedGarment,
        outer_alternatives: Vec<RankedGarment>,
        top_alternatives: Vec<RankedGarment>,
        bottom_alternatives: Vec<RankedGarment>,
    },
}

impl Outfit {
    /// Garments selected into the outfit, excluding alternatives
    pub fn selected(&self) -> Vec<&RankedGarment> {
        match self {
            Outfit::Dress { dress, .. } => vec![dress],
            Outfit::Layered {
                outer, top, bottom, ..
            } => {
                let mut items = vec![top, bottom];
                if let Some(outer) = outer {
                    items.push(outer);
                }
                items
            }
        }
    }
}

/// Result of one recommendation call
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub weather: WeatherReading,
    pub requirements: RequirementScores,
    pub outfit: Outfit,
}
