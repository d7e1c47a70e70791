use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::{
    db::WearHistory,
    models::{Outfit, RankedGarment, Recommendation, RequirementScores, Role, WeatherReading},
    services::{
        catalog::GarmentCatalog, color::color_compatibility, ranker::GarmentRanker,
        requirements::compute_requirements,
    },
};

/// Warmth requirement at or below which a dress is considered
const DRESS_MAX_WARMTH: u8 = 3;
/// Warmth requirement at or above which an outer layer is worn
const OUTER_MIN_WARMTH: u8 = 3;

/// Reasons a recommendation could not be composed
///
/// Both variants carry the requirement scores already computed so callers
/// can explain the failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecommendationError {
    #[error("No wardrobe data available")]
    EmptyCatalog { requirements: RequirementScores },

    #[error("Insufficient wardrobe items for recommendation: no {}", join_roles(.missing))]
    InsufficientWardrobe {
        requirements: RequirementScores,
        missing: Vec<Role>,
    },
}

fn join_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}

impl RecommendationError {
    pub fn requirements(&self) -> RequirementScores {
        match self {
            RecommendationError::EmptyCatalog { requirements }
            | RecommendationError::InsufficientWardrobe { requirements, .. } => *requirements,
        }
    }
}

/// Composes outfits from a garment catalog and the shared wear history
///
/// Selection is greedy and never revisits a choice: outer first by score
/// alone, then top adjusted for color against the outer, then bottom adjusted
/// against the top.
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<GarmentCatalog>,
    history: Arc<WearHistory>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<GarmentCatalog>, history: Arc<WearHistory>) -> Self {
        Self { catalog, history }
    }

    pub fn catalog(&self) -> &GarmentCatalog {
        &self.catalog
    }

    pub fn history(&self) -> &WearHistory {
        &self.history
    }

    /// Recommends an outfit from the engine's own catalog
    pub fn recommend(&self, weather: &WeatherReading) -> Result<Recommendation, RecommendationError> {
        self.recommend_at(weather, &self.catalog, Utc::now())
    }

    /// Recommends an outfit from a caller-supplied catalog, such as a user's own wardrobe
    pub fn recommend_from(
        &self,
        weather: &WeatherReading,
        catalog: &GarmentCatalog,
    ) -> Result<Recommendation, RecommendationError> {
        self.recommend_at(weather, catalog, Utc::now())
    }

    /// Recommends an outfit as of `now`
    ///
    /// On success every selected garment is stamped with `now` in the wear
    /// history. Failures leave the history untouched.
    pub fn recommend_at(
        &self,
        weather: &WeatherReading,
        catalog: &GarmentCatalog,
        now: DateTime<Utc>,
    ) -> Result<Recommendation, RecommendationError> {
        let requirements = compute_requirements(weather);

        tracing::debug!(
            temp = weather.temp,
            wind = weather.wind,
            rain = weather.rain,
            warmth = requirements.warmth,
            impermeability = requirements.impermeability,
            layering = requirements.layering,
            "Computed requirement scores"
        );

        if catalog.is_empty() {
            return Err(RecommendationError::EmptyCatalog { requirements });
        }

        let ranker = GarmentRanker::new(&self.history);
        let rank = |role| ranker.rank(&catalog.candidates(role), &requirements, role, now);

        let dress = if requirements.warmth <= DRESS_MAX_WARMTH {
            dress_outfit(rank(Role::Dress))
        } else {
            tracing::debug!(warmth = requirements.warmth, "Too cold for a dress");
            None
        };

        let outfit = match dress {
            Some(outfit) => outfit,
            None => compose_layered(
                &requirements,
                rank(Role::Outer),
                rank(Role::Top),
                rank(Role::Bottom),
            )?,
        };

        let selected: Vec<&str> = outfit
            .selected()
            .into_iter()
            .map(|r| r.garment.image_link.as_str())
            .collect();
        self.history.record(selected.iter().copied(), now);

        tracing::info!(outfit = ?selected, "Outfit recommended");

        Ok(Recommendation {
            weather: weather.clone(),
            requirements,
            outfit,
        })
    }
}

fn dress_outfit(dress_ranks: Vec<RankedGarment>) -> Option<Outfit> {
    let mut ranks = dress_ranks.into_iter();
    let dress = ranks.next()?;
    Some(Outfit::Dress {
        dress,
        alternatives: ranks.collect(),
    })
}

fn compose_layered(
    requirements: &RequirementScores,
    outer_ranks: Vec<RankedGarment>,
    top_ranks: Vec<RankedGarment>,
    bottom_ranks: Vec<RankedGarment>,
) -> Result<Outfit, RecommendationError> {
    let mut missing = Vec::new();
    if top_ranks.is_empty() {
        missing.push(Role::Top);
    }
    if bottom_ranks.is_empty() {
        missing.push(Role::Bottom);
    }
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "Insufficient wardrobe");
        return Err(RecommendationError::InsufficientWardrobe {
            requirements: *requirements,
            missing,
        });
    }

    let (outer, outer_alternatives) =
        if requirements.warmth >= OUTER_MIN_WARMTH && !outer_ranks.is_empty() {
            let (outer, rest) = take_at(outer_ranks, 0);
            (Some(outer), rest)
        } else {
            (None, outer_ranks)
        };

    let top_index = best_alongside(&top_ranks, outer.as_ref());
    let (top, top_alternatives) = take_at(top_ranks, top_index);

    let bottom_index = best_alongside(&bottom_ranks, Some(&top));
    let (bottom, bottom_alternatives) = take_at(bottom_ranks, bottom_index);

    Ok(Outfit::Layered {
        outer,
        top,
        bottom,
        outer_alternatives,
        top_alternatives,
        bottom_alternatives,
    })
}

/// Index of the candidate with the highest score once color compatibility
/// with `anchor` is added. Ties go to the better-ranked candidate.
fn best_alongside(candidates: &[RankedGarment], anchor: Option<&RankedGarment>) -> usize {
    let adjusted = |candidate: &RankedGarment| {
        candidate.total_score
            + anchor.map_or(0.0, |a| color_compatibility(&a.garment, &candidate.garment))
    };

    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (index, candidate) in candidates.iter().enumerate() {
        let score = adjusted(candidate);
        if score > best_score {
            best = index;
            best_score = score;
        }
    }
    best
}

/// Removes the element at `index`, returning it with the rest in rank order
fn take_at(mut ranks: Vec<RankedGarment>, index: usize) -> (RankedGarment, Vec<RankedGarment>) {
    let chosen = ranks.remove(index);
    (chosen, ranks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Garment, LayerPosition, WeatherSource};
    use chrono::Duration;

    fn garment(link: &str, category: Category, warmth: u8, color: &str) -> Garment {
        let layer_position = match category.role() {
            Role::Outer => LayerPosition::Outer,
            Role::Dress => LayerPosition::NotApplicable,
            _ => LayerPosition::Inner,
        };
        Garment {
            image_link: link.to_string(),
            name: None,
            category,
            role: category.role(),
            layer_position,
            warmth_score: warmth,
            impermeability_score: 1,
            layering_score: 3,
            color: color.to_string(),
            pattern: None,
        }
    }

    fn weather(temp: f64) -> WeatherReading {
        WeatherReading::new(temp, 1.0, 0.0, "clear", WeatherSource::Supplied).unwrap()
    }

    fn engine(garments: Vec<Garment>) -> RecommendationEngine {
        RecommendationEngine::new(
            Arc::new(GarmentCatalog::new(garments)),
            Arc::new(WearHistory::in_memory()),
        )
    }

    fn wardrobe() -> Vec<Garment> {
        vec![
            garment("coat", Category::Coat, 5, "black"),
            garment("jacket", Category::Jacket, 3, "red"),
            garment("sweater", Category::Sweater, 5, "white"),
            garment("tee", Category::TShirt, 2, "green"),
            garment("trousers", Category::Trousers, 4, "grey"),
            garment("shorts", Category::Shorts, 1, "beige"),
            garment("sundress", Category::Dress, 2, "yellow"),
        ]
    }

    #[test]
    fn test_cold_day_is_layered_with_outer() {
        let engine = engine(wardrobe());
        let result = engine.recommend(&weather(2.0)).unwrap();

        assert_eq!(result.requirements.warmth, 5);
        match result.outfit {
            Outfit::Layered {
                outer, top, bottom, ..
            } => {
                assert_eq!(outer.unwrap().garment.image_link, "coat");
                assert_eq!(top.garment.image_link, "sweater");
                assert_eq!(bottom.garment.image_link, "trousers");
            }
            other => panic!("expected layered outfit, got {:?}", other),
        }
    }

    #[test]
    fn test_hot_day_prefers_dress() {
        let engine = engine(wardrobe());
        let result = engine.recommend(&weather(28.0)).unwrap();

        assert_eq!(result.requirements.warmth, 2);
        match result.outfit {
            Outfit::Dress { dress, alternatives } => {
                assert_eq!(dress.garment.image_link, "sundress");
                assert!(alternatives.is_empty());
            }
            other => panic!("expected dress, got {:?}", other),
        }
    }

    #[test]
    fn test_dress_skipped_when_cold_even_if_available() {
        let engine = engine(wardrobe());
        for temp in [-5.0, 10.0] {
            let result = engine.recommend(&weather(temp)).unwrap();
            assert!(result.requirements.warmth >= 4);
            assert!(matches!(result.outfit, Outfit::Layered { .. }));
        }
    }

    #[test]
    fn test_falls_through_to_layered_without_dresses() {
        let garments: Vec<Garment> = wardrobe()
            .into_iter()
            .filter(|g| g.role != Role::Dress)
            .collect();
        let engine = engine(garments);

        let result = engine.recommend(&weather(28.0)).unwrap();
        match result.outfit {
            Outfit::Layered {
                outer,
                outer_alternatives,
                ..
            } => {
                // too warm for an outer layer
                assert!(outer.is_none());
                assert_eq!(outer_alternatives.len(), 2);
            }
            other => panic!("expected layered outfit, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_top_is_reported_without_touching_history() {
        let garments: Vec<Garment> = wardrobe()
            .into_iter()
            .filter(|g| g.role != Role::Top)
            .collect();
        let engine = engine(garments);

        let error = engine.recommend(&weather(2.0)).unwrap_err();
        assert_eq!(
            error,
            RecommendationError::InsufficientWardrobe {
                requirements: RequirementScores {
                    warmth: 5,
                    impermeability: 1,
                    layering: 4
                },
                missing: vec![Role::Top],
            }
        );
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_empty_catalog_reported() {
        let engine = engine(vec![]);
        let error = engine.recommend(&weather(15.0)).unwrap_err();
        assert!(matches!(error, RecommendationError::EmptyCatalog { .. }));
        assert_eq!(error.requirements().warmth, 3);
    }

    #[test]
    fn test_selected_garments_recorded_in_history() {
        let engine = engine(wardrobe());
        let now = Utc::now();
        engine
            .recommend_at(&weather(2.0), &engine.catalog().clone(), now)
            .unwrap();

        let history = engine.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history.last_worn("coat"), Some(now));
        assert_eq!(history.last_worn("sweater"), Some(now));
        assert_eq!(history.last_worn("trousers"), Some(now));
        assert!(history.last_worn("jacket").is_none());
    }

    #[test]
    fn test_top_color_chosen_against_outer() {
        // Red jacket: the better-scoring green top clashes, so the white one wins
        let garments = vec![
            garment("jacket", Category::Jacket, 3, "red"),
            garment("green-top", Category::Sweater, 3, "green"),
            garment("white-top", Category::Blouse, 2, "white"),
            garment("jeans", Category::Jeans, 3, "dark blue"),
        ];
        let engine = engine(garments);

        let result = engine.recommend(&weather(20.0)).unwrap();
        match result.outfit {
            Outfit::Layered {
                outer,
                top,
                top_alternatives,
                ..
            } => {
                assert_eq!(outer.unwrap().garment.image_link, "jacket");
                assert_eq!(top.garment.image_link, "white-top");
                assert_eq!(top_alternatives.len(), 1);
                assert_eq!(top_alternatives[0].garment.image_link, "green-top");
            }
            other => panic!("expected layered outfit, got {:?}", other),
        }
    }

    #[test]
    fn test_bottom_color_chosen_against_top() {
        let garments = vec![
            garment("red-top", Category::TShirt, 4, "red"),
            garment("green-pants", Category::Trousers, 4, "green"),
            garment("beige-pants", Category::Trousers, 3, "beige"),
        ];
        let engine = engine(garments);

        let result = engine.recommend(&weather(10.0)).unwrap();
        match result.outfit {
            Outfit::Layered { outer, bottom, .. } => {
                assert!(outer.is_none());
                assert_eq!(bottom.garment.image_link, "beige-pants");
            }
            other => panic!("expected layered outfit, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_recommendation_rotates_tops() {
        let garments = vec![
            garment("sweater-a", Category::Sweater, 4, "navy"),
            garment("sweater-b", Category::Sweater, 3, "navy"),
            garment("jeans", Category::Jeans, 4, "black"),
        ];
        let engine = engine(garments);
        let now = Utc::now();
        let catalog = engine.catalog().clone();

        let first = engine.recommend_at(&weather(10.0), &catalog, now).unwrap();
        let second = engine
            .recommend_at(&weather(10.0), &catalog, now + Duration::hours(1))
            .unwrap();

        let top_of = |r: &Recommendation| match &r.outfit {
            Outfit::Layered { top, .. } => top.clone(),
            other => panic!("expected layered outfit, got {:?}", other),
        };
        let (first_top, second_top) = (top_of(&first), top_of(&second));
        assert_eq!(first_top.garment.image_link, "sweater-a");
        assert_eq!(second_top.garment.image_link, "sweater-b");

        let repeated = match &second.outfit {
            Outfit::Layered {
                top_alternatives, ..
            } => top_alternatives[0].clone(),
            other => panic!("expected layered outfit, got {:?}", other),
        };
        assert_eq!(repeated.garment.image_link, "sweater-a");
        assert!((first_top.total_score - repeated.total_score - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_outer_kept_even_when_it_clashes_with_every_top() {
        let garments = vec![
            garment("red-coat", Category::Coat, 5, "red"),
            garment("black-jacket", Category::Jacket, 3, "black"),
            garment("green-sweater", Category::Sweater, 5, "green"),
            garment("trousers", Category::Trousers, 4, "grey"),
        ];
        let engine = engine(garments);

        let result = engine.recommend(&weather(2.0)).unwrap();
        match result.outfit {
            Outfit::Layered {
                outer,
                top,
                outer_alternatives,
                ..
            } => {
                assert_eq!(outer.unwrap().garment.image_link, "red-coat");
                assert_eq!(top.garment.image_link, "green-sweater");
                assert_eq!(outer_alternatives[0].garment.image_link, "black-jacket");
            }
            other => panic!("expected layered outfit, got {:?}", other),
        }
    }

    #[test]
    fn test_recommendation_survives_unwritable_history_file() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let history = Arc::new(WearHistory::open(blocker.path().join("history.json")));
        let engine = RecommendationEngine::new(
            Arc::new(GarmentCatalog::new(wardrobe())),
            Arc::clone(&history),
        );
        let now = Utc::now();

        let result = engine.recommend_at(&weather(2.0), &engine.catalog().clone(), now);
        assert!(result.is_ok());
        assert_eq!(history.last_worn("coat"), Some(now));
    }
}
