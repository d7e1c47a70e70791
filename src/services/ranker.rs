use chrono::{DateTime, Duration, Utc};

use crate::{
    db::WearHistory,
    models::{Garment, RankedGarment, RequirementScores, Role, ScoreBreakdown},
};

/// Number of candidates returned per role
pub const RANK_LIMIT: usize = 3;

const WARMTH_WEIGHT: f64 = 0.40;
const IMPERMEABILITY_WEIGHT: f64 = 0.25;
const LAYERING_WEIGHT: f64 = 0.15;
const FIT_CEILING: f64 = 10.0;
const IMPERMEABILITY_SHORTFALL: f64 = 5.0;

/// Cooldown window and score penalty for recently recommended garments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiversityRule {
    pub cooldown: Duration,
    pub penalty: f64,
}

impl DiversityRule {
    /// Per-role rule table
    ///
    /// The dress rule has a window but no penalty, so it never fires. It is
    /// kept in the table so a penalty can be set without other changes.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Top => Self {
                cooldown: Duration::hours(48),
                penalty: -7.0,
            },
            Role::Bottom => Self {
                cooldown: Duration::hours(72),
                penalty: -3.0,
            },
            Role::Outer => Self {
                cooldown: Duration::zero(),
                penalty: 0.0,
            },
            // TODO: choose a dress penalty once product decides on dress variety
            Role::Dress => Self {
                cooldown: Duration::hours(24),
                penalty: 0.0,
            },
        }
    }

    fn is_inert(&self) -> bool {
        self.penalty == 0.0 || self.cooldown.is_zero()
    }

    /// Penalty for a garment last recommended at `last_worn`, evaluated at `now`
    pub fn penalty_at(&self, last_worn: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
        if self.is_inert() {
            return 0.0;
        }
        match last_worn {
            Some(worn) if now - worn < self.cooldown => self.penalty,
            _ => 0.0,
        }
    }
}

/// Scores garments against weather requirements and recent wear
pub struct GarmentRanker<'a> {
    history: &'a WearHistory,
}

impl<'a> GarmentRanker<'a> {
    pub fn new(history: &'a WearHistory) -> Self {
        Self { history }
    }

    /// Scores a single garment for `role`
    pub fn score(
        &self,
        garment: &Garment,
        required: &RequirementScores,
        role: Role,
        now: DateTime<Utc>,
    ) -> RankedGarment {
        let warmth_fit =
            FIT_CEILING - (garment.warmth_score as f64 - required.warmth as f64).abs();
        let impermeability_fit = if garment.impermeability_score >= required.impermeability {
            FIT_CEILING
        } else {
            FIT_CEILING - IMPERMEABILITY_SHORTFALL
        };
        let layering_fit = garment.layering_score as f64;
        let diversity_penalty = DiversityRule::for_role(role)
            .penalty_at(self.history.last_worn(&garment.image_link), now);

        let total_score = warmth_fit * WARMTH_WEIGHT
            + impermeability_fit * IMPERMEABILITY_WEIGHT
            + layering_fit * LAYERING_WEIGHT
            + diversity_penalty;

        RankedGarment {
            garment: garment.clone(),
            breakdown: ScoreBreakdown {
                warmth_fit,
                impermeability_fit,
                layering_fit,
                diversity_penalty,
            },
            total_score,
        }
    }

    /// Ranks pre-filtered candidates and keeps the best [`RANK_LIMIT`]
    ///
    /// Sorting is stable, so equal scores keep catalog order. An empty
    /// candidate list yields an empty ranking.
    pub fn rank(
        &self,
        candidates: &[&Garment],
        required: &RequirementScores,
        role: Role,
        now: DateTime<Utc>,
    ) -> Vec<RankedGarment> {
        let mut ranked: Vec<RankedGarment> = candidates
            .iter()
            .map(|garment| self.score(garment, required, role, now))
            .collect();

        ranked.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        ranked.truncate(RANK_LIMIT);

        tracing::debug!(
            role = %role,
            candidates = candidates.len(),
            best = ranked.first().map(|r| r.total_score),
            "Ranked garments"
        );

        ranked
    }
}
