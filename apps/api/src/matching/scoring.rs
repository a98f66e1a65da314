//! Compatibility scoring: weighted fit between a job post and a freelancer profile.
//!
//! Four features, each in [0, 1]:
//! - skill overlap: fraction of required skills the freelancer lists
//! - budget fit: hourly rate against the job's budget
//! - experience fit: ordinal seniority met, or the ratio of levels
//! - rating: stars / 5
//!
//! `score = round(Σ weight × feature / Σ weight × 100)`, always in [0, 100].
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`; `WeightedMatchScorer` is the default.

use serde::{Deserialize, Serialize};

use crate::models::ExperienceLevel;

/// Rate below the job minimum still earns most of the budget credit.
const BELOW_BUDGET_SCORE: f64 = 0.8;
/// A ceiling-only budget implies a floor at this fraction of the ceiling.
const IMPLIED_MIN_FRACTION: f64 = 0.8;
const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub budget: f64,
    pub experience: f64,
    pub rating: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            budget: 0.3,
            experience: 0.2,
            rating: 0.1,
        }
    }
}

impl ScoringWeights {
    fn total(&self) -> f64 {
        self.skills + self.budget + self.experience + self.rating
    }
}

/// A job's budget as posted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Budget {
    Range { min: f64, max: f64 },
    /// Only a maximum was given.
    UpTo(f64),
    /// Only a minimum was given; no upper bound.
    AtLeast(f64),
}

impl Budget {
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        match (min, max) {
            (Some(min), Some(max)) => Some(Budget::Range { min, max }),
            (None, Some(max)) => Some(Budget::UpTo(max)),
            (Some(min), None) => Some(Budget::AtLeast(min)),
            (None, None) => None,
        }
    }
}

/// What a job asks for.
#[derive(Debug, Clone, Default)]
pub struct JobRequirements {
    pub required_skills: Vec<String>,
    pub budget: Option<Budget>,
    pub required_experience: Option<ExperienceLevel>,
}

/// What a freelancer offers.
#[derive(Debug, Clone, Default)]
pub struct FreelancerAttributes {
    pub skills: Vec<String>,
    pub hourly_rate: Option<f64>,
    pub experience_level: Option<ExperienceLevel>,
    pub rating: Option<f64>,
}

/// Per-feature scores plus the combined 0-100 result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityBreakdown {
    pub skill_match: f64,
    pub budget_match: f64,
    pub experience_match: f64,
    pub rating_score: f64,
    pub score: u32,
}

/// The match scorer trait. Carried in `AppState` as `Arc<dyn MatchScorer>`.
pub trait MatchScorer: Send + Sync {
    fn score(&self, job: &JobRequirements, freelancer: &FreelancerAttributes)
        -> CompatibilityBreakdown;
}

#[derive(Debug, Clone, Default)]
pub struct WeightedMatchScorer {
    pub weights: ScoringWeights,
}

impl MatchScorer for WeightedMatchScorer {
    fn score(
        &self,
        job: &JobRequirements,
        freelancer: &FreelancerAttributes,
    ) -> CompatibilityBreakdown {
        compatibility_score(job, freelancer, &self.weights)
    }
}

pub fn compatibility_score(
    job: &JobRequirements,
    freelancer: &FreelancerAttributes,
    weights: &ScoringWeights,
) -> CompatibilityBreakdown {
    let skill_match = skill_match(&job.required_skills, &freelancer.skills);
    let budget_match = budget_match(job.budget.as_ref(), freelancer.hourly_rate);
    let experience_match = experience_match(job.required_experience, freelancer.experience_level);
    let rating_score = rating_score(freelancer.rating);

    let weighted = weights.skills * skill_match
        + weights.budget * budget_match
        + weights.experience * experience_match
        + weights.rating * rating_score;

    let total = weights.total();
    let score = if total > 0.0 {
        ((weighted / total) * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    };

    CompatibilityBreakdown {
        skill_match,
        budget_match,
        experience_match,
        rating_score,
        score,
    }
}

fn normalize_skill(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Fraction of required skills the freelancer lists (case-insensitive).
pub fn skill_match(required: &[String], offered: &[String]) -> f64 {
    if required.is_empty() || offered.is_empty() {
        return 0.0;
    }
    let matched = matching_skills(required, offered).len();
    matched as f64 / required.len() as f64
}

/// Required skills the freelancer covers, in the job's order and spelling.
pub fn matching_skills(required: &[String], offered: &[String]) -> Vec<String> {
    let offered: Vec<String> = offered.iter().map(|s| normalize_skill(s)).collect();
    required
        .iter()
        .filter(|skill| offered.contains(&normalize_skill(skill)))
        .cloned()
        .collect()
}

pub fn budget_match(budget: Option<&Budget>, hourly_rate: Option<f64>) -> f64 {
    let (Some(budget), Some(rate)) = (budget, hourly_rate) else {
        return 0.0;
    };
    if rate <= 0.0 {
        return 0.0;
    }

    let (min, max) = match *budget {
        Budget::Range { min, max } => (min, max),
        Budget::UpTo(max) => (max * IMPLIED_MIN_FRACTION, max),
        Budget::AtLeast(min) => {
            return if rate >= min { 1.0 } else { BELOW_BUDGET_SCORE };
        }
    };

    if max <= 0.0 {
        return 0.0;
    }

    if rate >= min && rate <= max {
        1.0
    } else if rate < min {
        BELOW_BUDGET_SCORE
    } else {
        (1.0 - (rate - max) / max).max(0.0)
    }
}

/// 1.0 when the freelancer meets the requirement, else the ratio of levels.
/// A missing level on either side counts as mid.
pub fn experience_match(required: Option<ExperienceLevel>, offered: Option<ExperienceLevel>) -> f64 {
    let required = required.unwrap_or(ExperienceLevel::Mid).ordinal();
    let offered = offered.unwrap_or(ExperienceLevel::Mid).ordinal();
    if offered >= required {
        1.0
    } else {
        offered as f64 / required as f64
    }
}

pub fn rating_score(rating: Option<f64>) -> f64 {
    (rating.unwrap_or(0.0) / MAX_RATING).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn job() -> JobRequirements {
        JobRequirements {
            required_skills: skills(&["Rust", "PostgreSQL", "Docker"]),
            budget: Some(Budget::Range {
                min: 40.0,
                max: 80.0,
            }),
            required_experience: Some(ExperienceLevel::Senior),
        }
    }

    fn ideal_freelancer() -> FreelancerAttributes {
        FreelancerAttributes {
            skills: skills(&["rust", "postgresql", "docker", "kubernetes"]),
            hourly_rate: Some(60.0),
            experience_level: Some(ExperienceLevel::Expert),
            rating: Some(5.0),
        }
    }

    fn score(job: &JobRequirements, freelancer: &FreelancerAttributes) -> u32 {
        compatibility_score(job, freelancer, &ScoringWeights::default()).score
    }

    #[test]
    fn test_ideal_freelancer_scores_100() {
        let breakdown = compatibility_score(&job(), &ideal_freelancer(), &ScoringWeights::default());
        assert_eq!(breakdown.score, 100);
        assert_eq!(breakdown.skill_match, 1.0);
        assert_eq!(breakdown.budget_match, 1.0);
        assert_eq!(breakdown.experience_match, 1.0);
        assert_eq!(breakdown.rating_score, 1.0);
    }

    #[test]
    fn test_no_shared_skills_scores_strictly_lower() {
        let all = ideal_freelancer();
        let none = FreelancerAttributes {
            skills: skills(&["Photoshop", "Illustrator"]),
            ..ideal_freelancer()
        };
        assert!(score(&job(), &none) < score(&job(), &all));
        // Only the 40% skill share is lost.
        assert_eq!(score(&job(), &none), 60);
    }

    #[test]
    fn test_score_always_within_0_and_100() {
        let rates = [None, Some(-10.0), Some(0.0), Some(10.0), Some(60.0), Some(500.0)];
        let ratings = [None, Some(-1.0), Some(0.0), Some(3.5), Some(5.0), Some(9.0)];
        let levels = [
            None,
            Some(ExperienceLevel::Junior),
            Some(ExperienceLevel::Mid),
            Some(ExperienceLevel::Expert),
        ];
        let budgets = [
            None,
            Some(Budget::Range { min: 0.0, max: 0.0 }),
            Some(Budget::Range {
                min: 40.0,
                max: 80.0,
            }),
            Some(Budget::UpTo(50.0)),
            Some(Budget::AtLeast(30.0)),
        ];

        for budget in budgets {
            for rate in rates {
                for rating in ratings {
                    for level in levels {
                        let job = JobRequirements {
                            budget,
                            ..job()
                        };
                        let freelancer = FreelancerAttributes {
                            hourly_rate: rate,
                            rating,
                            experience_level: level,
                            ..ideal_freelancer()
                        };
                        let s = score(&job, &freelancer);
                        assert!(s <= 100, "score {s} out of range");
                    }
                }
            }
        }
    }

    #[test]
    fn test_skill_match_is_case_insensitive_fraction() {
        let required = skills(&["React", "TypeScript", "GraphQL", "CSS"]);
        let offered = skills(&[" react ", "typescript"]);
        assert!((skill_match(&required, &offered) - 0.5).abs() < f64::EPSILON);
        assert_eq!(
            matching_skills(&required, &offered),
            skills(&["React", "TypeScript"])
        );
    }

    #[test]
    fn test_skill_match_empty_inputs_score_zero() {
        assert_eq!(skill_match(&[], &skills(&["Rust"])), 0.0);
        assert_eq!(skill_match(&skills(&["Rust"]), &[]), 0.0);
    }

    #[test]
    fn test_budget_within_range_is_full_credit() {
        let budget = Budget::Range {
            min: 40.0,
            max: 80.0,
        };
        assert_eq!(budget_match(Some(&budget), Some(40.0)), 1.0);
        assert_eq!(budget_match(Some(&budget), Some(80.0)), 1.0);
    }

    #[test]
    fn test_budget_below_min_is_point_eight() {
        let budget = Budget::Range {
            min: 40.0,
            max: 80.0,
        };
        assert_eq!(budget_match(Some(&budget), Some(25.0)), 0.8);
    }

    #[test]
    fn test_budget_above_max_decays_linearly_to_zero() {
        let budget = Budget::Range {
            min: 40.0,
            max: 80.0,
        };
        // 100 is 25% over the ceiling
        assert!((budget_match(Some(&budget), Some(100.0)) - 0.75).abs() < 1e-9);
        assert_eq!(budget_match(Some(&budget), Some(160.0)), 0.0);
        assert_eq!(budget_match(Some(&budget), Some(400.0)), 0.0);
    }

    #[test]
    fn test_ceiling_only_budget_implies_floor() {
        let budget = Budget::UpTo(100.0);
        assert_eq!(budget_match(Some(&budget), Some(85.0)), 1.0);
        assert_eq!(budget_match(Some(&budget), Some(70.0)), 0.8);
    }

    #[test]
    fn test_floor_only_budget_has_no_ceiling() {
        let budget = Budget::AtLeast(30.0);
        assert_eq!(budget_match(Some(&budget), Some(300.0)), 1.0);
        assert_eq!(budget_match(Some(&budget), Some(20.0)), 0.8);
    }

    #[test]
    fn test_budget_missing_or_unusable_scores_zero() {
        let budget = Budget::Range {
            min: 40.0,
            max: 80.0,
        };
        assert_eq!(budget_match(None, Some(50.0)), 0.0);
        assert_eq!(budget_match(Some(&budget), None), 0.0);
        assert_eq!(budget_match(Some(&budget), Some(0.0)), 0.0);
        let zero = Budget::Range { min: 0.0, max: 0.0 };
        assert_eq!(budget_match(Some(&zero), Some(50.0)), 0.0);
    }

    #[test]
    fn test_budget_from_bounds() {
        assert_eq!(Budget::from_bounds(None, None), None);
        assert_eq!(Budget::from_bounds(None, Some(90.0)), Some(Budget::UpTo(90.0)));
        assert_eq!(
            Budget::from_bounds(Some(10.0), None),
            Some(Budget::AtLeast(10.0))
        );
    }

    #[test]
    fn test_experience_partial_match_is_ratio() {
        let ratio = experience_match(Some(ExperienceLevel::Expert), Some(ExperienceLevel::Mid));
        assert!((ratio - 0.5).abs() < f64::EPSILON);
        assert_eq!(
            experience_match(Some(ExperienceLevel::Junior), Some(ExperienceLevel::Senior)),
            1.0
        );
    }

    #[test]
    fn test_experience_defaults_to_mid() {
        assert_eq!(experience_match(None, None), 1.0);
        assert_eq!(experience_match(Some(ExperienceLevel::Mid), None), 1.0);
        let junior_for_default = experience_match(None, Some(ExperienceLevel::Junior));
        assert!((junior_for_default - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rating_is_normalized_and_clamped() {
        assert_eq!(rating_score(None), 0.0);
        assert!((rating_score(Some(4.0)) - 0.8).abs() < f64::EPSILON);
        assert_eq!(rating_score(Some(7.0)), 1.0);
        assert_eq!(rating_score(Some(-2.0)), 0.0);
    }

    #[test]
    fn test_zero_weights_score_zero() {
        let weights = ScoringWeights {
            skills: 0.0,
            budget: 0.0,
            experience: 0.0,
            rating: 0.0,
        };
        let breakdown = compatibility_score(&job(), &ideal_freelancer(), &weights);
        assert_eq!(breakdown.score, 0);
    }

    #[test]
    fn test_weighted_scorer_uses_default_weights() {
        let scorer = WeightedMatchScorer::default();
        let freelancer = FreelancerAttributes {
            rating: Some(0.0),
            ..ideal_freelancer()
        };
        // Everything but the 10% rating share
        assert_eq!(scorer.score(&job(), &freelancer).score, 90);
    }
}
