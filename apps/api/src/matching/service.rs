//! Ranked freelancer matching for a job post.
//!
//! Flow: load job + skill names → load every freelancer with name/email + skill names →
//!       score each with the `MatchScorer` → sort descending → filter/limit →
//!       optionally persist to `matches`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::scoring::{
    matching_skills, Budget, CompatibilityBreakdown, FreelancerAttributes, JobRequirements,
    MatchScorer,
};
use crate::models::job::JobPostRow;
use crate::models::matching::MatchRow;
use crate::models::ExperienceLevel;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchQuery {
    pub limit: Option<usize>,
    pub min_score: Option<u32>,
    #[serde(default)]
    pub persist: bool,
}

/// Freelancer profile joined with the owning profile's name and email.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FreelancerCandidateRow {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub hourly_rate: Option<f64>,
    pub experience_level: Option<ExperienceLevel>,
    pub rating: Option<f64>,
    pub portfolio_url: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct SkillNameRow {
    owner_id: Uuid,
    name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FreelancerMatch {
    #[serde(flatten)]
    pub freelancer: FreelancerCandidateRow,
    pub compatibility_score: u32,
    pub breakdown: CompatibilityBreakdown,
    pub matching_skills: Vec<String>,
}

pub fn job_requirements(job: &JobPostRow, skill_names: Vec<String>) -> JobRequirements {
    JobRequirements {
        required_skills: skill_names,
        budget: Budget::from_bounds(job.budget_min, job.budget_max),
        required_experience: job.required_experience_level,
    }
}

pub fn freelancer_attributes(
    freelancer: &FreelancerCandidateRow,
    skill_names: Vec<String>,
) -> FreelancerAttributes {
    FreelancerAttributes {
        skills: skill_names,
        hourly_rate: freelancer.hourly_rate,
        experience_level: freelancer.experience_level,
        rating: freelancer.rating,
    }
}

/// Scores every candidate and returns them best-first, then applies `min_score` and `limit`.
pub fn rank_candidates(
    scorer: &dyn MatchScorer,
    job: &JobRequirements,
    candidates: Vec<(FreelancerCandidateRow, Vec<String>)>,
    query: &MatchQuery,
) -> Vec<FreelancerMatch> {
    let mut matches: Vec<FreelancerMatch> = candidates
        .into_iter()
        .map(|(freelancer, skills)| {
            let covered = matching_skills(&job.required_skills, &skills);
            let breakdown = scorer.score(job, &freelancer_attributes(&freelancer, skills));
            FreelancerMatch {
                freelancer,
                compatibility_score: breakdown.score,
                breakdown,
                matching_skills: covered,
            }
        })
        .collect();

    matches.sort_by(|a, b| b.compatibility_score.cmp(&a.compatibility_score));

    if let Some(min_score) = query.min_score {
        matches.retain(|m| m.compatibility_score >= min_score);
    }
    if let Some(limit) = query.limit {
        matches.truncate(limit);
    }
    matches
}

async fn load_job(pool: &PgPool, job_id: Uuid) -> Result<JobPostRow, AppError> {
    sqlx::query_as::<_, JobPostRow>("SELECT * FROM job_posts WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

async fn load_job_skill_names(pool: &PgPool, job_id: Uuid) -> Result<Vec<String>, AppError> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT s.name
        FROM job_skills js
        JOIN skills s ON s.id = js.skill_id
        WHERE js.job_id = $1
        ORDER BY s.name
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?;
    Ok(names)
}

const CANDIDATE_SELECT: &str = r#"
    SELECT fp.id, p.full_name, p.email, fp.bio, fp.hourly_rate,
           fp.experience_level, fp.rating, fp.portfolio_url
    FROM freelancer_profiles fp
    JOIN profiles p ON p.id = fp.id
"#;

async fn load_candidates(
    pool: &PgPool,
    only: Option<Uuid>,
) -> Result<Vec<(FreelancerCandidateRow, Vec<String>)>, AppError> {
    let freelancers = match only {
        Some(id) => {
            sqlx::query_as::<_, FreelancerCandidateRow>(&format!(
                "{CANDIDATE_SELECT} WHERE fp.id = $1"
            ))
            .bind(id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, FreelancerCandidateRow>(CANDIDATE_SELECT)
                .fetch_all(pool)
                .await?
        }
    };

    let skill_rows = sqlx::query_as::<_, SkillNameRow>(
        r#"
        SELECT fs.freelancer_id AS owner_id, s.name
        FROM freelancer_skills fs
        JOIN skills s ON s.id = fs.skill_id
        WHERE $1::uuid IS NULL OR fs.freelancer_id = $1
        "#,
    )
    .bind(only)
    .fetch_all(pool)
    .await?;

    let mut skills_by_freelancer: HashMap<Uuid, Vec<String>> = HashMap::new();
    for row in skill_rows {
        skills_by_freelancer
            .entry(row.owner_id)
            .or_default()
            .push(row.name);
    }

    Ok(freelancers
        .into_iter()
        .map(|f| {
            let skills = skills_by_freelancer.remove(&f.id).unwrap_or_default();
            (f, skills)
        })
        .collect())
}

/// Ranks every freelancer against a job. Persists the returned matches when asked.
pub async fn find_matches(
    pool: &PgPool,
    scorer: &dyn MatchScorer,
    job_id: Uuid,
    query: &MatchQuery,
) -> Result<Vec<FreelancerMatch>, AppError> {
    let job = load_job(pool, job_id).await?;
    let requirements = job_requirements(&job, load_job_skill_names(pool, job_id).await?);
    let candidates = load_candidates(pool, None).await?;
    let candidate_count = candidates.len();

    let matches = rank_candidates(scorer, &requirements, candidates, query);
    info!(
        "Scored {} freelancers for job {}, returning {}",
        candidate_count,
        job_id,
        matches.len()
    );

    if query.persist {
        for m in &matches {
            upsert_match(pool, job_id, m.freelancer.id, m.compatibility_score).await?;
        }
        info!("Persisted {} matches for job {}", matches.len(), job_id);
    }

    Ok(matches)
}

/// Scores a single job/freelancer pair.
pub async fn score_pair(
    pool: &PgPool,
    scorer: &dyn MatchScorer,
    job_id: Uuid,
    freelancer_id: Uuid,
) -> Result<FreelancerMatch, AppError> {
    let job = load_job(pool, job_id).await?;
    let requirements = job_requirements(&job, load_job_skill_names(pool, job_id).await?);
    let candidates = load_candidates(pool, Some(freelancer_id)).await?;

    rank_candidates(scorer, &requirements, candidates, &MatchQuery::default())
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("Freelancer {freelancer_id} not found")))
}

/// `matches.compatibility_score` holds the 0-100 score as a 0-1 fraction.
pub fn score_fraction(score: u32) -> f64 {
    f64::from(score.min(100)) / 100.0
}

async fn upsert_match(
    pool: &PgPool,
    job_id: Uuid,
    freelancer_id: Uuid,
    score: u32,
) -> Result<MatchRow, AppError> {
    let row = sqlx::query_as::<_, MatchRow>(
        r#"
        INSERT INTO matches (job_id, freelancer_id, compatibility_score)
        VALUES ($1, $2, $3)
        ON CONFLICT (job_id, freelancer_id)
        DO UPDATE SET compatibility_score = EXCLUDED.compatibility_score
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(freelancer_id)
    .bind(score_fraction(score))
    .fetch_one(pool)
    .await?;
    Ok(row)
}
