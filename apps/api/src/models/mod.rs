//! Row types for the marketplace tables and the Postgres enums they use.

pub mod application;
pub mod job;
pub mod knowledge;
pub mod matching;
pub mod message;
pub mod profile;
pub mod project;
pub mod skill;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_type_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Client,
    Freelancer,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Client => "client",
            UserType::Freelancer => "freelancer",
        }
    }
}

/// Seniority ladder shared by job requirements and freelancer profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "experience_level_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
    Expert,
}

impl ExperienceLevel {
    /// junior=1 … expert=4
    pub fn ordinal(self) -> u8 {
        match self {
            ExperienceLevel::Junior => 1,
            ExperienceLevel::Mid => 2,
            ExperienceLevel::Senior => 3,
            ExperienceLevel::Expert => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status_enum", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
}
