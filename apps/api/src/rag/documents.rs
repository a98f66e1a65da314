//! Knowledge-base documents: fixed platform help plus one document per profile.

use serde_json::{json, Value};

use crate::models::profile::{FreelancerProfileRow, FreelancerSkillRow, ProfileRow};
use crate::models::project::ProjectRow;

const MISSING: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeDocument {
    pub content: String,
    pub metadata: Value,
}

/// Platform documentation seeded into every sync.
pub fn platform_documents() -> Vec<KnowledgeDocument> {
    let docs: [(&str, Value); 4] = [
        (
            "The marketplace is a full-stack freelancer platform. Clients post projects, \
             discover freelancers and manage collaborations; freelancers build a profile, \
             list their skills and apply to jobs.",
            json!({"category": "project", "tags": ["overview"]}),
        ),
        (
            "Key features: client and freelancer dashboards, job posting, freelancer \
             discovery with compatibility matching, one-click applications, messaging, \
             portfolio projects and profiles.",
            json!({"category": "project", "tags": ["features"]}),
        ),
        (
            "How to post a job:\n\
             1. Enter the job title.\n\
             2. Provide a detailed job description.\n\
             3. List the required skills (up to 6).\n\
             4. Specify the minimum and maximum budget.\n\
             5. Set the deadline for the job.\n\
             6. Choose the required experience level (junior, mid, senior, expert).\n\
             The assistant then writes a professional job summary to review before posting.",
            json!({"category": "workflow", "tags": ["job posting", "instructions"]}),
        ),
        (
            "Freelancers are ranked for a job by compatibility: 40% skill overlap, 30% \
             hourly rate against the job budget, 20% experience level and 10% rating.",
            json!({"category": "workflow", "tags": ["matching"]}),
        ),
    ];

    docs.into_iter()
        .map(|(content, metadata)| KnowledgeDocument {
            content: content.to_string(),
            metadata,
        })
        .collect()
}

/// Everything the knowledge base says about one freelancer.
#[derive(Debug, Clone)]
pub struct FreelancerDossier {
    pub full_name: Option<String>,
    pub profile: FreelancerProfileRow,
    pub skills: Vec<FreelancerSkillRow>,
    pub projects: Vec<ProjectRow>,
    /// (title, description) of jobs with an accepted application.
    pub jobs_done: Vec<(String, Option<String>)>,
}

fn or_missing<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| MISSING.to_string())
}

fn joined_or_missing(items: Vec<String>, sep: &str) -> String {
    if items.is_empty() {
        MISSING.to_string()
    } else {
        items.join(sep)
    }
}

pub fn freelancer_document(dossier: &FreelancerDossier) -> KnowledgeDocument {
    let f = &dossier.profile;

    let skills = dossier
        .skills
        .iter()
        .map(|s| {
            format!(
                "{} (Proficiency: {}, Years: {})",
                s.name,
                or_missing(s.proficiency_level),
                or_missing(s.years_experience)
            )
        })
        .collect();

    let projects = dossier
        .projects
        .iter()
        .map(|p| format!("{}: {}", p.title, p.description.as_deref().unwrap_or("")))
        .collect();

    let jobs = dossier
        .jobs_done
        .iter()
        .map(|(title, description)| format!("{}: {}", title, description.as_deref().unwrap_or("")))
        .collect();

    let content = [
        format!("Freelancer Name: {}", or_missing(dossier.full_name.as_deref())),
        format!("ID: {}", f.id),
        format!("Skills: {}", joined_or_missing(skills, ", ")),
        format!("Projects: {}", joined_or_missing(projects, "; ")),
        format!("Jobs Done: {}", joined_or_missing(jobs, "; ")),
        format!("Hourly Rate: {}", or_missing(f.hourly_rate)),
        format!(
            "Experience Level: {}",
            or_missing(f.experience_level.map(|l| l.as_str()))
        ),
        format!("Bio: {}", or_missing(f.bio.as_deref())),
        format!("Portfolio URL: {}", or_missing(f.portfolio_url.as_deref())),
    ]
    .join("\n");

    KnowledgeDocument {
        content,
        metadata: json!({"category": "freelancer", "id": f.id}),
    }
}

pub fn profile_document(p: &ProfileRow) -> KnowledgeDocument {
    let user_type = p.user_type.map(|t| t.as_str());
    let content = [
        format!("Profile ID: {}", p.id),
        format!("User Type: {}", or_missing(user_type)),
        format!("Full Name: {}", or_missing(p.full_name.as_deref())),
        format!("Email: {}", or_missing(p.email.as_deref())),
        format!("Created At: {}", p.created_at.to_rfc3339()),
        format!("Updated At: {}", p.updated_at.to_rfc3339()),
    ]
    .join("\n");

    KnowledgeDocument {
        content,
        metadata: json!({"category": "profile", "id": p.id, "user_type": user_type}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceLevel, UserType};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn bare_freelancer() -> FreelancerProfileRow {
        FreelancerProfileRow {
            id: Uuid::nil(),
            bio: None,
            hourly_rate: None,
            experience_level: None,
            rating: None,
            portfolio_url: None,
            availability_hours_per_week: None,
            completed_projects: None,
        }
    }

    #[test]
    fn test_freelancer_document_defaults_to_na() {
        let doc = freelancer_document(&FreelancerDossier {
            full_name: None,
            profile: bare_freelancer(),
            skills: vec![],
            projects: vec![],
            jobs_done: vec![],
        });
        assert!(doc.content.starts_with("Freelancer Name: N/A\nID: 00000000-0000-0000-0000-000000000000"));
        assert!(doc.content.contains("Skills: N/A"));
        assert!(doc.content.contains("Jobs Done: N/A"));
        assert!(doc.content.ends_with("Portfolio URL: N/A"));
        assert_eq!(doc.metadata["category"], "freelancer");
    }

    #[test]
    fn test_freelancer_document_lists_skills_projects_and_jobs() {
        let id = Uuid::new_v4();
        let profile = FreelancerProfileRow {
            id,
            hourly_rate: Some(45.0),
            experience_level: Some(ExperienceLevel::Senior),
            bio: Some("Android developer".to_string()),
            ..bare_freelancer()
        };
        let skills = vec![
            FreelancerSkillRow {
                freelancer_id: id,
                skill_id: Uuid::new_v4(),
                name: "Kotlin".to_string(),
                proficiency_level: Some(5),
                years_experience: Some(4),
            },
            FreelancerSkillRow {
                freelancer_id: id,
                skill_id: Uuid::new_v4(),
                name: "Firebase".to_string(),
                proficiency_level: None,
                years_experience: Some(2),
            },
        ];
        let projects = vec![ProjectRow {
            id: Uuid::new_v4(),
            profile_id: id,
            title: "Budget app".to_string(),
            description: Some("Expense tracker".to_string()),
            image_url: None,
            created_at: Utc::now(),
        }];
        let doc = freelancer_document(&FreelancerDossier {
            full_name: Some("Amina Okafor".to_string()),
            profile,
            skills,
            projects,
            jobs_done: vec![("Delivery app".to_string(), None)],
        });

        assert!(doc.content.contains("Freelancer Name: Amina Okafor"));
        assert!(doc.content.contains(
            "Skills: Kotlin (Proficiency: 5, Years: 4), Firebase (Proficiency: N/A, Years: 2)"
        ));
        assert!(doc.content.contains("Projects: Budget app: Expense tracker"));
        assert!(doc.content.contains("Jobs Done: Delivery app: "));
        assert!(doc.content.contains("Hourly Rate: 45"));
        assert!(doc.content.contains("Experience Level: senior"));
    }

    #[test]
    fn test_profile_document() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let p = ProfileRow {
            id: Uuid::nil(),
            email: Some("client@example.com".to_string()),
            full_name: None,
            avatar_url: None,
            user_type: Some(UserType::Client),
            created_at: ts,
            updated_at: ts,
        };
        let doc = profile_document(&p);
        assert!(doc.content.contains("User Type: client"));
        assert!(doc.content.contains("Full Name: N/A"));
        assert!(doc.content.contains("Created At: 2024-06-01T12:00:00+00:00"));
        assert_eq!(doc.metadata["user_type"], "client");
    }

    #[test]
    fn test_platform_documents_are_unique() {
        let docs = platform_documents();
        let mut contents: Vec<_> = docs.iter().map(|d| d.content.as_str()).collect();
        contents.sort();
        contents.dedup();
        assert_eq!(contents.len(), docs.len());
    }
}
