//! Rebuilds the knowledge base from the platform docs and the live marketplace tables.
//!
//! Documents are embedded and upserted one at a time. A failed document is logged
//! and counted; the sync carries on with the rest.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::marketplace::profiles::{list_freelancers, list_profiles, ProfileListQuery};
use crate::models::profile::FreelancerSkillRow;
use crate::models::project::ProjectRow;
use crate::rag::documents::{
    freelancer_document, platform_documents, profile_document, FreelancerDossier,
    KnowledgeDocument,
};
use crate::rag::embedder::Embedder;
use crate::rag::retrieval::upsert_document;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub documents: usize,
    pub upserted: usize,
    pub failed: usize,
}

#[derive(Debug, FromRow)]
struct JobDoneRow {
    freelancer_id: Uuid,
    title: String,
    description: Option<String>,
}

fn group_by<T, F>(rows: Vec<T>, key: F) -> HashMap<Uuid, Vec<T>>
where
    F: Fn(&T) -> Uuid,
{
    let mut grouped: HashMap<Uuid, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}

/// Loads every profile and freelancer and renders them as documents.
pub async fn collect_documents(pool: &PgPool) -> Result<Vec<KnowledgeDocument>, AppError> {
    let profiles = list_profiles(pool, &ProfileListQuery::default()).await?;
    let freelancers = list_freelancers(pool).await?;

    let skills = sqlx::query_as::<_, FreelancerSkillRow>(
        r#"
        SELECT fs.freelancer_id, fs.skill_id, s.name, fs.proficiency_level, fs.years_experience
        FROM freelancer_skills fs
        JOIN skills s ON s.id = fs.skill_id
        ORDER BY s.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    let projects = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects ORDER BY created_at")
        .fetch_all(pool)
        .await?;

    let jobs_done = sqlx::query_as::<_, JobDoneRow>(
        r#"
        SELECT a.freelancer_id, j.title, j.description
        FROM applications a
        JOIN job_posts j ON j.id = a.job_id
        WHERE a.status = 'accepted'
        ORDER BY j.created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    let names: HashMap<Uuid, Option<String>> =
        profiles.iter().map(|p| (p.id, p.full_name.clone())).collect();
    let mut skills = group_by(skills, |s| s.freelancer_id);
    let mut projects = group_by(projects, |p| p.profile_id);
    let mut jobs_done = group_by(jobs_done, |j| j.freelancer_id);

    let mut documents = platform_documents();

    for profile in freelancers {
        let id = profile.id;
        let dossier = FreelancerDossier {
            full_name: names.get(&id).cloned().flatten(),
            profile,
            skills: skills.remove(&id).unwrap_or_default(),
            projects: projects.remove(&id).unwrap_or_default(),
            jobs_done: jobs_done
                .remove(&id)
                .unwrap_or_default()
                .into_iter()
                .map(|j| (j.title, j.description))
                .collect(),
        };
        documents.push(freelancer_document(&dossier));
    }

    documents.extend(profiles.iter().map(profile_document));
    Ok(documents)
}

/// Where embedded documents end up. Postgres in production.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    async fn upsert(&self, doc: &KnowledgeDocument, embedding: &[f32]) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl KnowledgeStore for PgPool {
    async fn upsert(&self, doc: &KnowledgeDocument, embedding: &[f32]) -> Result<(), sqlx::Error> {
        upsert_document(self, &doc.content, embedding, &doc.metadata).await
    }
}

/// Embeds and stores each document in turn. A failure is logged and counted.
pub async fn embed_and_store(
    documents: &[KnowledgeDocument],
    embedder: &dyn Embedder,
    store: &dyn KnowledgeStore,
) -> SyncReport {
    let mut report = SyncReport {
        documents: documents.len(),
        ..SyncReport::default()
    };

    for doc in documents {
        let preview: String = doc.content.chars().take(40).collect();
        let embedding = match embedder.embed(&doc.content).await {
            Ok(v) => v,
            Err(e) => {
                warn!("Embedding failed for '{}...': {}", preview, e);
                report.failed += 1;
                continue;
            }
        };
        match store.upsert(doc, &embedding).await {
            Ok(()) => report.upserted += 1,
            Err(e) => {
                warn!("Upsert failed for '{}...': {}", preview, e);
                report.failed += 1;
            }
        }
    }
    report
}

pub async fn sync_knowledge_base(
    pool: &PgPool,
    embedder: &dyn Embedder,
) -> Result<SyncReport, AppError> {
    let documents = collect_documents(pool).await?;
    info!("Syncing {} documents into the knowledge base", documents.len());

    let report = embed_and_store(&documents, embedder, pool).await;

    info!(
        "Knowledge base sync finished: {} upserted, {} failed",
        report.upserted, report.failed
    );
    Ok(report)
}
