//! Axum route handlers for marketplace entities.
//!
//! Every handler validates the body first, then delegates to the entity module.
//! Missing rows become 404s; deletes answer 204.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::marketplace::applications::{
    self, ApplicationListQuery, CreateApplicationRequest, UpdateApplicationRequest,
};
use crate::marketplace::jobs::{
    self, AttachJobSkillRequest, CreateJobRequest, JobListQuery, UpdateJobRequest,
};
use crate::marketplace::messages::{
    self, CreateMessageRequest, MessageListQuery, UpdateMessageRequest,
};
use crate::marketplace::profiles::{
    self, AttachFreelancerSkillRequest, CreateFreelancerRequest, CreateProfileRequest,
    ProfileListQuery, UpdateFreelancerRequest, UpdateProfileRequest,
};
use crate::marketplace::projects::{self, CreateProjectRequest, ProjectListQuery};
use crate::marketplace::skills::{self, CreateSkillRequest, UpdateSkillRequest};
use crate::models::application::ApplicationRow;
use crate::models::job::{JobPostRow, JobSkillRow};
use crate::models::message::MessageRow;
use crate::models::profile::{FreelancerProfileRow, FreelancerSkillRow, ProfileRow};
use crate::models::project::ProjectRow;
use crate::models::skill::SkillRow;
use crate::state::AppState;

fn found<T>(row: Option<T>, entity: &str, id: Uuid) -> Result<T, AppError> {
    row.ok_or_else(|| AppError::NotFound(format!("{entity} {id} not found")))
}

fn deleted(removed: bool, entity: &str, id: Uuid) -> Result<StatusCode, AppError> {
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("{entity} {id} not found")))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/profiles
pub async fn handle_list_profiles(
    State(state): State<AppState>,
    Query(query): Query<ProfileListQuery>,
) -> Result<Json<Vec<ProfileRow>>, AppError> {
    Ok(Json(profiles::list_profiles(&state.db, &query).await?))
}

/// POST /api/profiles
pub async fn handle_create_profile(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileRow>), AppError> {
    let row = profiles::create_profile(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/profiles/:id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileRow>, AppError> {
    let row = profiles::get_profile(&state.db, id).await?;
    Ok(Json(found(row, "Profile", id)?))
}

/// PATCH /api/profiles/:id
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> Result<Json<ProfileRow>, AppError> {
    let row = profiles::update_profile(&state.db, id, &req).await?;
    Ok(Json(found(row, "Profile", id)?))
}

/// DELETE /api/profiles/:id
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    deleted(profiles::delete_profile(&state.db, id).await?, "Profile", id)
}

// ────────────────────────────────────────────────────────────────────────────
// Freelancer profiles
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/freelancers
pub async fn handle_list_freelancers(
    State(state): State<AppState>,
) -> Result<Json<Vec<FreelancerProfileRow>>, AppError> {
    Ok(Json(profiles::list_freelancers(&state.db).await?))
}

/// POST /api/freelancers
pub async fn handle_create_freelancer(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateFreelancerRequest>,
) -> Result<(StatusCode, Json<FreelancerProfileRow>), AppError> {
    req.validate()?;
    let row = profiles::create_freelancer(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/freelancers/:id
pub async fn handle_get_freelancer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FreelancerProfileRow>, AppError> {
    let row = profiles::get_freelancer(&state.db, id).await?;
    Ok(Json(found(row, "Freelancer", id)?))
}

/// PATCH /api/freelancers/:id
pub async fn handle_update_freelancer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateFreelancerRequest>,
) -> Result<Json<FreelancerProfileRow>, AppError> {
    req.validate()?;
    let row = profiles::update_freelancer(&state.db, id, &req).await?;
    Ok(Json(found(row, "Freelancer", id)?))
}

/// DELETE /api/freelancers/:id
pub async fn handle_delete_freelancer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    deleted(profiles::delete_freelancer(&state.db, id).await?, "Freelancer", id)
}

/// GET /api/freelancers/:id/skills
pub async fn handle_list_freelancer_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FreelancerSkillRow>>, AppError> {
    Ok(Json(profiles::list_freelancer_skills(&state.db, id).await?))
}

/// POST /api/freelancers/:id/skills
pub async fn handle_attach_freelancer_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<AttachFreelancerSkillRequest>,
) -> Result<Json<FreelancerSkillRow>, AppError> {
    req.validate()?;
    Ok(Json(profiles::attach_freelancer_skill(&state.db, id, &req).await?))
}

/// DELETE /api/freelancers/:id/skills/:skill_id
pub async fn handle_detach_freelancer_skill(
    State(state): State<AppState>,
    Path((id, skill_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let removed = profiles::detach_freelancer_skill(&state.db, id, skill_id).await?;
    deleted(removed, "Freelancer skill", skill_id)
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
) -> Result<Json<Vec<SkillRow>>, AppError> {
    Ok(Json(skills::list_skills(&state.db).await?))
}

/// POST /api/skills
pub async fn handle_create_skill(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateSkillRequest>,
) -> Result<(StatusCode, Json<SkillRow>), AppError> {
    req.validate()?;
    let row = skills::create_skill(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/skills/:id
pub async fn handle_get_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SkillRow>, AppError> {
    let row = skills::get_skill(&state.db, id).await?;
    Ok(Json(found(row, "Skill", id)?))
}

/// PATCH /api/skills/:id
pub async fn handle_update_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateSkillRequest>,
) -> Result<Json<SkillRow>, AppError> {
    req.validate()?;
    let row = skills::update_skill(&state.db, id, &req).await?;
    Ok(Json(found(row, "Skill", id)?))
}

/// DELETE /api/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    deleted(skills::delete_skill(&state.db, id).await?, "Skill", id)
}

// ────────────────────────────────────────────────────────────────────────────
// Job posts
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<Vec<JobPostRow>>, AppError> {
    Ok(Json(jobs::list_jobs(&state.db, &query).await?))
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobPostRow>), AppError> {
    req.validate()?;
    let row = jobs::create_job(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobPostRow>, AppError> {
    let row = jobs::get_job(&state.db, id).await?;
    Ok(Json(found(row, "Job", id)?))
}

/// PATCH /api/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateJobRequest>,
) -> Result<Json<JobPostRow>, AppError> {
    let current = found(jobs::get_job(&state.db, id).await?, "Job", id)?;
    req.validate_against(&current)?;
    let row = jobs::update_job(&state.db, id, &req).await?;
    Ok(Json(found(row, "Job", id)?))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    deleted(jobs::delete_job(&state.db, id).await?, "Job", id)
}

/// GET /api/jobs/:id/skills
pub async fn handle_list_job_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<JobSkillRow>>, AppError> {
    Ok(Json(jobs::list_job_skills(&state.db, id).await?))
}

/// POST /api/jobs/:id/skills
pub async fn handle_attach_job_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<AttachJobSkillRequest>,
) -> Result<Json<JobSkillRow>, AppError> {
    req.validate()?;
    Ok(Json(jobs::attach_job_skill(&state.db, id, &req).await?))
}

/// DELETE /api/jobs/:id/skills/:skill_id
pub async fn handle_detach_job_skill(
    State(state): State<AppState>,
    Path((id, skill_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let removed = jobs::detach_job_skill(&state.db, id, skill_id).await?;
    deleted(removed, "Job skill", skill_id)
}

/// GET /api/jobs/:id/applications
pub async fn handle_list_job_applications(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let query = ApplicationListQuery {
        job_id: Some(id),
        freelancer_id: None,
    };
    Ok(Json(applications::list_applications(&state.db, &query).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Applications
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    Ok(Json(applications::list_applications(&state.db, &query).await?))
}

/// POST /api/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    req.validate()?;
    let row = applications::create_application(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationRow>, AppError> {
    let row = applications::get_application(&state.db, id).await?;
    Ok(Json(found(row, "Application", id)?))
}

/// PATCH /api/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateApplicationRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    req.validate()?;
    let row = applications::update_application(&state.db, id, &req).await?;
    Ok(Json(found(row, "Application", id)?))
}

/// DELETE /api/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    deleted(applications::delete_application(&state.db, id).await?, "Application", id)
}

// ────────────────────────────────────────────────────────────────────────────
// Messages
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/messages
///
/// `?user_id=` limits to one participant's conversations, `?q=` searches content.
pub async fn handle_list_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<Vec<MessageRow>>, AppError> {
    Ok(Json(messages::list_messages(&state.db, &query).await?))
}

/// POST /api/messages
pub async fn handle_create_message(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageRow>), AppError> {
    req.validate()?;
    let row = messages::create_message(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/messages/:id
pub async fn handle_get_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageRow>, AppError> {
    let row = messages::get_message(&state.db, id).await?;
    Ok(Json(found(row, "Message", id)?))
}

/// PATCH /api/messages/:id
pub async fn handle_update_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateMessageRequest>,
) -> Result<Json<MessageRow>, AppError> {
    req.validate()?;
    let row = messages::update_message(&state.db, id, &req).await?;
    Ok(Json(found(row, "Message", id)?))
}

/// DELETE /api/messages/:id
pub async fn handle_delete_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    deleted(messages::delete_message(&state.db, id).await?, "Message", id)
}

// ────────────────────────────────────────────────────────────────────────────
// Portfolio projects
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<Vec<ProjectRow>>, AppError> {
    Ok(Json(projects::list_projects(&state.db, &query).await?))
}

/// POST /api/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectRow>), AppError> {
    req.validate()?;
    let row = projects::create_project(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectRow>, AppError> {
    let row = projects::get_project(&state.db, id).await?;
    Ok(Json(found(row, "Project", id)?))
}

/// DELETE /api/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    deleted(projects::delete_project(&state.db, id).await?, "Project", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_maps_missing_row_to_404() {
        let id = Uuid::new_v4();
        match found::<u8>(None, "Job", id) {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, format!("Job {id} not found")),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert_eq!(found(Some(7u8), "Job", id).unwrap(), 7);
    }

    #[test]
    fn test_deleted_answers_no_content() {
        let id = Uuid::new_v4();
        assert_eq!(deleted(true, "Skill", id).unwrap(), StatusCode::NO_CONTENT);
        assert!(matches!(deleted(false, "Skill", id), Err(AppError::NotFound(_))));
    }
}
