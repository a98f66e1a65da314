use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::marketplace::validation::{non_empty_if_present, require_non_empty};
use crate::models::message::MessageRow;

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub job_id: Option<Uuid>,
    pub content: String,
}

impl CreateMessageRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("content", &self.content)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMessageRequest {
    pub content: Option<String>,
    pub is_read: Option<bool>,
}

impl UpdateMessageRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        non_empty_if_present("content", self.content.as_deref())
    }
}

/// `user_id` matches either side of the conversation; `q` searches content.
#[derive(Debug, Default, Deserialize)]
pub struct MessageListQuery {
    pub user_id: Option<Uuid>,
    pub q: Option<String>,
}

/// Builds an ILIKE pattern from a free-text search, escaping wildcard characters.
pub fn search_pattern(q: Option<&str>) -> Option<String> {
    let q = q.map(str::trim).filter(|q| !q.is_empty())?;
    let escaped = q
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

pub async fn list_messages(
    pool: &PgPool,
    query: &MessageListQuery,
) -> Result<Vec<MessageRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT * FROM messages
        WHERE ($1::uuid IS NULL OR sender_id = $1 OR receiver_id = $1)
          AND ($2::text IS NULL OR content ILIKE $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(query.user_id)
    .bind(search_pattern(query.q.as_deref()))
    .fetch_all(pool)
    .await
}

pub async fn get_message(pool: &PgPool, id: Uuid) -> Result<Option<MessageRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>("SELECT * FROM messages WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_message(
    pool: &PgPool,
    req: &CreateMessageRequest,
) -> Result<MessageRow, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        r#"
        INSERT INTO messages (sender_id, receiver_id, job_id, content)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(req.sender_id)
    .bind(req.receiver_id)
    .bind(req.job_id)
    .bind(&req.content)
    .fetch_one(pool)
    .await
}

pub async fn update_message(
    pool: &PgPool,
    id: Uuid,
    req: &UpdateMessageRequest,
) -> Result<Option<MessageRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        r#"
        UPDATE messages
        SET content = COALESCE($2, content),
            is_read = COALESCE($3, is_read)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.content)
    .bind(req.is_read)
    .fetch_optional(pool)
    .await
}

pub async fn delete_message(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM messages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pattern_wraps_and_escapes() {
        assert_eq!(search_pattern(Some("invoice")), Some("%invoice%".to_string()));
        assert_eq!(search_pattern(Some("50%_off")), Some("%50\\%\\_off%".to_string()));
    }

    #[test]
    fn test_search_pattern_ignores_blank_queries() {
        assert_eq!(search_pattern(None), None);
        assert_eq!(search_pattern(Some("   ")), None);
    }

    #[test]
    fn test_create_message_rejects_empty_content() {
        let req = CreateMessageRequest {
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            job_id: None,
            content: "\n".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
