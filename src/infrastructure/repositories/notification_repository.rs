//! Notification Repository Implementation
//!
//! PostgreSQL implementation of the NotificationRepository trait.
//! Notifications are insert-only; there is no update or delete path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Notification, NotificationKind, NotificationRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    member_id: i64,
    post_id: Option<i64>,
    kind: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_notification(self) -> Result<Notification, AppError> {
        let kind = NotificationKind::parse(&self.kind).ok_or_else(|| {
            AppError::Internal(format!(
                "Unknown notification kind '{}' on notification {}",
                self.kind, self.id
            ))
        })?;

        Ok(Notification {
            id: self.id,
            member_id: self.member_id,
            post_id: self.post_id,
            kind,
            content: self.content,
            created_at: self.created_at,
        })
    }
}

/// PostgreSQL notification repository implementation.
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (id, member_id, post_id, kind, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, member_id, post_id, kind, content, created_at
            "#,
        )
        .bind(notification.id)
        .bind(notification.member_id)
        .bind(notification.post_id)
        .bind(notification.kind.as_str())
        .bind(&notification.content)
        .bind(notification.created_at)
        .fetch_one(&self.pool)
        .await?;

        row.into_notification()
    }

    async fn find_recent_by_member(
        &self,
        member_id: i64,
        limit: i64,
    ) -> Result<Vec<Notification>, AppError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, member_id, post_id, kind, content, created_at
            FROM notifications
            WHERE member_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(member_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_notification()).collect()
    }
}
