//! Notification Template Repository

use super::{BaseRepository, RepoError, RepoResult, record_id, record_ref};
use crate::db::models::{NotificationTemplate, NotificationTemplateUpdate};
use shared::{NotificationChannel, NotificationEvent};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "notification_template";

#[derive(Clone)]
pub struct NotificationTemplateRepository {
    base: BaseRepository,
}

impl NotificationTemplateRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Templates owned by a tenant, or the platform defaults when
    /// `tenant_id` is none (admin console view)
    pub async fn find_by_owner(&self, tenant_id: Option<&str>) -> RepoResult<Vec<NotificationTemplate>> {
        let templates: Vec<NotificationTemplate> = match tenant_id {
            Some(tid) => {
                self.base
                    .db()
                    .query("SELECT * FROM notification_template WHERE tenant = $tenant ORDER BY event, channel")
                    .bind(("tenant", record_ref("tenant", tid)))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT * FROM notification_template WHERE tenant = NONE ORDER BY event, channel")
                    .await?
                    .take(0)?
            }
        };
        Ok(templates)
    }

    /// Find template by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<NotificationTemplate>> {
        let template: Option<NotificationTemplate> =
            self.base.db().select(record_id(TABLE, id)).await?;
        Ok(template)
    }

    /// Resolve the template for (tenant, event, channel): the tenant's
    /// active override wins, otherwise the active platform default.
    pub async fn resolve(
        &self,
        tenant_id: Option<&str>,
        event: NotificationEvent,
        channel: NotificationChannel,
    ) -> RepoResult<Option<NotificationTemplate>> {
        if let Some(tid) = tenant_id {
            let mut result = self
                .base
                .db()
                .query(
                    "SELECT * FROM notification_template \
                     WHERE tenant = $tenant AND event = $event AND channel = $channel \
                       AND is_active = true LIMIT 1",
                )
                .bind(("tenant", record_ref("tenant", tid)))
                .bind(("event", event))
                .bind(("channel", channel))
                .await?;
            let overrides: Vec<NotificationTemplate> = result.take(0)?;
            if let Some(t) = overrides.into_iter().next() {
                return Ok(Some(t));
            }
        }

        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM notification_template \
                 WHERE tenant = NONE AND event = $event AND channel = $channel \
                   AND is_active = true LIMIT 1",
            )
            .bind(("event", event))
            .bind(("channel", channel))
            .await?;
        let defaults: Vec<NotificationTemplate> = result.take(0)?;
        Ok(defaults.into_iter().next())
    }

    /// Create a template; one record per (owner, event, channel)
    pub async fn create(&self, template: NotificationTemplate) -> RepoResult<NotificationTemplate> {
        let owner = template.tenant.as_ref().map(|t| t.to_string());
        let existing = self.find_by_owner(owner.as_deref()).await?;
        if existing
            .iter()
            .any(|t| t.event == template.event && t.channel == template.channel)
        {
            return Err(RepoError::Duplicate(format!(
                "Template for {}/{} already exists",
                template.event.as_str(),
                template.channel.as_str()
            )));
        }

        let created: Option<NotificationTemplate> =
            self.base.db().create(TABLE).content(template).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create template".to_string()))
    }

    /// Update a template
    pub async fn update(
        &self,
        id: &str,
        data: NotificationTemplateUpdate,
    ) -> RepoResult<NotificationTemplate> {
        let rid = record_id(TABLE, id);
        let updated: Option<NotificationTemplate> = self.base.db().update(rid).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Template {} not found", id)))
    }

    /// Hard delete a template
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let _: Option<NotificationTemplate> = self.base.db().delete(record_id(TABLE, id)).await?;
        Ok(true)
    }
}
