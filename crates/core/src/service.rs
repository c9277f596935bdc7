//! Content service facade.
//!
//! Composes the record model, lifecycle rules, filter plan and store into the
//! operations the HTTP layer exposes. This is the boundary where domain
//! errors are produced; handlers only translate them.

use std::sync::Arc;

use chrono::Utc;

use crate::content::{Author, ContentPatch, ContentRecord, ContentType, NewContent};
use crate::error::CoreError;
use crate::lifecycle::{self, Transition};
use crate::query::{ContentFilter, ContentPage, ContentQuery, PageWindow};
use crate::store::ContentStore;
use crate::types::ContentId;

/// Deepest resource hierarchy accepted when checking for cycles.
pub const MAX_HIERARCHY_DEPTH: usize = 64;

/// The authenticated identity performing a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

impl From<&Actor> for Author {
    fn from(actor: &Actor) -> Self {
        Author {
            id: actor.id.clone(),
            name: actor.name.clone(),
            email: actor.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ServiceOptions {
    /// Bump `metadata.views` on every successful `get`.
    pub track_views: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self { track_views: true }
    }
}

/// Trash listing result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TrashListing {
    pub content: Vec<ContentRecord>,
    pub total: i64,
}

#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn ContentStore>,
    options: ServiceOptions,
}

fn require_actor(actor: Option<&Actor>) -> Result<&Actor, CoreError> {
    actor.ok_or_else(|| CoreError::Unauthorized("Authentication required".into()))
}

impl ContentService {
    pub fn new(store: Arc<dyn ContentStore>, options: ServiceOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Fetch an active record. View tracking never fails the read.
    pub async fn get(&self, id: ContentId) -> Result<ContentRecord, CoreError> {
        let mut record = self.find_active(id).await?;

        if self.options.track_views {
            match self.store.increment_views(id).await {
                Ok(true) => record.metadata.views += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(content_id = %id, error = %e, "Failed to increment view counter");
                }
            }
        }
        Ok(record)
    }

    pub async fn list(&self, query: &ContentQuery) -> Result<ContentPage, CoreError> {
        let plan = query.plan();
        let result = self.store.query(&plan.filter, Some(plan.window)).await?;
        tracing::debug!(
            total = result.total,
            page = plan.window.page,
            limit = plan.window.limit,
            "Listed content"
        );
        Ok(ContentPage {
            content: result.records,
            pagination: plan.window.pagination(result.total),
        })
    }

    /// Every trashed record, most recently deleted first.
    pub async fn list_trash(
        &self,
        content_type: Option<ContentType>,
    ) -> Result<TrashListing, CoreError> {
        let result = self
            .store
            .query(&ContentFilter::trashed(content_type), None)
            .await?;
        Ok(TrashListing {
            content: result.records,
            total: result.total,
        })
    }

    /// Cheapest possible round trip to the store, used to keep it warm.
    pub async fn ping(&self) -> Result<(), CoreError> {
        let window = PageWindow { page: 1, limit: 1 };
        self.store.query(&ContentFilter::active(), Some(window)).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    pub async fn create(
        &self,
        input: NewContent,
        actor: Option<&Actor>,
    ) -> Result<ContentRecord, CoreError> {
        let actor = require_actor(actor)?;
        let record = ContentRecord::new(ContentId::now_v7(), input, actor.into(), Utc::now())?;
        self.check_parent(&record).await?;
        self.store.insert(&record).await?;

        tracing::info!(
            content_id = %record.id,
            content_type = %record.content_type(),
            status = %record.status,
            actor = %actor.id,
            "Content created"
        );
        Ok(record)
    }

    pub async fn update(
        &self,
        id: ContentId,
        patch: ContentPatch,
        actor: Option<&Actor>,
    ) -> Result<ContentRecord, CoreError> {
        let actor = require_actor(actor)?;
        let current = self.find_active(id).await?;

        let expected_revision = patch.expected_revision;
        if expected_revision.is_some_and(|rev| rev != current.revision) {
            return Err(stale_revision(id));
        }

        let mut next = current.clone();
        next.apply_patch(patch, Utc::now())?;
        if next.variant.parent_id() != current.variant.parent_id() {
            self.check_parent(&next).await?;
        }

        let Some(stored) = self.store.update(&next, expected_revision).await? else {
            return Err(match expected_revision {
                Some(_) => stale_revision(id),
                None => CoreError::content_not_found(id),
            });
        };

        tracing::info!(
            content_id = %id,
            status = %stored.status,
            revision = stored.revision,
            actor = %actor.id,
            "Content updated"
        );
        Ok(stored)
    }

    /// Move a record to the trash. Trashing a trashed record succeeds.
    pub async fn soft_delete(&self, id: ContentId, actor: Option<&Actor>) -> Result<(), CoreError> {
        let actor = require_actor(actor)?;
        let mut record = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| CoreError::content_not_found(id))?;

        let now = Utc::now();
        if lifecycle::trash(&mut record, now) == Transition::Unchanged {
            tracing::debug!(content_id = %id, "Content already in trash");
            return Ok(());
        }
        if !self.store.mark_trashed(id, now).await? {
            // Lost a race: fine if someone else trashed it, not if it is gone.
            if self.store.find(id).await?.is_none() {
                return Err(CoreError::content_not_found(id));
            }
        }

        tracing::info!(content_id = %id, actor = %actor.id, "Content moved to trash");
        Ok(())
    }

    pub async fn restore(
        &self,
        id: ContentId,
        actor: Option<&Actor>,
    ) -> Result<ContentRecord, CoreError> {
        let actor = require_actor(actor)?;
        let mut record = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| CoreError::content_not_found(id))?;

        lifecycle::restore(&mut record)?;
        if !self.store.mark_restored(id).await? {
            return Err(CoreError::content_not_found(id));
        }

        tracing::info!(content_id = %id, actor = %actor.id, "Content restored from trash");
        Ok(record)
    }

    /// Permanently remove a trashed record.
    pub async fn purge(&self, id: ContentId, actor: Option<&Actor>) -> Result<(), CoreError> {
        let actor = require_actor(actor)?;
        let record = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| CoreError::content_not_found(id))?;
        lifecycle::ensure_purgeable(&record)?;

        let children = self.store.count_children(id).await?;
        if children > 0 {
            return Err(CoreError::Conflict(format!(
                "Cannot purge content {id}: {children} resource(s) still reference it as parent"
            )));
        }
        if !self.store.purge(id).await? {
            return Err(CoreError::content_not_found(id));
        }

        tracing::info!(content_id = %id, actor = %actor.id, "Content permanently deleted");
        Ok(())
    }

    /// Purge every trashed record that nothing else depends on.
    pub async fn empty_trash(&self, actor: Option<&Actor>) -> Result<u64, CoreError> {
        let actor = require_actor(actor)?;
        let purged = self.store.purge_trashed().await?;
        tracing::info!(purged, actor = %actor.id, "Trash emptied");
        Ok(purged)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn find_active(&self, id: ContentId) -> Result<ContentRecord, CoreError> {
        let record = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| CoreError::content_not_found(id))?;
        lifecycle::ensure_active(record)
    }

    /// A parent must be an active resource and must not make the hierarchy
    /// loop back onto `record`.
    async fn check_parent(&self, record: &ContentRecord) -> Result<(), CoreError> {
        let Some(parent_id) = record.variant.parent_id() else {
            return Ok(());
        };
        if parent_id == record.id {
            return Err(CoreError::Validation(
                "A resource cannot be its own parent".into(),
            ));
        }

        let parent = match self.store.find(parent_id).await? {
            Some(parent) if !parent.is_trashed() => parent,
            _ => {
                return Err(CoreError::Validation(format!(
                    "Parent resource {parent_id} does not exist"
                )));
            }
        };
        if parent.content_type() != ContentType::Resource {
            return Err(CoreError::Validation(format!(
                "Parent {parent_id} is not a resource"
            )));
        }

        let mut cursor = parent.variant.parent_id();
        let mut depth = 1;
        while let Some(ancestor) = cursor {
            if ancestor == record.id {
                return Err(CoreError::Validation(
                    "Parent assignment would create a cycle".into(),
                ));
            }
            depth += 1;
            if depth > MAX_HIERARCHY_DEPTH {
                return Err(CoreError::Validation(format!(
                    "Resource hierarchy deeper than {MAX_HIERARCHY_DEPTH} levels"
                )));
            }
            cursor = self
                .store
                .find(ancestor)
                .await?
                .and_then(|r| r.variant.parent_id());
        }
        Ok(())
    }
}

fn stale_revision(id: ContentId) -> CoreError {
    CoreError::Conflict(format!(
        "Content {id} was modified by someone else; reload and retry"
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
