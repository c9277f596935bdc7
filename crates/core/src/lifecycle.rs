//! Status and existence state machine for content records.
//!
//! Two independent axes: visibility (`status`) and existence (active or
//! trashed). Purging is terminal and happens in the store.

use crate::content::{ContentRecord, ContentStatus};
use crate::error::CoreError;
use crate::types::Timestamp;

/// Existence axis of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    Active,
    Trashed,
}

/// Outcome of a transition that may be a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed,
    Unchanged,
}

impl ContentRecord {
    pub fn existence(&self) -> Existence {
        if self.deleted_at.is_some() {
            Existence::Trashed
        } else {
            Existence::Active
        }
    }

    pub fn is_trashed(&self) -> bool {
        self.existence() == Existence::Trashed
    }
}

/// Move a record to `status`.
///
/// Entering `published` stamps `published_at` only when it has never been
/// set, so re-publishing keeps the original date. Leaving `published` does
/// not clear it.
pub fn set_status(record: &mut ContentRecord, status: ContentStatus, now: Timestamp) -> Transition {
    if status == ContentStatus::Published && record.published_at.is_none() {
        record.published_at = Some(now);
    }
    if record.status == status {
        return Transition::Unchanged;
    }
    record.status = status;
    Transition::Changed
}

/// Active -> Trashed. Status and `updated_at` are left alone.
pub fn trash(record: &mut ContentRecord, now: Timestamp) -> Transition {
    if record.is_trashed() {
        return Transition::Unchanged;
    }
    record.deleted_at = Some(now);
    Transition::Changed
}

/// Trashed -> Active. Only `deleted_at` changes.
pub fn restore(record: &mut ContentRecord) -> Result<(), CoreError> {
    if !record.is_trashed() {
        return Err(CoreError::content_not_found(record.id));
    }
    record.deleted_at = None;
    Ok(())
}

/// Purge is only reachable from the trash.
pub fn ensure_purgeable(record: &ContentRecord) -> Result<(), CoreError> {
    if !record.is_trashed() {
        return Err(CoreError::content_not_found(record.id));
    }
    Ok(())
}

/// Trashed records are invisible to normal reads and writes.
pub fn ensure_active(record: ContentRecord) -> Result<ContentRecord, CoreError> {
    if record.is_trashed() {
        return Err(CoreError::content_not_found(record.id));
    }
    Ok(record)
}
