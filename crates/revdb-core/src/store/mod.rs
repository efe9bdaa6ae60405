//! In-memory versioned application store.
//!
//! Every mutation appends an immutable revision to the key's [`RevisionLog`];
//! nothing is overwritten in place. A single mutex guards the whole title to
//! log map, and every public operation, compaction included, holds it for its
//! entire critical section. No I/O happens under the lock.

mod revision_log;

pub use revision_log::RevisionLog;

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::debug;

use crate::error::{RevError, RevResult};
use crate::types::{Application, ListFilter};
use crate::validation::validate_application;

/// Outcome of one compaction sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionReport {
    /// Keys whose history was trimmed.
    pub keys_compacted: usize,
    /// Revisions discarded across all keys.
    pub revisions_dropped: usize,
}

/// Versioned store keyed by application title.
///
/// Returned applications are always owned clones; nothing handed out aliases
/// store state.
#[derive(Debug, Default)]
pub struct VersionedStore {
    logs: Mutex<BTreeMap<String, RevisionLog>>,
}

impl VersionedStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock means an invariant check already panicked mid-operation.
    fn logs(&self) -> MutexGuard<'_, BTreeMap<String, RevisionLog>> {
        self.logs
            .lock()
            .expect("store lock poisoned by an earlier invariant violation")
    }

    /// Newest revision of an active key.
    pub fn get(&self, title: &str) -> RevResult<Application> {
        let logs = self.logs();
        let log = logs.get(title).ok_or_else(|| RevError::not_found(title))?;
        if !log.is_active() {
            return Err(RevError::deleted(title));
        }
        Ok(log.last().clone())
    }

    /// Full retained history of a key, oldest first, deleted or not.
    pub fn dump_key(&self, title: &str) -> RevResult<Vec<Application>> {
        let logs = self.logs();
        let log = logs.get(title).ok_or_else(|| RevError::not_found(title))?;
        assert!(
            !log.is_empty(),
            "revision log should have at least one record"
        );
        Ok(log.entries().to_vec())
    }

    /// Newest revision of every active key passing `filter`, sorted by title.
    pub fn list(&self, filter: &ListFilter) -> Vec<Application> {
        let logs = self.logs();
        logs.values()
            .filter(|log| log.is_active())
            .map(RevisionLog::last)
            .filter(|app| filter.matches(app))
            .cloned()
            .collect()
    }

    /// Create `app`, or recreate it if its newest revision is soft-deleted.
    ///
    /// Returns the stored revision.
    pub fn create(&self, app: &Application) -> RevResult<Application> {
        validate_application(app)?;

        let mut revision = app.clone();
        revision.create_time_stamp = Some(Utc::now());
        revision.delete_time_stamp = None;

        let stored = {
            let mut logs = self.logs();
            match logs.get_mut(&app.title) {
                Some(log) => {
                    if log.is_active() {
                        return Err(RevError::already_exists(&app.title));
                    }
                    log.append(revision).clone()
                }
                None => {
                    let log = RevisionLog::new(revision);
                    let stored = log.last().clone();
                    logs.insert(app.title.clone(), log);
                    stored
                }
            }
        };
        debug!(
            title = %stored.title,
            resource_version = %stored.resource_version,
            "Application created"
        );
        Ok(stored)
    }

    /// Append a new revision of an active key with `app`'s content.
    ///
    /// Keeps the original creation time. Rejected if nothing comparable changed.
    pub fn update(&self, app: &Application) -> RevResult<Application> {
        validate_application(app)?;

        let stored = {
            let mut logs = self.logs();
            let log = logs
                .get_mut(&app.title)
                .ok_or_else(|| RevError::not_found(&app.title))?;
            let last = log.last();
            if last.is_deleted() {
                return Err(RevError::conflict_deleted(&app.title));
            }
            if last.same_content(app) {
                return Err(RevError::unchanged(&app.title));
            }

            let mut revision = app.clone();
            revision.create_time_stamp = last.create_time_stamp;
            revision.delete_time_stamp = None;
            log.append(revision).clone()
        };
        debug!(
            title = %stored.title,
            resource_version = %stored.resource_version,
            "Application updated"
        );
        Ok(stored)
    }

    /// Soft-delete an active key by appending a copy stamped with a deletion time.
    pub fn delete(&self, title: &str) -> RevResult<Application> {
        let stored = {
            let mut logs = self.logs();
            let log = logs.get_mut(title).ok_or_else(|| RevError::not_found(title))?;
            let last = log.last();
            if last.is_deleted() {
                return Err(RevError::conflict_deleted(title));
            }

            let mut revision = last.clone();
            revision.delete_time_stamp = Some(Utc::now());
            log.append(revision).clone()
        };
        debug!(
            title = %stored.title,
            resource_version = %stored.resource_version,
            "Application deleted"
        );
        Ok(stored)
    }

    /// Trim every log longer than `retention` to its newest `retention` entries.
    pub fn compact(&self, retention: usize) -> CompactionReport {
        let mut trimmed = Vec::new();
        {
            let mut logs = self.logs();
            for (title, log) in logs.iter_mut() {
                let dropped = log.truncate_to_newest(retention);
                if dropped > 0 {
                    trimmed.push((title.clone(), log.len(), dropped));
                }
            }
        }

        let mut report = CompactionReport::default();
        for (title, retained, dropped) in trimmed {
            report.keys_compacted += 1;
            report.revisions_dropped += dropped;
            debug!(title = %title, retained, dropped, "Compacted revision log");
        }
        report
    }

    /// Number of keys ever created, including soft-deleted ones.
    pub fn key_count(&self) -> usize {
        self.logs().len()
    }

    /// Number of revisions currently retained across all keys.
    pub fn revision_count(&self) -> usize {
        self.logs().values().map(RevisionLog::len).sum()
    }
}
