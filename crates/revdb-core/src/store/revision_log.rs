//! Per-key append-only revision history.

use crate::types::Application;

/// Ordered revisions of one application, oldest first.
///
/// Never empty: a log is only constructed around its first revision. Resource
/// versions strictly increase along the log; compaction may leave gaps below
/// the retained tail but never renumbers what it keeps.
#[derive(Debug, Clone)]
pub struct RevisionLog {
    entries: Vec<Application>,
    next_resource_version: u64,
}

impl RevisionLog {
    /// Start a log with `first` as revision 0.
    pub fn new(mut first: Application) -> Self {
        first.resource_version = 0.to_string();
        Self {
            entries: vec![first],
            next_resource_version: 1,
        }
    }

    /// Newest revision. Panics if the log is empty, which is a broken invariant.
    pub fn last(&self) -> &Application {
        match self.entries.last() {
            Some(last) => last,
            None => panic!("revision log should have at least one record"),
        }
    }

    /// Whether the newest revision is live (not soft-deleted).
    pub fn is_active(&self) -> bool {
        !self.last().is_deleted()
    }

    /// Append `revision`, stamping it with the next resource version.
    pub fn append(&mut self, mut revision: Application) -> &Application {
        revision.resource_version = self.next_resource_version.to_string();
        self.next_resource_version += 1;
        self.entries.push(revision);
        self.last()
    }

    /// Resource version the next append will receive.
    pub fn next_resource_version(&self) -> u64 {
        self.next_resource_version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All retained revisions, oldest first.
    pub fn entries(&self) -> &[Application] {
        &self.entries
    }

    /// Drop all but the newest `retain` revisions. Returns how many were dropped.
    ///
    /// `retain` is floored at 1 so the current revision always survives.
    pub fn truncate_to_newest(&mut self, retain: usize) -> usize {
        let retain = retain.max(1);
        if self.entries.len() <= retain {
            return 0;
        }
        let dropped = self.entries.len() - retain;
        self.entries.drain(..dropped);
        dropped
    }
}
