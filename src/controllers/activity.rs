//! Audit trail of catalog writes.

use crate::framework::RecordId;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

/// Receives one entry per successful create, update or delete.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn insert_activity(&self, keyword: &'static str, resource: &'static str, id: RecordId);
}

/// Writes activity as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingActivityLog;

#[async_trait]
impl ActivityLog for TracingActivityLog {
    async fn insert_activity(&self, keyword: &'static str, resource: &'static str, id: RecordId) {
        info!(keyword, resource, id, "Activity");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub keyword: &'static str,
    pub resource: &'static str,
    pub id: RecordId,
}

/// Keeps activity in memory, oldest first.
#[derive(Debug, Default)]
pub struct MemoryActivityLog {
    entries: Mutex<Vec<ActivityEntry>>,
}

impl MemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn keywords(&self) -> Vec<&'static str> {
        self.entries.lock().await.iter().map(|e| e.keyword).collect()
    }
}

#[async_trait]
impl ActivityLog for MemoryActivityLog {
    async fn insert_activity(&self, keyword: &'static str, resource: &'static str, id: RecordId) {
        self.entries.lock().await.push(ActivityEntry {
            keyword,
            resource,
            id,
        });
    }
}
