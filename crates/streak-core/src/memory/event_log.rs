//! In-process leaderboard stream

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::DomainError;
use crate::events::LeaderboardEvent;
use crate::traits::{EventLog, EventPublisher, RepoResult, StoredEvent};

/// Append-only event log with stream-style ids (`"<seq>-0"`)
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    entries: RwLock<Vec<StoredEvent>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event appended so far
    pub fn snapshot(&self) -> Vec<LeaderboardEvent> {
        self.entries.read().iter().map(|e| e.event.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn sequence_of(id: &str) -> RepoResult<usize> {
    id.split('-')
        .next()
        .and_then(|seq| seq.parse::<usize>().ok())
        .ok_or_else(|| DomainError::ValidationError(format!("invalid stream cursor: {id}")))
}

#[async_trait]
impl EventPublisher for MemoryEventLog {
    async fn publish(&self, event: &LeaderboardEvent) -> RepoResult<String> {
        let mut entries = self.entries.write();
        let id = format!("{}-0", entries.len() + 1);
        entries.push(StoredEvent {
            id: id.clone(),
            event: event.clone(),
        });
        Ok(id)
    }
}

#[async_trait]
impl EventLog for MemoryEventLog {
    async fn read_after(&self, cursor: Option<&str>, count: usize) -> RepoResult<Vec<StoredEvent>> {
        // Sequence n lives at index n - 1, so "after n" starts at index n.
        let start = cursor.map(sequence_of).transpose()?.unwrap_or(0);
        let entries = self.entries.read();
        Ok(entries.iter().skip(start).take(count).cloned().collect())
    }
}
