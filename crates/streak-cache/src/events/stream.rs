//! Redis stream implementation of [`EventPublisher`] and [`EventLog`]

use std::collections::HashMap;

use async_trait::async_trait;
use redis::streams::StreamRangeReply;
use tracing::{debug, instrument};

use streak_core::events::LeaderboardEvent;
use streak_core::traits::{EventLog, EventPublisher, RepoResult, StoredEvent};
use streak_core::DomainError;

use crate::pool::{RedisPool, RedisPoolError};

/// Leaderboard events appended to a single Redis stream
#[derive(Debug, Clone)]
pub struct RedisEventLog {
    pool: RedisPool,
    stream: String,
}

impl RedisEventLog {
    pub fn new(pool: RedisPool, stream: impl Into<String>) -> Self {
        Self {
            pool,
            stream: stream.into(),
        }
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }
}

fn cache_err(err: redis::RedisError) -> DomainError {
    RedisPoolError::from(err).into()
}

#[async_trait]
impl EventPublisher for RedisEventLog {
    #[instrument(skip(self, event), fields(event = %event.kind(), user_id = %event.user_id()))]
    async fn publish(&self, event: &LeaderboardEvent) -> RepoResult<String> {
        let mut conn = self.pool.get().await?;

        let mut cmd = redis::cmd("XADD");
        cmd.arg(&self.stream).arg("*");
        for (field, value) in event.to_fields() {
            cmd.arg(field).arg(value);
        }
        let id: String = cmd.query_async(&mut conn).await.map_err(cache_err)?;

        debug!(stream = %self.stream, id = %id, "Published leaderboard event");
        Ok(id)
    }
}

#[async_trait]
impl EventLog for RedisEventLog {
    #[instrument(skip(self))]
    async fn read_after(&self, cursor: Option<&str>, count: usize) -> RepoResult<Vec<StoredEvent>> {
        let mut conn = self.pool.get().await?;
        let start = cursor.map_or_else(|| "-".to_string(), |id| format!("({id}"));

        let reply: StreamRangeReply = redis::cmd("XRANGE")
            .arg(&self.stream)
            .arg(start)
            .arg("+")
            .arg("COUNT")
            .arg(count)
            .query_async(&mut conn)
            .await
            .map_err(cache_err)?;

        reply
            .ids
            .into_iter()
            .map(|entry| {
                let fields = entry
                    .map
                    .iter()
                    .map(|(name, value)| {
                        redis::from_redis_value::<String>(value).map(|v| (name.clone(), v))
                    })
                    .collect::<Result<HashMap<_, _>, _>>()
                    .map_err(cache_err)?;
                Ok(StoredEvent {
                    id: entry.id,
                    event: LeaderboardEvent::from_fields(&fields)?,
                })
            })
            .collect()
    }
}
