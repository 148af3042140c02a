//! Redis connection and alert pub/sub

use async_trait::async_trait;
use deadpool_redis::{Config as RedisConfig, Pool, Runtime};
use redis::AsyncCommands;

use crate::alerting::AlertBroadcaster;
use crate::error::{Error, Result};
use crate::models::Alert;

/// Channel carrying every alert
pub const ALERTS_CHANNEL: &str = "safewatch:alerts";

/// Redis connection pool
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
}

impl RedisPool {
    /// Create a new Redis connection pool
    pub fn new(url: &str) -> Result<Self> {
        let cfg = RedisConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| Error::Redis(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.pool.get().await.map_err(|e| Error::Redis(e.to_string()))?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Redis(e.to_string()))?;
        Ok(())
    }
}

/// Publishes alerts to Redis for subscribers outside this process
#[derive(Clone)]
pub struct RedisBroadcaster {
    pool: Pool,
}

impl RedisBroadcaster {
    /// Create a new Redis broadcaster
    pub fn new(pool: &RedisPool) -> Self {
        Self {
            pool: pool.pool.clone(),
        }
    }

    /// Worker-specific channel for filtered subscriptions
    pub fn worker_channel(worker_id: &str) -> String {
        format!("safewatch:worker:{worker_id}")
    }
}

#[async_trait]
impl AlertBroadcaster for RedisBroadcaster {
    async fn publish(&self, alert: &Alert) -> Result<()> {
        let mut conn = self.pool.get().await.map_err(|e| Error::Redis(e.to_string()))?;
        let payload = serde_json::to_string(alert)?;

        let _: () = conn
            .publish(ALERTS_CHANNEL, &payload)
            .await
            .map_err(|e| Error::Redis(e.to_string()))?;

        let _: () = conn
            .publish(Self::worker_channel(&alert.worker_id), &payload)
            .await
            .map_err(|e| Error::Redis(e.to_string()))?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
