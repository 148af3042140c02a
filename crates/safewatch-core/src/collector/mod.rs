//! Collector module - reading ingestion and service assembly
//!
//! The collector wires the state store, broadcasters and ingestion pipeline
//! together and serves the HTTP API until shutdown.

mod pipeline;

pub use pipeline::{Pipeline, PipelineConfig, PipelineResult};

use std::sync::Arc;

use tracing::info;

use crate::alerting::{AlertBroadcaster, ChannelBroadcaster, FanoutBroadcaster};
use crate::api::{AppState, HttpServer};
use crate::config::Config;
use crate::db::{MemoryStore, RedisBroadcaster, RedisPool, StateStore};
use crate::error::Result;
use crate::query::QueryService;

/// The main collector service
pub struct Collector {
    config: Config,
    state: AppState,
}

impl Collector {
    /// Create a new collector instance
    pub async fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let live = ChannelBroadcaster::new(config.broadcast.capacity);

        let broadcaster: Arc<dyn AlertBroadcaster> = match &config.broadcast.redis_url {
            Some(url) => {
                let redis = RedisPool::new(url)?;
                redis.health_check().await?;
                info!("Redis alert fan-out enabled");
                Arc::new(FanoutBroadcaster::new(vec![
                    Arc::new(live.clone()),
                    Arc::new(RedisBroadcaster::new(&redis)),
                ]))
            }
            None => Arc::new(live.clone()),
        };

        let pipeline_config = PipelineConfig {
            publish_timeout: config.broadcast.publish_timeout(),
        };
        let pipeline = Arc::new(Pipeline::new(pipeline_config, store.clone(), broadcaster));

        Ok(Self {
            config,
            state: AppState {
                pipeline,
                queries: QueryService::new(store),
                live,
            },
        })
    }

    /// Serve the HTTP API until Ctrl+C
    pub async fn start(self) -> Result<()> {
        info!("Starting SafeWatch collector...");

        let addr = self.config.http_addr();
        HttpServer::new(self.state).serve(&addr).await?;

        info!("Collector stopped");
        Ok(())
    }

    /// Shared handler state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
