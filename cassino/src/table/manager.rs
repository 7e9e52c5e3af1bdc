//! Match manager for spawning and tracking match actors.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, oneshot};
use uuid::Uuid;

use super::{
    MatchId,
    actor::{MatchActor, MatchHandle},
    config::MatchConfig,
    messages::{MatchMessage, MatchResponse},
};
use crate::game::engine::MatchRules;

/// Match metadata for discovery.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub id: MatchId,
    pub name: String,
    pub rules: MatchRules,
    pub created_at: DateTime<Utc>,
}

/// Spawns match actors and tracks their handles. Purely in-memory;
/// matches live only as long as the process.
#[derive(Debug, Default)]
pub struct MatchManager {
    matches: Arc<RwLock<HashMap<MatchId, MatchHandle>>>,
    metadata: Arc<RwLock<HashMap<MatchId, MatchMetadata>>>,
}

impl MatchManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a match and spawn its actor task.
    pub async fn create_match(&self, config: MatchConfig) -> MatchHandle {
        let id = Uuid::new_v4();
        let metadata = MatchMetadata {
            id,
            name: config.name.clone(),
            rules: config.rules,
            created_at: Utc::now(),
        };

        let (actor, handle) = MatchActor::new(id, config);
        tokio::spawn(actor.run());

        self.matches.write().await.insert(id, handle.clone());
        self.metadata.write().await.insert(id, metadata);

        log::info!("Created match {id}");
        handle
    }

    pub async fn get_match(&self, id: MatchId) -> Option<MatchHandle> {
        self.matches.read().await.get(&id).cloned()
    }

    pub async fn list_matches(&self) -> Vec<MatchMetadata> {
        let mut all: Vec<MatchMetadata> = self.metadata.read().await.values().cloned().collect();
        all.sort_by_key(|m| m.created_at);
        all
    }

    pub async fn match_count(&self) -> usize {
        self.matches.read().await.len()
    }

    /// Close a match and forget its handle.
    pub async fn close_match(&self, id: MatchId) -> Result<(), String> {
        let handle = self
            .get_match(id)
            .await
            .ok_or_else(|| format!("Match {id} not found"))?;

        let (response, receiver) = oneshot::channel();
        handle.send(MatchMessage::Close { response }).await?;
        match receiver.await {
            Ok(MatchResponse::Success) => {}
            Ok(other) => {
                return Err(other
                    .error_message()
                    .unwrap_or_else(|| "Close failed".to_string()));
            }
            Err(_) => return Err("Match actor dropped the close request".to_string()),
        }

        self.matches.write().await.remove(&id);
        self.metadata.write().await.remove(&id);
        log::info!("Closed match {id}");
        Ok(())
    }
}
