//! Tool discovery use case.
//!
//! [`ToolRegistry`] queries the tool server for its published tools and holds
//! the resulting [`ToolCatalog`]. Every run takes an `Arc` snapshot when it
//! starts, so a later [`refresh`](ToolRegistry::refresh) never changes the
//! tool set under a run in progress.

use crate::ports::tool_server::{ToolServer, ToolServerError};
use mcp_agent_domain::{DomainError, ToolCatalog};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Errors that make the tool catalog unavailable
#[derive(Error, Debug)]
pub enum ToolDiscoveryError {
    #[error("Tool server unavailable after {attempts} attempt(s): {source}")]
    Unavailable {
        attempts: usize,
        #[source]
        source: ToolServerError,
    },

    #[error("Invalid tool catalog: {0}")]
    InvalidCatalog(#[from] DomainError),

    #[error("Tool server at {0} published no tools")]
    EmptyCatalog(String),
}

/// Retry and acceptance policy for discovery.
#[derive(Debug, Clone)]
pub struct DiscoveryPolicy {
    /// Total attempts (at least 1)
    pub attempts: usize,
    /// Delay before attempt `n + 1` is `backoff * n`
    pub backoff: Duration,
    /// Accept a server that publishes zero tools
    pub allow_empty: bool,
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(500),
            allow_empty: false,
        }
    }
}

/// Holds the active tool catalog and knows how to rebuild it.
pub struct ToolRegistry {
    server: Arc<dyn ToolServer>,
    policy: DiscoveryPolicy,
    catalog: RwLock<Arc<ToolCatalog>>,
    refresh_lock: Mutex<()>,
}

impl ToolRegistry {
    /// Create a registry with an empty catalog. Call [`refresh`](Self::refresh)
    /// before serving runs, or use [`discover`](Self::discover).
    pub fn new(server: Arc<dyn ToolServer>, policy: DiscoveryPolicy) -> Self {
        Self {
            server,
            policy,
            catalog: RwLock::new(Arc::new(ToolCatalog::empty())),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Create a registry and run discovery once.
    pub async fn discover(
        server: Arc<dyn ToolServer>,
        policy: DiscoveryPolicy,
    ) -> Result<Self, ToolDiscoveryError> {
        let registry = Self::new(server, policy);
        registry.refresh().await?;
        Ok(registry)
    }

    /// The catalog runs should use from now on.
    pub fn snapshot(&self) -> Arc<ToolCatalog> {
        self.catalog
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn server(&self) -> &Arc<dyn ToolServer> {
        &self.server
    }

    /// Re-run discovery and swap in the new catalog.
    ///
    /// On failure the previous catalog stays active. Concurrent refreshes are
    /// serialized.
    pub async fn refresh(&self) -> Result<Arc<ToolCatalog>, ToolDiscoveryError> {
        let _guard = self.refresh_lock.lock().await;

        let catalog = Arc::new(self.fetch_catalog().await?);
        *self.catalog.write().unwrap_or_else(|e| e.into_inner()) = catalog.clone();

        info!(
            endpoint = self.server.endpoint(),
            tools = catalog.len(),
            "Tool catalog loaded: [{}]",
            catalog.names().collect::<Vec<_>>().join(", ")
        );
        Ok(catalog)
    }

    async fn fetch_catalog(&self) -> Result<ToolCatalog, ToolDiscoveryError> {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 1;

        let descriptors = loop {
            match self.server.list_tools().await {
                Ok(descriptors) => break descriptors,
                Err(e) if attempt < attempts => {
                    let delay = self.policy.backoff * attempt as u32;
                    warn!(
                        attempt,
                        attempts,
                        "Tool discovery failed: {}; retrying in {:?}",
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(source) => {
                    return Err(ToolDiscoveryError::Unavailable { attempts, source });
                }
            }
        };

        debug!("Tool server returned {} descriptor(s)", descriptors.len());
        let catalog = ToolCatalog::new(descriptors)?;

        if catalog.is_empty() && !self.policy.allow_empty {
            return Err(ToolDiscoveryError::EmptyCatalog(
                self.server.endpoint().to_string(),
            ));
        }
        Ok(catalog)
    }
}
