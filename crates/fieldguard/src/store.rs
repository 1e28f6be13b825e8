//! Constraint store
//!
//! Holds the transport [`Config`] and the current constraints document for a
//! whole application. The store is an explicit value: construct one, clone it
//! into every place that needs it, and all clones share the same state.
//!
//! The document is replaced wholesale, either by [`ConstraintStore::set`] or
//! by a successful load. A failed load leaves the previous document in place.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;

use crate::{config::Config, model::Constraints, Error, Result};

// ═══════════════════════════════════════════════════════════════════════════
// CONSTRAINT SOURCES
// ═══════════════════════════════════════════════════════════════════════════

/// Somewhere a constraints document can be fetched from.
#[async_trait]
pub trait ConstraintSource: Send + Sync {
    async fn fetch(&self, config: &Config) -> Result<Constraints>;
}

/// Fetches the document with an HTTP GET on `constraints_url`.
///
/// When authentication is needed the client keeps cookies and sends the
/// configured `Authorization` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConstraintSource;

impl HttpConstraintSource {
    fn client(config: &Config) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().cookie_store(config.needs_authentication);

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(builder.build()?)
    }
}

#[async_trait]
impl ConstraintSource for HttpConstraintSource {
    async fn fetch(&self, config: &Config) -> Result<Constraints> {
        let client = Self::client(config)?;
        let mut request = client.get(&config.constraints_url);

        if config.needs_authentication {
            if let Some(authorization) = &config.authorization {
                request = request.header(AUTHORIZATION, authorization);
            }
        }

        tracing::debug!(url = %config.constraints_url, "Fetching constraints");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport {
                url: config.constraints_url.clone(),
                status: status.as_u16(),
            });
        }

        Ok(response.json::<Constraints>().await?)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// STORE
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct StoreState {
    config: Option<Config>,
    constraints: Option<Arc<Constraints>>,
}

/// Shared holder of the configuration and the constraints document.
#[derive(Debug, Clone, Default)]
pub struct ConstraintStore {
    state: Arc<RwLock<StoreState>>,
}

impl ConstraintStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store the transport configuration, replacing any earlier one.
    pub fn configure(&self, config: Config) -> Result<()> {
        config.validate()?;
        tracing::debug!(
            url = %config.constraints_url,
            needs_authentication = config.needs_authentication,
            "Constraint store configured"
        );
        self.write().config = Some(config);
        Ok(())
    }

    /// The stored configuration.
    ///
    /// # Errors
    ///
    /// [`Error::NotConfigured`] until [`ConstraintStore::configure`] succeeds.
    pub fn config(&self) -> Result<Config> {
        self.read().config.clone().ok_or(Error::NotConfigured)
    }

    /// Replace the document directly; `None` clears it.
    pub fn set(&self, constraints: Option<Constraints>) {
        self.write().constraints = constraints.map(Arc::new);
    }

    /// The current document, if one has been set or loaded.
    pub fn get(&self) -> Option<Arc<Constraints>> {
        self.read().constraints.clone()
    }

    /// Fetch the document over HTTP and store it.
    pub async fn load(&self) -> Result<Arc<Constraints>> {
        self.load_from(&HttpConstraintSource).await
    }

    /// Fetch the document from `source` and store it.
    ///
    /// Requires configuration. On failure the current document is kept and
    /// the error is returned.
    pub async fn load_from(&self, source: &dyn ConstraintSource) -> Result<Arc<Constraints>> {
        let config = self.config()?;

        let constraints = source.fetch(&config).await.map_err(|e| {
            tracing::warn!("Failed to load constraints from '{}': {e}", config.constraints_url);
            e
        })?;

        let constraints = Arc::new(constraints);
        self.write().constraints = Some(Arc::clone(&constraints));

        tracing::info!(
            entities = constraints.entity_count(),
            "Loaded constraints from '{}'",
            config.constraints_url
        );
        Ok(constraints)
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
