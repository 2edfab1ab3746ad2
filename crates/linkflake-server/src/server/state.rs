use std::sync::Arc;

use anyhow::Context;
use linkflake_core::{
    MappingStore, MemoryStore, Shortener, SqliteStore,
    linkflake::{AtomicIdentifierClock, IdentifierClock, LockIdentifierClock, SystemClock},
};
use tracing::{info, warn};

use crate::server::config::{GeneratorKind, ServerConfig};

/// Generator selected at startup.
pub type DynGenerator = Box<dyn IdentifierClock + Send + Sync>;

/// Store selected at startup.
pub type DynStore = Arc<dyn MappingStore>;

pub type AppShortener = Shortener<DynGenerator, DynStore>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<AppShortener>,
}

impl AppState {
    pub fn new(shortener: AppShortener) -> Self {
        Self {
            shortener: Arc::new(shortener),
        }
    }

    /// Builds the generator and store described by `config`.
    pub async fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let generator: DynGenerator = match config.generator {
            GeneratorKind::Lock => Box::new(LockIdentifierClock::new(
                config.node,
                config.epoch,
                SystemClock,
            )),
            GeneratorKind::Atomic => Box::new(AtomicIdentifierClock::new(
                config.node,
                config.epoch,
                SystemClock,
            )),
        };

        let store: DynStore = match &config.database_url {
            Some(url) => Arc::new(
                SqliteStore::connect(url)
                    .await
                    .with_context(|| format!("failed to open database `{url}`"))?,
            ),
            None => {
                warn!("DATABASE_URL not set, mappings are kept in memory only");
                Arc::new(MemoryStore::new())
            }
        };

        info!(node = %config.node, generator = ?config.generator, "ID generator ready");
        Ok(Self::new(Shortener::with_config(
            generator,
            store,
            config.shortener,
        )))
    }
}
