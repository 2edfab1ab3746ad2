//! # Short-code issuance
//!
//! [`Shortener`] coordinates an [`IdentifierClock`] with a [`MappingStore`]:
//!
//! 1. validate and trim the URL
//! 2. return the existing mapping if the URL was shortened before
//! 3. otherwise draw an ID, encode it, and check the store for a collision
//! 4. persist the first non-colliding code
//!
//! Collisions (including a duplicate code caught by the store's uniqueness
//! constraint during a concurrent save) are logged and regenerated. A
//! duplicate URL caught on save means a concurrent request won the race for
//! the same URL; its mapping is returned.
//!
//! [`IdentifierClock`]: linkflake::IdentifierClock

mod url;


pub use url::*;

use core::time::Duration;

use linkflake::{Base62Ext, IdentifierClock, Poll, ShortCode};
use tracing::{debug, info, instrument, warn};

use crate::{Error, Mapping, NewMapping, Result, StoreError, store::MappingStore};

/// Tuning knobs for [`Shortener`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShortenerConfig {
    /// Maximum number of collisions tolerated for a single request before
    /// giving up with [`Error::CollisionRetriesExhausted`]. `None` retries
    /// until a free code is found.
    pub max_collision_retries: Option<u32>,
}

/// Issues and resolves short codes.
///
/// Owns its generator; the generator's critical section never spans store
/// I/O, so any number of requests can run concurrently against one
/// `Shortener`.
pub struct Shortener<G, S> {
    generator: G,
    store: S,
    config: ShortenerConfig,
}

impl<G, S> Shortener<G, S>
where
    G: IdentifierClock + Send + Sync,
    S: MappingStore,
{
    pub fn new(generator: G, store: S) -> Self {
        Self::with_config(generator, store, ShortenerConfig::default())
    }

    pub fn with_config(generator: G, store: S, config: ShortenerConfig) -> Self {
        Self {
            generator,
            store,
            config,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> ShortenerConfig {
        self.config
    }

    /// Returns the mapping for `url`, creating it on first use.
    ///
    /// Calling this twice with the same URL returns the same short code and
    /// stores a single mapping.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if `url` fails [`validate_url`]
    /// - [`Error::IdGeneration`] on a fatal generator condition
    /// - [`Error::Store`] if the store fails
    /// - [`Error::CollisionRetriesExhausted`] if a collision cap is configured
    ///   and reached
    ///
    /// No mapping is persisted on any error path.
    #[instrument(level = "debug", skip(self))]
    pub async fn shorten_url(&self, url: &str) -> Result<Mapping> {
        let url = validate_url(url)?;

        if let Some(existing) = self.store.find_by_url(url).await? {
            debug!(code = %existing.short_code, "URL already shortened");
            return Ok(existing);
        }

        let mut collisions = 0_u32;
        loop {
            let code = self.next_code().await?;

            if self.store.exists_by_code(&code).await? {
                collisions += 1;
                warn!(%code, collisions, "short code collision, regenerating");
                self.check_collision_budget(collisions)?;
                continue;
            }

            match self.store.save(NewMapping::new(url, code)).await {
                Ok(mapping) => {
                    info!(code = %mapping.short_code, id = mapping.id, "created mapping");
                    return Ok(mapping);
                }
                Err(StoreError::DuplicateCode(_)) => {
                    collisions += 1;
                    warn!(%code, collisions, "short code taken during save, regenerating");
                    self.check_collision_budget(collisions)?;
                }
                Err(StoreError::DuplicateUrl(_)) => {
                    debug!("URL shortened concurrently, returning existing mapping");
                    return self
                        .store
                        .find_by_url(url)
                        .await?
                        .ok_or_else(|| StoreError::DuplicateUrl(url.to_owned()).into());
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Resolves a short code to its mapping.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no mapping has this code
    /// - [`Error::Store`] if the store fails
    #[instrument(level = "debug", skip(self))]
    pub async fn get_original_url(&self, code: &str) -> Result<Mapping> {
        self.store
            .find_by_code(code)
            .await?
            .ok_or_else(|| Error::NotFound {
                code: code.to_owned(),
            })
    }

    /// Draws the next ID and encodes it. A lost race is retried after yielding
    /// to the scheduler; an exhausted millisecond sleeps for the hinted delay.
    async fn next_code(&self) -> Result<ShortCode> {
        loop {
            match self.generator.try_poll_id()? {
                Poll::Ready { id } => break Ok(id.encode()),
                Poll::Pending { yield_for: 0 } => tokio::task::yield_now().await,
                Poll::Pending { yield_for } => {
                    tokio::time::sleep(Duration::from_millis(yield_for)).await;
                }
            }
        }
    }

    fn check_collision_budget(&self, collisions: u32) -> Result<()> {
        match self.config.max_collision_retries {
            Some(max) if collisions > max => {
                warn!(collisions, max, "collision retry budget exhausted");
                Err(Error::CollisionRetriesExhausted {
                    attempts: collisions,
                })
            }
            _ => Ok(()),
        }
    }
}
