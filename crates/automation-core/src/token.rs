use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::debug;

use crate::backend::Backend;
use crate::store::KeyValueStore;
use crate::Result;

/// Store key holding the last registered push token.
pub const PUSH_TOKEN_KEY: &str = "push_token_key";

// ---------------------------------------------------------------------------
// PushTokenTracker
// ---------------------------------------------------------------------------

/// Registers the device push token with the backend, once per distinct value.
///
/// Platforms redeliver the same token freely; only a value that differs from
/// the persisted one reaches the backend. The read-compare-write sequence runs
/// under one lock, so concurrent deliveries of different tokens leave the
/// store holding whichever was registered last.
pub struct PushTokenTracker {
    store: Arc<dyn KeyValueStore>,
    backend: Arc<dyn Backend>,
    runtime: Handle,
    update: Mutex<()>,
}

impl PushTokenTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, backend: Arc<dyn Backend>, runtime: Handle) -> Self {
        Self {
            store,
            backend,
            runtime,
            update: Mutex::new(()),
        }
    }

    /// Record `token`. Returns `Ok(true)` when it differed from the persisted
    /// value and a registration was sent, `Ok(false)` for a repeat.
    ///
    /// The local write happens immediately; registration runs in the
    /// background and its failure is logged only.
    pub fn set_token(&self, token: &str) -> Result<bool> {
        let changed = self.claim(token)?;
        if changed {
            self.register(token);
        }
        Ok(changed)
    }

    /// Like [`set_token`](Self::set_token), but waits for the registration and
    /// returns its error.
    pub async fn set_token_and_wait(&self, token: &str) -> Result<bool> {
        let changed = self.claim(token)?;
        if changed {
            self.backend.register_push_token(token).await?;
            debug!("push token registered");
        }
        Ok(changed)
    }

    /// The persisted token, or `None` if none was ever stored.
    pub fn token(&self) -> Option<String> {
        Some(self.store.get_string(PUSH_TOKEN_KEY, "")).filter(|t| !t.is_empty())
    }

    /// Persist `token` if it differs from the stored value.
    fn claim(&self, token: &str) -> Result<bool> {
        let _guard = self.update.lock();
        let current = self.store.get_string(PUSH_TOKEN_KEY, "");
        if current == token {
            debug!("push token unchanged, skipping registration");
            return Ok(false);
        }
        self.store.put_string(PUSH_TOKEN_KEY, token)?;
        Ok(true)
    }

    fn register(&self, token: &str) {
        let backend = Arc::clone(&self.backend);
        let token = token.to_string();
        self.runtime.spawn(async move {
            match backend.register_push_token(&token).await {
                Ok(()) => debug!("push token registered"),
                Err(e) => debug!(error = %e, "push token registration failed"),
            }
        });
    }
}
