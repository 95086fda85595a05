use std::sync::Arc;

use anyhow::Context;
use automation_core::{Dispatcher, FileStore};
use automation_http::HttpBackend;
use tokio::runtime::Runtime;

use crate::config::CliConfig;
use crate::host::ConsoleHost;

/// A dispatcher wired to the HTTP backend, the file store and a console host.
///
/// Owns the runtime; drop it only after the awaited work is done.
pub struct Session {
    pub runtime: Runtime,
    pub engine: Dispatcher,
    pub host: Arc<ConsoleHost>,
}

impl Session {
    pub fn open(config: &CliConfig) -> anyhow::Result<Self> {
        let runtime = Runtime::new().context("failed to start async runtime")?;
        let backend =
            HttpBackend::new(config.backend.clone()).context("invalid backend configuration")?;
        let store = FileStore::open(&config.store_path)
            .with_context(|| format!("failed to open store {}", config.store_path.display()))?;

        let engine = Dispatcher::new(Arc::new(backend), Arc::new(store), runtime.handle().clone());
        let host = ConsoleHost::new();
        engine.set_delegate(host.clone());
        Ok(Self {
            runtime,
            engine,
            host,
        })
    }
}
