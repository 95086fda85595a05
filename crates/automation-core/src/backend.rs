use async_trait::async_trait;

use crate::types::{ActionPoint, Screen};
use crate::Result;

/// Remote service the engine talks to.
///
/// Implementations own transport, serialization and timeouts. None of these
/// calls are retried by the engine.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Action points matching `kind` and `status`, in backend order.
    async fn action_points(&self, kind: &str, status: i32) -> Result<Vec<ActionPoint>>;

    async fn screen(&self, screen_id: &str) -> Result<Screen>;

    async fn report_screen_view(&self, screen_id: &str) -> Result<()>;

    async fn register_push_token(&self, token: &str) -> Result<()>;
}
