use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::debug;

use crate::backend::Backend;
use crate::types::{ActionPoint, Screen};
use crate::Result;

// ---------------------------------------------------------------------------
// ScreenClient
// ---------------------------------------------------------------------------

/// Thin async layer over the [`Backend`] for screen lookups and view reports.
///
/// Nothing is cached here; every call goes to the backend.
#[derive(Clone)]
pub struct ScreenClient {
    backend: Arc<dyn Backend>,
    runtime: Handle,
}

impl ScreenClient {
    pub fn new(backend: Arc<dyn Backend>, runtime: Handle) -> Self {
        Self { backend, runtime }
    }

    /// The active action point for `kind`/`status`: the last one the backend
    /// lists. An empty list is `Ok(None)`, not an error.
    pub async fn active_point(&self, kind: &str, status: i32) -> Result<Option<ActionPoint>> {
        let mut points = self.backend.action_points(kind, status).await?;
        debug!(kind, status, count = points.len(), "action points fetched");
        Ok(points.pop())
    }

    pub async fn screen(&self, screen_id: &str) -> Result<Screen> {
        self.backend.screen(screen_id).await
    }

    /// Tell the backend a screen was shown and wait for the answer.
    pub async fn report_view_now(&self, screen_id: &str) -> Result<()> {
        self.backend.report_screen_view(screen_id).await
    }

    /// Tell the backend a screen was shown. Returns immediately; failures are
    /// logged and dropped.
    pub fn report_view(&self, screen_id: &str) {
        let backend = Arc::clone(&self.backend);
        let screen_id = screen_id.to_string();
        self.runtime.spawn(async move {
            if let Err(e) = backend.report_screen_view(&screen_id).await {
                debug!(screen_id = %screen_id, error = %e, "screen view report failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{wait_until, BackendCall, ScriptedBackend};

    fn client(backend: &Arc<ScriptedBackend>) -> ScreenClient {
        ScreenClient::new(backend.clone(), Handle::current())
    }

    #[tokio::test]
    async fn active_point_picks_last_entry() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.set_points(vec![
            ActionPoint::new("screen_view", 1, "old"),
            ActionPoint::new("screen_view", 1, "middle"),
            ActionPoint::new("screen_view", 1, "newest"),
        ]);
        let point = client(&backend)
            .active_point("screen_view", 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(point.screen_id(), "newest");
        assert_eq!(
            backend.calls(),
            vec![BackendCall::ActionPoints {
                kind: "screen_view".into(),
                status: 1
            }]
        );
    }

    #[tokio::test]
    async fn active_point_empty_list_is_none() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.set_points(vec![]);
        let point = client(&backend).active_point("screen_view", 1).await.unwrap();
        assert!(point.is_none());
    }

    #[tokio::test]
    async fn active_point_failure_is_err() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.fail_points();
        assert!(client(&backend).active_point("screen_view", 1).await.is_err());
    }

    #[tokio::test]
    async fn screen_failure_is_err() {
        let backend = Arc::new(ScriptedBackend::new());
        let err = client(&backend).screen("missing").await.unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn report_view_runs_in_background() {
        let backend = Arc::new(ScriptedBackend::new());
        client(&backend).report_view("s1");
        let seen = wait_until(500, || {
            backend.calls() == vec![BackendCall::ReportView("s1".into())]
        })
        .await;
        assert!(seen);
    }

    #[tokio::test]
    async fn report_view_failure_is_swallowed() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.fail_reports();
        client(&backend).report_view("s1");
        assert!(wait_until(500, || backend.calls().len() == 1).await);
    }
}
