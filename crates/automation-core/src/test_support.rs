//! Scripted collaborators shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::{sleep, Instant};

use crate::action::Action;
use crate::backend::Backend;
use crate::delegate::{AutomationDelegate, DisplaySurface};
use crate::error::AutomationError;
use crate::store::{KeyValueStore, MemoryStore};
use crate::types::{ActionPoint, DisplayRequest, Screen};
use crate::Result;

pub fn push(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Poll `pred` until it holds or `timeout_ms` elapses.
pub async fn wait_until<F>(timeout_ms: u64, mut pred: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if pred() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(Duration::from_millis(2)).await;
    }
}

// ---------------------------------------------------------------------------
// ScriptedBackend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    ActionPoints { kind: String, status: i32 },
    Screen(String),
    ReportView(String),
    RegisterToken(String),
}

/// Backend whose responses are set up front. Screens not added are 404s.
#[derive(Default)]
pub struct ScriptedBackend {
    points: Mutex<Option<Vec<ActionPoint>>>,
    screens: Mutex<HashMap<String, Screen>>,
    fail_reports: AtomicBool,
    fail_registrations: AtomicBool,
    calls: Mutex<Vec<BackendCall>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            points: Mutex::new(Some(Vec::new())),
            ..Self::default()
        }
    }

    pub fn set_points(&self, points: Vec<ActionPoint>) {
        *self.points.lock() = Some(points);
    }

    pub fn fail_points(&self) {
        *self.points.lock() = None;
    }

    pub fn add_screen(&self, screen: Screen) {
        self.screens.lock().insert(screen.id.clone(), screen);
    }

    pub fn fail_reports(&self) {
        self.fail_reports.store(true, Ordering::SeqCst);
    }

    pub fn fail_registrations(&self) {
        self.fail_registrations.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn action_points(&self, kind: &str, status: i32) -> Result<Vec<ActionPoint>> {
        self.record(BackendCall::ActionPoints {
            kind: kind.to_string(),
            status,
        });
        self.points
            .lock()
            .clone()
            .ok_or_else(|| AutomationError::Transport("connection reset".into()))
    }

    async fn screen(&self, screen_id: &str) -> Result<Screen> {
        self.record(BackendCall::Screen(screen_id.to_string()));
        self.screens
            .lock()
            .get(screen_id)
            .cloned()
            .ok_or_else(|| AutomationError::ScreenNotFound(screen_id.to_string()))
    }

    async fn report_screen_view(&self, screen_id: &str) -> Result<()> {
        self.record(BackendCall::ReportView(screen_id.to_string()));
        if self.fail_reports.load(Ordering::SeqCst) {
            return Err(AutomationError::Backend {
                status: 500,
                message: "internal".into(),
            });
        }
        Ok(())
    }

    async fn register_push_token(&self, token: &str) -> Result<()> {
        self.record(BackendCall::RegisterToken(token.to_string()));
        if self.fail_registrations.load(Ordering::SeqCst) {
            return Err(AutomationError::Transport("timed out".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CountingStore
// ---------------------------------------------------------------------------

/// [`MemoryStore`] that counts writes.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.inner.put_string(key, value).unwrap();
        store
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.inner.get_string(key, default)
    }

    fn put_string(&self, key: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.put_string(key, value)
    }
}

// ---------------------------------------------------------------------------
// RecordingDelegate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegateCall {
    Show(DisplayRequest),
    OpenLink(String),
    Close,
    OpenScreen {
        screen_id: String,
        html_page: String,
    },
    Purchase(String),
    Restore,
    Error(String),
    FlowFinished(Action),
}

type CallLog = Arc<Mutex<Vec<DelegateCall>>>;

/// Delegate that records every callback, including surface `show` calls.
pub struct RecordingDelegate {
    calls: CallLog,
    with_surface: bool,
}

struct RecordingSurface {
    calls: CallLog,
}

impl DisplaySurface for RecordingSurface {
    fn show(&self, request: DisplayRequest) {
        self.calls.lock().push(DelegateCall::Show(request));
    }
}

impl RecordingDelegate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: CallLog::default(),
            with_surface: true,
        })
    }

    pub fn without_surface() -> Arc<Self> {
        Arc::new(Self {
            calls: CallLog::default(),
            with_surface: false,
        })
    }

    pub fn calls(&self) -> Vec<DelegateCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: DelegateCall) {
        self.calls.lock().push(call);
    }
}

impl AutomationDelegate for RecordingDelegate {
    fn provide_display_surface(&self) -> Option<Arc<dyn DisplaySurface>> {
        if !self.with_surface {
            return None;
        }
        Some(Arc::new(RecordingSurface {
            calls: Arc::clone(&self.calls),
        }))
    }

    fn open_link(&self, url: &str) {
        self.record(DelegateCall::OpenLink(url.to_string()));
    }

    fn close(&self) {
        self.record(DelegateCall::Close);
    }

    fn open_screen(&self, screen_id: &str, html_page: &str) {
        self.record(DelegateCall::OpenScreen {
            screen_id: screen_id.to_string(),
            html_page: html_page.to_string(),
        });
    }

    fn purchase(&self, product_id: &str) {
        self.record(DelegateCall::Purchase(product_id.to_string()));
    }

    fn restore(&self) {
        self.record(DelegateCall::Restore);
    }

    fn on_error(&self, error: &AutomationError) {
        self.record(DelegateCall::Error(error.to_string()));
    }

    fn automation_flow_finished(&self, action: &Action) {
        self.record(DelegateCall::FlowFinished(action.clone()));
    }
}
