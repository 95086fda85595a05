//! Push-to-screen delivery and in-screen action routing.
//!
//! A push flow walks `Idle → AwaitingActionPoint → AwaitingScreen → Delivered`
//! and drops back to idle on any absence or failure. The steps of one flow are
//! sequenced; separate pushes and action reports run independently.
//!
//! Entry points (`on_push_received`, `on_action_reported`) never block and never
//! fail: asynchronous work is spawned on the runtime handle supplied at
//! construction and its problems end up in the log or in the delegate's
//! `on_error`, never in the caller.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::action::{self, Action, ActionType, Command};
use crate::backend::Backend;
use crate::client::ScreenClient;
use crate::delegate::{AutomationDelegate, DelegateSlot};
use crate::store::KeyValueStore;
use crate::token::PushTokenTracker;
use crate::types::{DisplayRequest, PushPayload, ACTIVE_POINT_STATUS, SCREEN_VIEW_POINT_TYPE};
use crate::Result;

// ---------------------------------------------------------------------------
// PushFlowOutcome
// ---------------------------------------------------------------------------

/// Where a push flow stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushFlowOutcome {
    /// The backend listed no active action point.
    NoActionPoint,
    /// Listing action points failed.
    ActionPointUnavailable,
    /// The action point named a screen that could not be fetched.
    ScreenUnavailable { screen_id: String },
    /// No delegate was bound when the screen was ready.
    DelegateUnbound { screen_id: String },
    /// The delegate offered no display surface.
    NoDisplaySurface { screen_id: String },
    Delivered { screen_id: String },
}

impl PushFlowOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, PushFlowOutcome::Delivered { .. })
    }
}

impl fmt::Display for PushFlowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushFlowOutcome::NoActionPoint => write!(f, "no active action point"),
            PushFlowOutcome::ActionPointUnavailable => {
                write!(f, "failed to retrieve an action point")
            }
            PushFlowOutcome::ScreenUnavailable { screen_id } => {
                write!(f, "failed to load screen {screen_id}")
            }
            PushFlowOutcome::DelegateUnbound { screen_id } => {
                write!(f, "screen {screen_id} dropped: no delegate bound")
            }
            PushFlowOutcome::NoDisplaySurface { screen_id } => {
                write!(f, "screen {screen_id} dropped: no display surface")
            }
            PushFlowOutcome::Delivered { screen_id } => write!(f, "screen {screen_id} delivered"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// The automation engine. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

struct Inner {
    client: ScreenClient,
    tokens: PushTokenTracker,
    delegate: DelegateSlot,
    runtime: Handle,
}

impl Dispatcher {
    /// Build an engine over the given collaborators. Background work is
    /// spawned on `runtime`; the engine starts no threads of its own.
    pub fn new(backend: Arc<dyn Backend>, store: Arc<dyn KeyValueStore>, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                client: ScreenClient::new(Arc::clone(&backend), runtime.clone()),
                tokens: PushTokenTracker::new(store, backend, runtime.clone()),
                delegate: DelegateSlot::new(),
                runtime,
            }),
        }
    }

    // ---------------------------------------------------------------------
    // Delegate binding
    // ---------------------------------------------------------------------

    pub fn set_delegate(&self, delegate: Arc<dyn AutomationDelegate>) {
        self.inner.delegate.set(delegate);
    }

    pub fn clear_delegate(&self) {
        self.inner.delegate.clear();
    }

    pub fn has_delegate(&self) -> bool {
        self.inner.delegate.is_bound()
    }

    // ---------------------------------------------------------------------
    // Push handling
    // ---------------------------------------------------------------------

    /// Inspect an inbound push. A `pick_screen = "1"` marker starts the
    /// screen lookup in the background. Always returns `true`: every push
    /// counts as consumed, marked or not.
    pub fn on_push_received(&self, data: &HashMap<String, String>) -> bool {
        if PushPayload::from_map(data).pick_screen {
            debug!("automation push detected");
            let this = self.clone();
            self.inner.runtime.spawn(async move {
                let outcome = this.run_push_flow().await;
                debug!(outcome = %outcome, "push flow finished");
            });
        }
        true
    }

    /// Locate the active screen and hand it to the delegate's display surface.
    pub async fn run_push_flow(&self) -> PushFlowOutcome {
        let point = match self
            .inner
            .client
            .active_point(SCREEN_VIEW_POINT_TYPE, ACTIVE_POINT_STATUS)
            .await
        {
            Ok(Some(point)) => point,
            Ok(None) => {
                debug!("no active action point to show");
                return PushFlowOutcome::NoActionPoint;
            }
            Err(e) => {
                debug!(error = %e, "failed to retrieve a screen id to show");
                return PushFlowOutcome::ActionPointUnavailable;
            }
        };

        let screen_id = point.data.screen_id;
        debug!(screen_id = %screen_id, "screen found to show");

        match self.inner.client.screen(&screen_id).await {
            Ok(screen) => self.deliver(DisplayRequest::new(screen_id, screen.html_page)),
            Err(e) => {
                debug!(screen_id = %screen_id, error = %e, "failed to load screen");
                PushFlowOutcome::ScreenUnavailable { screen_id }
            }
        }
    }

    fn deliver(&self, request: DisplayRequest) -> PushFlowOutcome {
        let screen_id = request.screen_id.clone();
        let Some(delegate) = self.inner.delegate.get() else {
            warn!(
                screen_id = %screen_id,
                "no automation delegate is bound; call set_delegate() before handling pushes"
            );
            return PushFlowOutcome::DelegateUnbound { screen_id };
        };
        let Some(surface) = delegate.provide_display_surface() else {
            warn!(screen_id = %screen_id, "automation delegate provided no display surface");
            return PushFlowOutcome::NoDisplaySurface { screen_id };
        };

        info!(screen_id = %screen_id, "presenting automation screen");
        surface.show(request);
        PushFlowOutcome::Delivered { screen_id }
    }

    // ---------------------------------------------------------------------
    // Action handling
    // ---------------------------------------------------------------------

    /// Route an interaction reported by a displayed screen.
    ///
    /// Returns `false` when the string is not an automation URI (or names an
    /// unknown action) so the host's default link handling proceeds. Every
    /// recognized action returns `true`, including ones dropped for a missing
    /// payload.
    pub fn on_action_reported(&self, raw: &str) -> bool {
        let Some(action) = action::parse(raw) else {
            debug!(uri = %raw, "not an automation uri");
            return false;
        };
        if action.kind == ActionType::Unknown {
            debug!(uri = %raw, "unrecognized automation action");
            return false;
        }
        let Some(command) = action.command() else {
            debug!(action = %action.kind, "automation action without data dropped");
            return true;
        };

        self.execute(command);
        true
    }

    /// Run `command` to completion, awaiting the screen fetch for navigation.
    pub async fn perform(&self, command: Command) {
        match command {
            Command::Navigate(screen_id) => {
                let _ = self.navigate(&screen_id).await;
            }
            other => self.execute(other),
        }
    }

    /// Fetch `screen_id` and open it through the delegate. A failed fetch is
    /// reported to the delegate's `on_error` and returned.
    pub async fn navigate(&self, screen_id: &str) -> Result<()> {
        let result = self.inner.client.screen(screen_id).await;
        let delegate = self.inner.delegate.get();
        match result {
            Ok(screen) => {
                match delegate {
                    Some(d) => d.open_screen(screen_id, &screen.html_page),
                    None => warn!(screen_id, "navigation dropped: no automation delegate bound"),
                }
                Ok(())
            }
            Err(e) => {
                debug!(screen_id, error = %e, "navigation failed");
                match delegate {
                    Some(d) => d.on_error(&e),
                    None => warn!(screen_id, "navigation error dropped: no automation delegate bound"),
                }
                Err(e)
            }
        }
    }

    /// Navigation is spawned; every other command goes straight to the delegate.
    fn execute(&self, command: Command) {
        match (command, self.inner.delegate.get()) {
            (Command::Navigate(screen_id), _) => {
                let this = self.clone();
                self.inner.runtime.spawn(async move {
                    let _ = this.navigate(&screen_id).await;
                });
            }
            (command, None) => warn!(?command, "automation action dropped: no delegate bound"),
            (Command::OpenLink(url), Some(delegate)) => delegate.open_link(&url),
            (Command::Close, Some(delegate)) => delegate.close(),
            (Command::Purchase(product_id), Some(delegate)) => delegate.purchase(&product_id),
            (Command::Restore, Some(delegate)) => delegate.restore(),
        }
    }

    /// Report that `screen_id` was actually shown. Fire-and-forget.
    pub fn confirm_screen_view(&self, screen_id: &str) {
        self.inner.client.report_view(screen_id);
    }

    /// Awaitable form of [`confirm_screen_view`](Self::confirm_screen_view).
    pub async fn report_screen_view(&self, screen_id: &str) -> Result<()> {
        self.inner.client.report_view_now(screen_id).await
    }

    /// Forward the final action of an automation flow to the delegate.
    pub fn on_action_flow_finished(&self, action: &Action) {
        if let Some(delegate) = self.inner.delegate.get() {
            delegate.automation_flow_finished(action);
        }
    }

    // ---------------------------------------------------------------------
    // Push token
    // ---------------------------------------------------------------------

    /// Record the device push token. Returns `true` when a new value was
    /// registered; storage failures are logged and reported as `false`.
    pub fn set_push_token(&self, token: &str) -> bool {
        match self.inner.tokens.set_token(token) {
            Ok(updated) => updated,
            Err(e) => {
                warn!(error = %e, "failed to persist push token");
                false
            }
        }
    }

    /// Record the push token and wait for the backend registration.
    pub async fn register_push_token(&self, token: &str) -> Result<bool> {
        self.inner.tokens.set_token_and_wait(token).await
    }

    pub fn push_token(&self) -> Option<String> {
        self.inner.tokens.token()
    }
}
