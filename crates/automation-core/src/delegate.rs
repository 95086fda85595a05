use std::sync::Arc;

use parking_lot::Mutex;

use crate::action::Action;
use crate::error::AutomationError;
use crate::types::DisplayRequest;

/// Host-side place where an automation screen gets rendered.
pub trait DisplaySurface: Send + Sync {
    /// Present `request`. The surface owns it from here on.
    fn show(&self, request: DisplayRequest);
}

/// Callback surface the host registers to receive action results and
/// screen-display requests.
///
/// Calls may arrive on any thread, including transport threads.
pub trait AutomationDelegate: Send + Sync {
    /// Surface for a screen picked by a push, or `None` if the host cannot
    /// show one right now.
    fn provide_display_surface(&self) -> Option<Arc<dyn DisplaySurface>>;

    fn open_link(&self, url: &str);

    fn close(&self);

    /// A screen reached by in-screen navigation.
    fn open_screen(&self, screen_id: &str, html_page: &str);

    fn purchase(&self, product_id: &str);

    fn restore(&self);

    fn on_error(&self, error: &AutomationError);

    fn automation_flow_finished(&self, _action: &Action) {}
}

// ---------------------------------------------------------------------------
// DelegateSlot
// ---------------------------------------------------------------------------

/// Single-slot delegate registration. Last writer wins.
///
/// Each get and set takes the lock on its own; readers get a cloned `Arc` and
/// call into the host without holding it.
#[derive(Default)]
pub struct DelegateSlot {
    slot: Mutex<Option<Arc<dyn AutomationDelegate>>>,
}

impl DelegateSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, delegate: Arc<dyn AutomationDelegate>) {
        *self.slot.lock() = Some(delegate);
    }

    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    pub fn get(&self) -> Option<Arc<dyn AutomationDelegate>> {
        self.slot.lock().clone()
    }

    pub fn is_bound(&self) -> bool {
        self.slot.lock().is_some()
    }
}
