use std::sync::Arc;

use automation_core::{Action, AutomationDelegate, AutomationError, DisplayRequest, DisplaySurface};
use parking_lot::Mutex;
use serde::Serialize;

/// A delegate callback as observed by the console host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    Show { screen_id: String, html_page: String },
    OpenLink { url: String },
    Close,
    OpenScreen { screen_id: String, html_page: String },
    Purchase { product_id: String },
    Restore,
    Error { message: String },
    FlowFinished { action: Action },
}

impl HostEvent {
    pub fn describe(&self) -> String {
        match self {
            HostEvent::Show { screen_id, html_page } => {
                format!("show screen {screen_id} ({} bytes)", html_page.len())
            }
            HostEvent::OpenLink { url } => format!("open link {url}"),
            HostEvent::Close => "close".to_string(),
            HostEvent::OpenScreen { screen_id, html_page } => {
                format!("open screen {screen_id} ({} bytes)", html_page.len())
            }
            HostEvent::Purchase { product_id } => format!("purchase {product_id}"),
            HostEvent::Restore => "restore".to_string(),
            HostEvent::Error { message } => format!("error: {message}"),
            HostEvent::FlowFinished { action } => format!("flow finished: {}", action.kind),
        }
    }
}

type EventLog = Arc<Mutex<Vec<HostEvent>>>;

// ---------------------------------------------------------------------------
// ConsoleHost
// ---------------------------------------------------------------------------

/// Delegate that records every callback so a command can print them after
/// the engine work completes.
#[derive(Default)]
pub struct ConsoleHost {
    events: EventLog,
}

impl ConsoleHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().clone()
    }

    fn record(&self, event: HostEvent) {
        self.events.lock().push(event);
    }
}

struct ConsoleSurface {
    events: EventLog,
}

impl DisplaySurface for ConsoleSurface {
    fn show(&self, request: DisplayRequest) {
        self.events.lock().push(HostEvent::Show {
            screen_id: request.screen_id,
            html_page: request.html_page,
        });
    }
}

impl AutomationDelegate for ConsoleHost {
    fn provide_display_surface(&self) -> Option<Arc<dyn DisplaySurface>> {
        Some(Arc::new(ConsoleSurface {
            events: Arc::clone(&self.events),
        }))
    }

    fn open_link(&self, url: &str) {
        self.record(HostEvent::OpenLink { url: url.to_string() });
    }

    fn close(&self) {
        self.record(HostEvent::Close);
    }

    fn open_screen(&self, screen_id: &str, html_page: &str) {
        self.record(HostEvent::OpenScreen {
            screen_id: screen_id.to_string(),
            html_page: html_page.to_string(),
        });
    }

    fn purchase(&self, product_id: &str) {
        self.record(HostEvent::Purchase {
            product_id: product_id.to_string(),
        });
    }

    fn restore(&self) {
        self.record(HostEvent::Restore);
    }

    fn on_error(&self, error: &AutomationError) {
        self.record(HostEvent::Error {
            message: error.to_string(),
        });
    }

    fn automation_flow_finished(&self, action: &Action) {
        self.record(HostEvent::FlowFinished {
            action: action.clone(),
        });
    }
}
