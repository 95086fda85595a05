//! `automation-core`: push-triggered automation screens and in-screen action
//! routing.
//!
//! ```text
//! push payload ──▶ Dispatcher::on_push_received
//!                      │  pick_screen == "1"
//!                      ▼
//!                  ScreenClient::active_point ──▶ ScreenClient::screen
//!                      │
//!                      ▼
//!                  AutomationDelegate::provide_display_surface ──▶ DisplaySurface::show
//!
//! screen tap URI ──▶ Dispatcher::on_action_reported ──▶ action::parse ──▶ delegate
//! ```
//!
//! Transport and storage stay outside: plug them in through [`Backend`] and
//! [`KeyValueStore`].

pub mod action;
pub mod backend;
pub mod client;
pub mod delegate;
pub mod dispatcher;
pub mod error;
pub mod store;
pub mod token;
pub mod types;

#[cfg(test)]
mod test_support;

pub use action::{Action, ActionType, Command};
pub use backend::Backend;
pub use client::ScreenClient;
pub use delegate::{AutomationDelegate, DelegateSlot, DisplaySurface};
pub use dispatcher::{Dispatcher, PushFlowOutcome};
pub use error::{AutomationError, Result};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use token::{PushTokenTracker, PUSH_TOKEN_KEY};
pub use types::{ActionPoint, DisplayRequest, PushPayload, Screen};
