//! `automation-http`: REST implementation of the automation engine's
//! [`Backend`](automation_core::Backend) collaborator.

pub mod backend;
pub mod config;
pub mod error;

pub use backend::HttpBackend;
pub use config::BackendConfig;
pub use error::HttpError;
