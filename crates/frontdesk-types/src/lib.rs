//! # frontdesk-types
//!
//! Shared types for the Frontdesk assistant workspace.
//!
//! ## Modules
//! - `config`: Layered settings (defaults -> config file -> env -> CLI flags)
//! - `error`: Error type shared by configuration consumers

pub mod config;
pub mod error;

pub use config::{IndexBackend, Settings, VectorSettings};
pub use error::FrontdeskError;
