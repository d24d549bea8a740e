//! Helpdesk Core - shared configuration, error taxonomy, logging and data types
//!
//! Every other crate in the workspace builds on the definitions here.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
