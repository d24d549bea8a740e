//! HTTP request handlers for the helpdesk web server

pub mod chat;
pub mod health;
pub mod tickets;
pub mod types;

pub use chat::*;
pub use health::*;
pub use tickets::*;

pub use types::*;
