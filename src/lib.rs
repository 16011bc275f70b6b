#![forbid(unsafe_code)]

//! Deep-link resolution and focus-prompt cadence for the Go Deeper app.
//!
//! Both engines sit on top of an injected [`store::KeyValueStore`]; the
//! link resolver additionally drives an injected [`router::Router`].

pub mod cadence;
pub mod clock;
pub mod config;
pub mod errors;
pub mod links;
pub mod models;
pub mod router;
pub mod store;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
