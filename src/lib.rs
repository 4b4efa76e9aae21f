//! WhatsBlast Library
//!
//! This library provides the core functionality for WhatsBlast: browsing a
//! list of sales prospects, filtering them by column, composing a message
//! template with `{{key}}` variable substitution, and producing pre-filled
//! WhatsApp chat links per prospect, with the already-contacted set
//! persisted across sessions.
//!
//! # Modules
//!
//! - `campaign`: Top-level coordinator and send workflow.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `links`: WhatsApp link construction and the opener seam.
//! - `models`: Source and local prospect schemas.
//! - `notifications`: Transient user notifications.
//! - `sources`: Prospect source collaborators.
//! - `state`: Key/value persistence with integrity validation.
//! - `store`: Prospect store, filtering and statistics.
//! - `template`: Placeholder interpolation engine.

pub mod campaign;
pub mod config;
pub mod errors;
pub mod links;
pub mod models;
pub mod notifications;
pub mod sources;
pub mod state;
pub mod store;
pub mod template;
