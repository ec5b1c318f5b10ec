//! Client for the corporate messaging platform's application API.
//!
//! A [`WeComClient`] authenticates with a corp id / secret pair, caches the
//! short-lived access token, and uses it to send messages, resolve user ids
//! and upload temporary media.

mod client;
pub mod config;
pub mod errors;
pub mod media;
pub mod message;
pub mod telemetry;
pub mod token;
pub mod types;

pub use client::WeComClient;
pub use config::{Config, ConfigLocation, read_config};
pub use errors::{AuthError, Error, ValidationError};
pub use media::MediaKind;
pub use message::{Message, MessageContent};
pub use types::{SendMessageResponse, UploadMediaResponse};

#[cfg(test)]
mod tests;
