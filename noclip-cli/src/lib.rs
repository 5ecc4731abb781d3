//! The noclip client: stores clips on a noclip server and copies your
//! friends' clips to the local clipboard.

pub mod api;
pub mod args;
pub mod clipboard;
pub mod commands;
pub mod config;

use thiserror::Error;

/// A problem with how the client was invoked, rather than with the server
#[derive(Debug, Error)]
#[error("{0}")]
pub struct UsageError(pub String);
