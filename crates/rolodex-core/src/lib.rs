//! rolodex-core library.
//!
//! Everything here is independent of the terminal: the contact model and its
//! tag codec, the filter engine, the pure view reconciler, the REST client
//! and configuration loading.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at the crate boundary, each mapped to
//!   an [`error::ErrorCode`]; the CLI wraps them in `anyhow`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod view;
