//! Grok image generator service library.
//!
//! Exposes the building blocks (config, state, error handling, routes, CLI
//! and console modes) so integration tests and the `grokgen` binary can both
//! access them.

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod state;
