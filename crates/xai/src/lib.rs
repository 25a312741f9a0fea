//! REST client for the xAI image-generation API.
//!
//! The endpoint is OpenAI-compatible (`POST /images/generations`). The
//! client plugs into the generator through
//! [`grokgen_core::provider::ImageProvider`].

pub mod api;
pub mod config;
pub mod models;
pub mod provider;
