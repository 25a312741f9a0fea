//! Domain layer for the Grok image generator.
//!
//! Holds the generation options and result types, the filename convention
//! for saved images, the local image store, the provider seam implemented by
//! remote image APIs, and the generator that ties them together.

pub mod error;
pub mod generation;
pub mod generator;
pub mod naming;
pub mod provider;
pub mod session;
pub mod storage;
pub mod types;
