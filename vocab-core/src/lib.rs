//! vocab-core — builds a business-rules vocabulary model from a type
//! descriptor document and persists it as an `.ecore` file.
//!
//! The pipeline is a one-way flow: descriptor document → type filter →
//! property classifier → association resolver → model sink. Classes become
//! entities, properties become attributes or associations, enumerations
//! become enumerated data types.

pub mod classify;
pub mod config;
pub mod descriptor;
pub mod ecore;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod resolve;
pub mod sink;

pub use error::{DescriptorError, EmitError, VocabError};
pub use pipeline::{generate, GenerateOptions};
