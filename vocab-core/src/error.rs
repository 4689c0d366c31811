//! Error types for the vocabulary generator, using thiserror for proper
//! error chains. `anyhow` is used only at the CLI boundary.

use thiserror::Error;

/// Top-level error for the generation pipeline.
#[derive(Error, Debug)]
pub enum VocabError {
    #[error("descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("emit error: {0}")]
    Emit(#[from] EmitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("format error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Errors loading or resolving descriptor documents.
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("unsupported descriptor extension for '{path}' (expected .json, .yaml, or .yml)")]
    UnsupportedExtension { path: String },

    #[error("imported module '{module}' not found in '{dir}'")]
    ModuleNotFound { module: String, dir: String },
}

/// Invariant violations reported by a vocabulary sink.
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("duplicate enumerated data type '{0}'")]
    DuplicateEnumType(String),

    #[error("duplicate entity '{0}'")]
    DuplicateEntity(String),

    #[error("attribute '{entity}.{attribute}' references unregistered enumerated data type '{enum_type}'")]
    UnknownEnumType {
        entity: String,
        attribute: String,
        enum_type: String,
    },

    #[error("association endpoint '{0}' is not a registered entity")]
    UnknownEntity(String),
}
