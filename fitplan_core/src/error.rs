//! Error type shared by every fitplan_core operation.
//!
//! Solver misses are not errors; see [`crate::solver::SolveFailure`].

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Plan document, profile or generation record (de)serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Config or profile file parse failure
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more required biometric fields are missing
    #[error("Profile incomplete: missing {}", .missing.join(", "))]
    IncompleteProfile { missing: Vec<&'static str> },

    /// A biometric field is present but out of range
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Static food or exercise data is inconsistent
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    /// Meal slot name could not be parsed
    #[error("Unknown meal slot: {0}")]
    UnknownMealSlot(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
