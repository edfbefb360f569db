//! Error types for eqref

use crate::domain::equations::UnresolvedReference;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the eqref application
#[derive(Debug, Error)]
pub enum EqrefError {
    #[error("Not an eqref project: {0}")]
    NotProjectDirectory(PathBuf),

    #[error("Duplicate equation identifier: {id}")]
    DuplicateIdentifier { id: String },

    #[error("{} unresolved cross-reference(s)", .0.len())]
    UnresolvedReferences(Vec<UnresolvedReference>),

    #[error("Malformed tag \"{tag}\" on equation {id}: {reason}")]
    MalformedTag {
        id: String,
        tag: String,
        reason: String,
    },

    #[error("{0} document(s) failed validation")]
    ValidationFailed(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl EqrefError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            EqrefError::NotProjectDirectory(_) => 2,
            EqrefError::DuplicateIdentifier { .. } => 3,
            EqrefError::UnresolvedReferences(_) => 4,
            EqrefError::MalformedTag { .. } => 5,
            EqrefError::ValidationFailed(_) => 6,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            EqrefError::NotProjectDirectory(path) => {
                format!(
                    "Not an eqref project: {}\n\n\
                    Suggestions:\n\
                    • Run 'eqref init' in this directory to create a project\n\
                    • Navigate to an existing eqref project\n\
                    • Set EQREF_ROOT environment variable to your project path",
                    path.display()
                )
            }
            EqrefError::DuplicateIdentifier { id } => {
                format!(
                    "Duplicate equation identifier: {}\n\n\
                    Each equation label must be unique within a document.\n\
                    Rename one of the conflicting labels, e.g. {{#{}-2}}",
                    id, id
                )
            }
            EqrefError::UnresolvedReferences(refs) => {
                let mut msg = format!("{} unresolved cross-reference(s):\n", refs.len());
                for r in refs {
                    msg.push_str(&format!("  {}\n", r));
                }
                msg.push_str(
                    "\nSuggestions:\n\
                    • Check the reference spelling against the equation labels\n\
                    • Equations must be declared with an attribute block, e.g.\n\
                    \x20 $$ a^2 + b^2 = c^2 $$ {#eq-pythag}\n\
                    • Use 'eqref list' to see all labeled equations",
                );
                msg
            }
            EqrefError::MalformedTag { id, tag, reason } => {
                format!(
                    "Malformed tag \"{}\" on equation {}: {}\n\n\
                    Valid tags:\n\
                    • Plain text: tag=\"Condition\"\n\
                    • LaTeX symbols: tag=\"\\star\", tag=\"\\dagger\", tag=\"\\star\\star\"\n\
                    Do not include $ delimiters; they are added automatically",
                    tag, id, reason
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using EqrefError
pub type Result<T> = std::result::Result<T, EqrefError>;
