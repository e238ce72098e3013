//! Error types for semantic composition.

use ccgsem_core::TermError;
use thiserror::Error;

/// Errors that can occur while building or composing word meanings.
///
/// Most variants are *local*: they concern one candidate at one node of a
/// derivation and are absorbed there. Only [`SemanticError::MalformedTree`]
/// and [`SemanticError::Config`] abort a parse, and both are raised before
/// composition starts.
#[derive(Debug, Clone, Error)]
pub enum SemanticError {
    /// Category string is malformed, unmapped, or exhausts the predicate pool.
    #[error("Cannot parse category '{category}': {reason}")]
    CategoryParse { category: String, reason: String },

    /// No special case or pattern classifies this word.
    #[error("No semantic type for '{word}' ({pos}, {category})")]
    UnknownSemanticType {
        word: String,
        pos: String,
        category: String,
    },

    /// A generated term failed validation.
    #[error("Invalid term '{term}': {reason}")]
    InvalidTerm { term: String, reason: String },

    /// The active rule table has no entry for this semantic type.
    #[error("No rule for semantic type {semantic_type}")]
    MissingRule { semantic_type: String },

    /// An atomic category has no predicate structure to build a term from.
    #[error("Category '{category}' yields an empty stem")]
    EmptyStem { category: String },

    /// Parsing or reducing a term failed.
    #[error(transparent)]
    Term(#[from] TermError),

    /// The syntax tree handed to the composer is not well-formed.
    #[error("Malformed syntax tree: {reason}")]
    MalformedTree { reason: String },

    /// Configuration could not be loaded.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SemanticError {
    /// True for failures that drop one candidate and nothing else.
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            SemanticError::MalformedTree { .. } | SemanticError::Config { .. }
        )
    }

    pub(crate) fn category(category: impl Into<String>, reason: impl Into<String>) -> Self {
        SemanticError::CategoryParse {
            category: category.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        SemanticError::Config {
            message: message.into(),
        }
    }
}
