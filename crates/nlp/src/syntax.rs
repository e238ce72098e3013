//! CCG syntax trees, as handed over by a parser.
//!
//! Trees serialize to JSON with a `node` tag, so an external parser can
//! produce them in any language:
//!
//! ```json
//! {"node": "binary", "category": "S", "rule": "<",
//!  "left":  {"node": "leaf", "word": "Reagan", "pos": "NNP", "category": "N"},
//!  "right": {"node": "leaf", "word": "won", "pos": "VBD", "category": "S\\N"}}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combinator::CombinatorRule;
use crate::SemanticError;

/// A node of a CCG derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum SyntaxTree {
    /// A word with its POS tag and lexical category.
    Leaf {
        word: String,
        pos: String,
        category: String,
    },
    /// A unary rule: lexical rules, type-raising.
    Unary {
        category: String,
        rule: String,
        child: Box<SyntaxTree>,
    },
    /// A binary combinator.
    Binary {
        category: String,
        rule: String,
        left: Box<SyntaxTree>,
        right: Box<SyntaxTree>,
    },
}

impl SyntaxTree {
    pub fn leaf(word: impl Into<String>, pos: impl Into<String>, category: impl Into<String>) -> Self {
        SyntaxTree::Leaf {
            word: word.into(),
            pos: pos.into(),
            category: category.into(),
        }
    }

    pub fn unary(category: impl Into<String>, rule: impl Into<String>, child: SyntaxTree) -> Self {
        SyntaxTree::Unary {
            category: category.into(),
            rule: rule.into(),
            child: Box::new(child),
        }
    }

    pub fn binary(
        category: impl Into<String>,
        rule: impl Into<String>,
        left: SyntaxTree,
        right: SyntaxTree,
    ) -> Self {
        SyntaxTree::Binary {
            category: category.into(),
            rule: rule.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn category(&self) -> &str {
        match self {
            SyntaxTree::Leaf { category, .. }
            | SyntaxTree::Unary { category, .. }
            | SyntaxTree::Binary { category, .. } => category,
        }
    }

    /// Words of the leaves, left to right.
    pub fn words(&self) -> Vec<&str> {
        match self {
            SyntaxTree::Leaf { word, .. } => vec![word.as_str()],
            SyntaxTree::Unary { child, .. } => child.words(),
            SyntaxTree::Binary { left, right, .. } => {
                let mut words = left.words();
                words.extend(right.words());
                words
            }
        }
    }

    /// Check that every field is present and every binary rule is known.
    pub fn validate(&self) -> Result<(), SemanticError> {
        let malformed = |reason: String| SemanticError::MalformedTree { reason };
        if self.category().trim().is_empty() {
            return Err(malformed("node with an empty category".to_string()));
        }
        match self {
            SyntaxTree::Leaf { word, pos, category } => {
                if word.is_empty() || pos.is_empty() {
                    return Err(malformed(format!("leaf '{}' missing word or POS", category)));
                }
                Ok(())
            }
            SyntaxTree::Unary { child, .. } => child.validate(),
            SyntaxTree::Binary {
                rule, left, right, ..
            } => {
                rule.parse::<CombinatorRule>()?;
                left.validate()?;
                right.validate()
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SemanticError> {
        serde_json::from_str(json).map_err(|e| SemanticError::MalformedTree {
            reason: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, SemanticError> {
        serde_json::to_string(self).map_err(|e| SemanticError::MalformedTree {
            reason: e.to_string(),
        })
    }
}

/// Bracketed form: `(S < (N Reagan/NNP) (S\N won/VBD))`.
impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxTree::Leaf {
                word,
                pos,
                category,
            } => write!(f, "({} {}/{})", category, word, pos),
            SyntaxTree::Unary {
                category,
                rule,
                child,
            } => write!(f, "({} {} {})", category, rule, child),
            SyntaxTree::Binary {
                category,
                rule,
                left,
                right,
            } => write!(f, "({} {} {} {})", category, rule, left, right),
        }
    }
}
