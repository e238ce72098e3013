//! Word meanings: from (word, POS, category) to a term.
//!
//! A [`SemanticCategory`] is built in four steps:
//!
//! 1. classify the word into a [`SemanticType`], or a literal template;
//! 2. pick the rule for that type from the statement or question table;
//! 3. for stem rules, allocate variables over the indexed category and
//!    build the stem, forcing the head to `e` for events;
//! 4. check that the resulting term survives printing and parsing.
//!
//! ```rust
//! use ccgsem_nlp::category::{CategoryIndex, SyntacticCategory};
//! use ccgsem_nlp::classifier::{PatternTable, SpecialCaseTable};
//! use ccgsem_nlp::config::Configuration;
//! use ccgsem_nlp::semantics::SemanticCategory;
//!
//! let index = CategoryIndex::from_pairs(
//!     [("N/N", "(N{Y}/N{Y}<1>){_}")],
//!     CategoryIndex::default_replacements(),
//! );
//! let config = Configuration::new(index, SpecialCaseTable::default(), PatternTable::english().unwrap());
//! let category = SyntacticCategory::new("N/N", &config.categories);
//! let four = SemanticCategory::build(&config, "four", "CD", &category, false).unwrap();
//! assert_eq!(four.term.to_string(), r"\P y.(P(y) & COUNT(y,four))");
//! ```

use ccgsem_core::Term;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::category::SyntacticCategory;
use crate::classifier::{predicate_name, Classification, SemanticType};
use crate::combinator::check_syntax;
use crate::config::Configuration;
use crate::rules::Rule;
use crate::stem::Stem;
use crate::variables::VariableAssignment;
use crate::SemanticError;

/// Quantifier words have no term of their own.
pub const QUANTIFIER_WORDS: [&str; 5] = ["some", "exists", "exist", "all", "forall"];

/// The meaning of one word in one syntactic context.
#[derive(Debug, Clone, Serialize)]
pub struct SemanticCategory {
    pub word: String,
    pub pos: String,
    pub category: String,
    pub semantic_type: SemanticType,
    pub term: Term,
}

impl SemanticCategory {
    /// Build the meaning the classifier and rule tables give a word.
    pub fn build(
        config: &Configuration,
        word: &str,
        pos: &str,
        category: &SyntacticCategory,
        question: bool,
    ) -> Result<Self, SemanticError> {
        if category.indexed().is_none() {
            return Err(SemanticError::category(
                category.raw(),
                "no indexed form in the category table",
            ));
        }
        if QUANTIFIER_WORDS.contains(&word.to_lowercase().as_str()) {
            return Err(SemanticError::InvalidTerm {
                term: word.to_string(),
                reason: "quantifier words are not supported".to_string(),
            });
        }

        let classification = config
            .classify(word, pos, category.raw())
            .ok_or_else(|| SemanticError::UnknownSemanticType {
                word: word.to_string(),
                pos: pos.to_string(),
                category: category.raw().to_string(),
            })?;
        let name = predicate_name(word);

        let (semantic_type, term) = match classification {
            Classification::Literal(template) => {
                let term = Term::parse(&template.replace("{0}", &name))?;
                (SemanticType::SpecialCase, term)
            }
            Classification::Tag(semantic_type) => {
                let rule = config.rules.table(question).get(semantic_type).ok_or_else(|| {
                    SemanticError::MissingRule {
                        semantic_type: semantic_type.to_string(),
                    }
                })?;
                let term = match rule {
                    Rule::Fixed(form) => form(&name),
                    Rule::Extend(extend) => {
                        let mut assignment = VariableAssignment::allocate(category.tree()?)?;
                        if semantic_type == SemanticType::Event {
                            assignment = assignment.with_head("e");
                        }
                        extend(Stem::build(&assignment), &name)
                            .to_term()
                            .ok_or_else(|| SemanticError::EmptyStem {
                                category: category.raw().to_string(),
                            })?
                    }
                };
                (semantic_type, term)
            }
        };

        check_syntax(&term)?;
        Ok(Self {
            word: word.to_string(),
            pos: pos.to_string(),
            category: category.raw().to_string(),
            semantic_type,
            term,
        })
    }

    /// Every candidate meaning for a leaf.
    ///
    /// Lexicon entries for the word come first, then the built meaning.
    /// Only when neither exists are the lexicon's category templates tried.
    /// Alpha-equivalent duplicates are dropped; failures are logged.
    pub fn lexical_candidates(
        config: &Configuration,
        word: &str,
        pos: &str,
        category: &SyntacticCategory,
        question: bool,
    ) -> Vec<Self> {
        let explicit = |term: Term| Self {
            word: word.to_string(),
            pos: pos.to_string(),
            category: category.raw().to_string(),
            semantic_type: SemanticType::SpecialCase,
            term,
        };

        let mut candidates: Vec<Self> = config.lexicon.word(word).iter().cloned().map(explicit).collect();
        match Self::build(config, word, pos, category, question) {
            Ok(built) => candidates.push(built),
            Err(e) => debug!("No built meaning for '{}' ({}, {}): {}", word, pos, category, e),
        }
        if candidates.is_empty() {
            let key = config.categories.normalize(category.raw());
            for result in config.lexicon.category(&key, word) {
                match result {
                    Ok(term) => candidates.push(explicit(term)),
                    Err(e) => debug!("Bad category template for '{}': {}", key, e),
                }
            }
        }

        let mut unique: Vec<Self> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !unique.iter().any(|u| u.term == candidate.term) {
                unique.push(candidate);
            }
        }
        unique
    }
}

impl fmt::Display for SemanticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} [{}] {}",
            self.word, self.pos, self.category, self.semantic_type, self.term
        )
    }
}
