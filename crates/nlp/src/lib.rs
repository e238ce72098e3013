//! # CCG Semantics - From Derivations to Logical Forms
//!
//! This crate turns CCG derivations into Neo-Davidsonian logical forms.
//! Every word gets a lambda term determined by its syntactic category and
//! its semantic type; the derivation's combinators then put the terms
//! together.
//!
//! ## Pipeline
//!
//! ```text
//! category  ──index──▶ indexed category ──parse──▶ category tree
//!                                                        │ allocate
//!                                                        ▼
//! word, POS ──classify──▶ semantic type ──rule──▶ stem + conjuncts ──▶ term
//!                                                                        │
//! syntax tree ──────────────────── compose (>, <, >B, <B, >S, <S) ◀──────┘
//!                                        │
//!                                        ▼
//!                                   derivations
//! ```
//!
//! ## Example: "Reagan won"
//!
//! ```rust
//! use ccgsem_nlp::{CategoryIndex, Composer, Configuration, PatternTable, SpecialCaseTable, SyntaxTree};
//!
//! let index = CategoryIndex::from_pairs(
//!     [("N", "N{_}"), ("S\\NP", "(S{_}\\NP{Y}<1>){_}")],
//!     CategoryIndex::default_replacements(),
//! );
//! let config = Configuration::new(index, SpecialCaseTable::default(), PatternTable::english().unwrap());
//!
//! let tree = SyntaxTree::binary(
//!     "S",
//!     "<",
//!     SyntaxTree::leaf("Reagan", "NNP", "N"),
//!     SyntaxTree::leaf("won", "VBD", "S\\NP"),
//! );
//! let derivations = Composer::new(&config).compose(&tree, false).unwrap();
//! assert_eq!(
//!     derivations[0].expression().to_string(),
//!     "\\e.exists y.(EQUAL(y,reagan) & won:1(e,y))"
//! );
//! ```

pub mod category;
pub mod classifier;
pub mod combinator;
pub mod composer;
pub mod config;
pub mod derivation;
mod error;
pub mod lexicon;
pub mod parser;
pub mod rules;
pub mod semantics;
pub mod stem;
pub mod syntax;
pub mod variables;

pub use category::{CategoryIndex, CategoryTree, SyntacticCategory};
pub use classifier::{
    Classification, Classifier, PatternTable, SemanticType, SpecialCase, SpecialCaseTable,
};
pub use combinator::CombinatorRule;
pub use composer::Composer;
pub use config::{Configuration, EngineSettings};
pub use derivation::{Derivation, DerivationNode};
pub use error::SemanticError;
pub use lexicon::PredicateLexicon;
pub use parser::{CcgParser, SemanticParse, SemanticParser, TaggedToken};
pub use rules::{Rule, RuleLibrary, RuleTable};
pub use semantics::SemanticCategory;
pub use stem::Stem;
pub use syntax::SyntaxTree;
pub use variables::{Argument, VariableAssignment};
