//! The composition walk.
//!
//! [`Composer::compose`] walks a syntax tree bottom-up:
//!
//! - a leaf gets every candidate meaning of its word;
//! - a unary node passes its child's candidates through;
//! - a binary node combines every left candidate with every right
//!   candidate using the node's combinator.
//!
//! A candidate that fails anywhere is dropped and logged; its siblings
//! carry on. The result is every derivation that survives to the root,
//! possibly none.
//!
//! A composer is one session: it caches categories and leaf meanings for
//! the trees it composes, and should not outlive its configuration.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

use crate::category::SyntacticCategory;
use crate::combinator::{is_type_raising, CombinatorRule};
use crate::config::Configuration;
use crate::derivation::Derivation;
use crate::semantics::SemanticCategory;
use crate::syntax::SyntaxTree;
use crate::SemanticError;

type LexicalKey = (String, String, String, bool);

/// Composes syntax trees into derivations.
pub struct Composer<'c> {
    config: &'c Configuration,
    categories: RefCell<HashMap<String, Rc<SyntacticCategory>>>,
    lexical: RefCell<HashMap<LexicalKey, Rc<Vec<SemanticCategory>>>>,
}

impl<'c> Composer<'c> {
    pub fn new(config: &'c Configuration) -> Self {
        Self {
            config,
            categories: RefCell::new(HashMap::new()),
            lexical: RefCell::new(HashMap::new()),
        }
    }

    /// All derivations of `tree`.
    ///
    /// Only an unknown binary rule is an error; everything else that goes
    /// wrong removes candidates instead.
    pub fn compose(&self, tree: &SyntaxTree, question: bool) -> Result<Vec<Derivation>, SemanticError> {
        match tree {
            SyntaxTree::Leaf {
                word,
                pos,
                category,
            } => Ok(self
                .leaf_candidates(word, pos, category, question)
                .iter()
                .map(|c| {
                    Derivation::leaf(word, pos, category, c.semantic_type, c.term.clone())
                })
                .collect()),
            SyntaxTree::Unary {
                category,
                rule,
                child,
            } => {
                if is_type_raising(rule) {
                    debug!("Type-raising '{}' to {} leaves the meaning unchanged", rule, category);
                }
                Ok(self
                    .compose(child, question)?
                    .into_iter()
                    .map(|d| Derivation::unary(category, rule, d))
                    .collect())
            }
            SyntaxTree::Binary {
                category,
                rule,
                left,
                right,
            } => {
                let combinator: CombinatorRule = rule.parse()?;
                let lefts = self.compose(left, question)?;
                let rights = self.compose(right, question)?;

                let mut out = Vec::new();
                for l in &lefts {
                    for r in &rights {
                        match combinator.combine(&l.term, &r.term) {
                            Ok(term) => out.push(Derivation::binary(
                                category,
                                rule,
                                term,
                                l.clone(),
                                r.clone(),
                            )),
                            Err(e) => debug!(
                                "Dropped {} {} {} at {}: {}",
                                l.term, rule, r.term, category, e
                            ),
                        }
                    }
                }
                if out.is_empty() && !lefts.is_empty() && !rights.is_empty() {
                    debug!("No combination survived at {} ({})", category, rule);
                }
                Ok(out)
            }
        }
    }

    fn category(&self, raw: &str) -> Rc<SyntacticCategory> {
        self.categories
            .borrow_mut()
            .entry(raw.to_string())
            .or_insert_with(|| Rc::new(SyntacticCategory::new(raw, &self.config.categories)))
            .clone()
    }

    fn leaf_candidates(
        &self,
        word: &str,
        pos: &str,
        raw: &str,
        question: bool,
    ) -> Rc<Vec<SemanticCategory>> {
        let key = (word.to_string(), pos.to_string(), raw.to_string(), question);
        if let Some(cached) = self.lexical.borrow().get(&key) {
            return Rc::clone(cached);
        }
        let category = self.category(raw);
        let candidates = Rc::new(SemanticCategory::lexical_candidates(
            self.config,
            word,
            pos,
            &category,
            question,
        ));
        if candidates.is_empty() {
            debug!("No meaning for '{}' ({}, {})", word, pos, raw);
        }
        self.lexical.borrow_mut().insert(key, Rc::clone(&candidates));
        candidates
    }

    /// Number of distinct categories and leaf meanings cached so far.
    pub fn cache_sizes(&self) -> (usize, usize) {
        (self.categories.borrow().len(), self.lexical.borrow().len())
    }
}
