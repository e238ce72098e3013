//! Semantic-type rules.
//!
//! Each semantic type maps to a rule that turns a word (and, for most
//! types, the stem of its category) into its final term. Statements and
//! questions use separate tables: in a question `is` becomes `\P x.P(x)`
//! and wh-words mark their referent with `TARGET`.

use ccgsem_core::Term;
use std::collections::HashMap;

use crate::classifier::SemanticType;
use crate::stem::Stem;

/// How a rule builds its term.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Extend the category's stem with more conjuncts.
    Extend(fn(Stem, &str) -> Stem),
    /// Produce a fixed form; the category is ignored.
    Fixed(fn(&str) -> Term),
}

/// Semantic type to rule.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<SemanticType, Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, semantic_type: SemanticType, rule: Rule) {
        self.rules.insert(semantic_type, rule);
    }

    pub fn get(&self, semantic_type: SemanticType) -> Option<Rule> {
        self.rules.get(&semantic_type).copied()
    }

    pub fn contains(&self, semantic_type: SemanticType) -> bool {
        self.rules.contains_key(&semantic_type)
    }

    /// Rules for declarative sentences.
    pub fn statement() -> Self {
        let mut table = Self::new();
        table.insert(SemanticType::Event, Rule::Extend(event));
        table.insert(SemanticType::Mod, Rule::Extend(modifier));
        table.insert(SemanticType::Count, Rule::Extend(count));
        table.insert(SemanticType::Negate, Rule::Extend(negate));
        table.insert(SemanticType::Complement, Rule::Extend(complement));
        table.insert(SemanticType::Unique, Rule::Extend(unique));
        table.insert(SemanticType::Type, Rule::Fixed(kind));
        table.insert(SemanticType::Entity, Rule::Fixed(entity));
        table.insert(SemanticType::Conj, Rule::Fixed(conjunction));
        table.insert(SemanticType::Indef, Rule::Fixed(identity));
        table.insert(SemanticType::Copula, Rule::Fixed(identity));
        table
    }

    /// Rules for questions: the statement rules plus wh-words, with a
    /// contentful copula.
    pub fn question() -> Self {
        let mut table = Self::statement();
        table.insert(SemanticType::Copula, Rule::Fixed(copula_question));
        table.insert(SemanticType::Question, Rule::Extend(question));
        table.insert(SemanticType::EntQuestion, Rule::Fixed(entity_question));
        table
    }
}

/// The statement and question tables.
#[derive(Debug, Clone)]
pub struct RuleLibrary {
    pub statement: RuleTable,
    pub question: RuleTable,
}

impl RuleLibrary {
    pub fn new(statement: RuleTable, question: RuleTable) -> Self {
        Self {
            statement,
            question,
        }
    }

    pub fn table(&self, question: bool) -> &RuleTable {
        if question {
            &self.question
        } else {
            &self.statement
        }
    }
}

impl Default for RuleLibrary {
    fn default() -> Self {
        Self::new(RuleTable::statement(), RuleTable::question())
    }
}

// ============================================================================
// Stem rules
// ============================================================================

fn unary(predicate: &str, argument: &str) -> Term {
    Term::app(Term::constant(predicate), Term::var(argument))
}

/// `{word}:{i}(e, v_i)` for each role variable, numbered from 1.
fn event(stem: Stem, word: &str) -> Stem {
    let head = stem.head().to_string();
    let roles: Vec<String> = stem
        .role_variables()
        .into_iter()
        .map(str::to_string)
        .collect();
    roles
        .into_iter()
        .enumerate()
        .fold(stem, |stem, (i, role)| {
            let predicate = Term::constant(format!("{}:{}", word, i + 1));
            stem.conjoin(Term::app_all(predicate, [Term::var(head.clone()), Term::var(role)]))
        })
}

fn modifier(stem: Stem, word: &str) -> Stem {
    let atom = unary(word, stem.head());
    stem.conjoin(atom)
}

fn count(stem: Stem, word: &str) -> Stem {
    let atom = Term::app_all(
        Term::constant("COUNT"),
        [Term::var(stem.head()), Term::constant(word)],
    );
    stem.conjoin(atom)
}

fn negate(stem: Stem, _word: &str) -> Stem {
    let atom = unary("NEGATION", stem.head());
    stem.conjoin(atom)
}

fn complement(stem: Stem, _word: &str) -> Stem {
    let atom = unary("COMPLEMENT", stem.head());
    stem.conjoin(atom)
}

fn unique(stem: Stem, _word: &str) -> Stem {
    let atom = unary("UNIQUE", stem.head());
    stem.conjoin(atom)
}

/// `TARGET(v)` for every existential, or for the head when there are none.
fn question(stem: Stem, _word: &str) -> Stem {
    let targets: Vec<String> = if stem.existentials().is_empty() {
        vec![stem.head().to_string()]
    } else {
        stem.existentials().to_vec()
    };
    targets
        .iter()
        .fold(stem, |stem, v| stem.conjoin(unary("TARGET", v)))
}

// ============================================================================
// Fixed forms
// ============================================================================

/// `\x.{word}(x)`
fn kind(word: &str) -> Term {
    Term::lambda("x", unary(word, "x"))
}

/// `\x.EQUAL(x,{word})`
fn entity(word: &str) -> Term {
    Term::lambda(
        "x",
        Term::app_all(Term::constant("EQUAL"), [Term::var("x"), Term::constant(word)]),
    )
}

/// `\P Q x.(P(x) & Q(x))`
fn conjunction(_word: &str) -> Term {
    Term::lambdas(
        ["P", "Q", "x"],
        Term::and(
            Term::app(Term::var("P"), Term::var("x")),
            Term::app(Term::var("Q"), Term::var("x")),
        ),
    )
}

fn identity(_word: &str) -> Term {
    Term::identity()
}

/// `\P x.P(x)`
fn copula_question(_word: &str) -> Term {
    Term::lambdas(["P", "x"], Term::app(Term::var("P"), Term::var("x")))
}

/// `\P.exists x.(P(x) & TARGET(x))`
fn entity_question(_word: &str) -> Term {
    Term::lambda(
        "P",
        Term::exists(
            "x",
            Term::and(
                Term::app(Term::var("P"), Term::var("x")),
                unary("TARGET", "x"),
            ),
        ),
    )
}
