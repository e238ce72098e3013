//! # Terms - Lambda Calculus with Conjunction and Existentials
//!
//! A [`Term`] is the algebraic form of a logical expression such as
//! `\P Q e.exists z y.(P(z) & Q(y) & won:1(e,y))`. Meanings are built by
//! constructing and combining these values; nothing is ever spliced as text.
//!
//! ## Naming Conventions
//!
//! Whether an identifier is a variable or a constant is decided by its
//! spelling, following the conventions of the NLTK logic package:
//!
//! | Spelling        | Kind                 | Examples           |
//! |-----------------|----------------------|--------------------|
//! | `[a-df-z][0-9]*`| individual variable  | `x`, `y`, `z1`     |
//! | `e[0-9]*`       | event variable       | `e`, `e2`          |
//! | `[A-Z][0-9]*`   | function variable    | `P`, `Q`, `C1`     |
//! | anything else   | constant             | `EQUAL`, `won:1`   |
//!
//! ## Printing
//!
//! `Display` produces the canonical string form: consecutive binders merge
//! (`\P Q e.`), applications uncurry (`COUNT(y,four)`), conjunctions are
//! parenthesized and flattened (`(a & b & c)`).
//!
//! ```rust
//! use ccgsem_core::Term;
//!
//! let body = Term::and(
//!     Term::app(Term::var("P"), Term::var("y")),
//!     Term::app(Term::constant("successful"), Term::var("y")),
//! );
//! let modifier = Term::lambdas(["P", "y"], body);
//! assert_eq!(modifier.to_string(), "\\P y.(P(y) & successful(y))");
//! ```

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Name of the constant used as the identity element of composition.
pub const IDENTITY: &str = "None";

/// The kind of a variable, read off its spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// Ranges over entities (`x`, `y`, `z1`).
    Individual,
    /// Ranges over events (`e`, `e1`).
    Event,
    /// Ranges over predicates (`P`, `Q`).
    Function,
}

impl VariableKind {
    /// Classify an identifier. Returns `None` for constants.
    pub fn of(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let first = chars.next()?;
        if !chars.all(|c| c.is_ascii_digit()) {
            return None;
        }
        match first {
            'e' => Some(VariableKind::Event),
            'a'..='z' => Some(VariableKind::Individual),
            'A'..='Z' => Some(VariableKind::Function),
            _ => None,
        }
    }

    /// Individual and event variables both denote things rather than predicates.
    pub fn is_individual_like(self) -> bool {
        matches!(self, VariableKind::Individual | VariableKind::Event)
    }
}

/// A lambda-calculus term extended with conjunction and existential closure.
#[derive(Debug, Clone)]
pub enum Term {
    /// A variable occurrence.
    Var(String),
    /// A constant (predicate name, entity name, role name).
    Const(String),
    /// Application of a function to one argument.
    Apply(Box<Term>, Box<Term>),
    /// Lambda abstraction.
    Lambda(String, Box<Term>),
    /// Existential quantification.
    Exists(String, Box<Term>),
    /// Conjunction.
    And(Box<Term>, Box<Term>),
}

// ============================================================================
// Construction
// ============================================================================

impl Term {
    /// A variable occurrence.
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    /// A constant.
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Const(name.into())
    }

    /// An identifier, classified as variable or constant by its spelling.
    pub fn atom(name: impl Into<String>) -> Self {
        let name = name.into();
        if VariableKind::of(&name).is_some() {
            Term::Var(name)
        } else {
            Term::Const(name)
        }
    }

    /// The identity marker `None`.
    pub fn identity() -> Self {
        Term::Const(IDENTITY.to_string())
    }

    /// `function(argument)`.
    pub fn app(function: Term, argument: Term) -> Self {
        Term::Apply(Box::new(function), Box::new(argument))
    }

    /// Curried application `function(a1)(a2)...`.
    pub fn app_all(function: Term, arguments: impl IntoIterator<Item = Term>) -> Self {
        arguments.into_iter().fold(function, Term::app)
    }

    /// `\variable.body`.
    pub fn lambda(variable: impl Into<String>, body: Term) -> Self {
        Term::Lambda(variable.into(), Box::new(body))
    }

    /// `\v1 v2 ... vn.body`, with `v1` outermost.
    pub fn lambdas<I, S>(variables: I, body: Term) -> Self
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: DoubleEndedIterator,
        S: Into<String>,
    {
        variables
            .into_iter()
            .rev()
            .fold(body, |acc, v| Term::lambda(v, acc))
    }

    /// `exists variable.body`.
    pub fn exists(variable: impl Into<String>, body: Term) -> Self {
        Term::Exists(variable.into(), Box::new(body))
    }

    /// `exists v1 v2 ... vn.body`, with `v1` outermost.
    pub fn exists_all<I, S>(variables: I, body: Term) -> Self
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: DoubleEndedIterator,
        S: Into<String>,
    {
        variables
            .into_iter()
            .rev()
            .fold(body, |acc, v| Term::exists(v, acc))
    }

    /// `(left & right)`.
    pub fn and(left: Term, right: Term) -> Self {
        Term::And(Box::new(left), Box::new(right))
    }

    /// Left-associated conjunction of all terms, or `None` if there are none.
    pub fn conjoin(terms: impl IntoIterator<Item = Term>) -> Option<Self> {
        terms.into_iter().reduce(Term::and)
    }
}

// ============================================================================
// Queries
// ============================================================================

impl Term {
    /// True for `Var` and `Const`.
    pub fn is_atomic(&self) -> bool {
        matches!(self, Term::Var(_) | Term::Const(_))
    }

    /// True for the identity marker `None`.
    pub fn is_identity(&self) -> bool {
        matches!(self, Term::Const(name) if name == IDENTITY)
    }

    /// True for lambda and existential binders.
    pub fn is_binder(&self) -> bool {
        matches!(self, Term::Lambda(..) | Term::Exists(..))
    }

    /// The name of an atomic term.
    pub fn name(&self) -> Option<&str> {
        match self {
            Term::Var(name) | Term::Const(name) => Some(name),
            _ => None,
        }
    }

    /// Split a curried application into its head and arguments.
    ///
    /// `f(a)(b)` gives `(f, [a, b])`; a non-application gives `(self, [])`.
    pub fn uncurry(&self) -> (&Term, Vec<&Term>) {
        let mut args = Vec::new();
        let mut head = self;
        while let Term::Apply(function, argument) = head {
            args.push(argument.as_ref());
            head = function;
        }
        args.reverse();
        (head, args)
    }

    /// The leading chain of lambda binders and the body under them.
    pub fn lambda_binders(&self) -> (Vec<&str>, &Term) {
        let mut binders = Vec::new();
        let mut body = self;
        while let Term::Lambda(variable, inner) = body {
            binders.push(variable.as_str());
            body = inner;
        }
        (binders, body)
    }

    /// The leading chain of existential binders and the body under them.
    pub fn exists_binders(&self) -> (Vec<&str>, &Term) {
        let mut binders = Vec::new();
        let mut body = self;
        while let Term::Exists(variable, inner) = body {
            binders.push(variable.as_str());
            body = inner;
        }
        (binders, body)
    }

    /// Flatten a conjunction into its conjuncts, left to right.
    ///
    /// Bracketing is ignored: `(a & b) & c` and `a & (b & c)` both give
    /// `[a, b, c]`. A non-conjunction gives `[self]`.
    pub fn conjuncts(&self) -> Vec<&Term> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            match term {
                Term::And(left, right) => {
                    stack.push(right);
                    stack.push(left);
                }
                other => out.push(other),
            }
        }
        out
    }

    /// Variables occurring free in the term.
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut free = BTreeSet::new();
        self.collect_free(&mut Vec::new(), &mut free);
        free
    }

    fn collect_free<'a>(&'a self, bound: &mut Vec<&'a str>, free: &mut BTreeSet<String>) {
        match self {
            Term::Var(name) => {
                if !bound.contains(&name.as_str()) {
                    free.insert(name.clone());
                }
            }
            Term::Const(_) => {}
            Term::Apply(left, right) | Term::And(left, right) => {
                left.collect_free(bound, free);
                right.collect_free(bound, free);
            }
            Term::Lambda(variable, body) | Term::Exists(variable, body) => {
                bound.push(variable);
                body.collect_free(bound, free);
                bound.pop();
            }
        }
    }

    /// Every variable name mentioned anywhere, bound or free.
    pub fn variable_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            match term {
                Term::Var(name) => {
                    names.insert(name.clone());
                }
                Term::Const(_) => {}
                Term::Apply(left, right) | Term::And(left, right) => {
                    stack.push(left);
                    stack.push(right);
                }
                Term::Lambda(variable, body) | Term::Exists(variable, body) => {
                    names.insert(variable.clone());
                    stack.push(body);
                }
            }
        }
        names
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) | Term::Const(name) => f.write_str(name),
            Term::Lambda(..) => {
                let (binders, body) = self.lambda_binders();
                write!(f, "\\{}.{}", binders.join(" "), body)
            }
            Term::Exists(..) => {
                let (binders, body) = self.exists_binders();
                write!(f, "exists {}.{}", binders.join(" "), body)
            }
            Term::Apply(..) => {
                let (head, args) = self.uncurry();
                if head.is_atomic() {
                    write!(f, "{}(", head)?;
                } else {
                    write!(f, "({})(", head)?;
                }
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Term::And(..) => {
                let conjuncts = self.conjuncts();
                let last = conjuncts.len() - 1;
                f.write_str("(")?;
                for (i, conjunct) in conjuncts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" & ")?;
                    }
                    // A binder body extends to the right, so only the last
                    // conjunct may be printed bare.
                    if conjunct.is_binder() && i < last {
                        write!(f, "({})", conjunct)?;
                    } else {
                        write!(f, "{}", conjunct)?;
                    }
                }
                f.write_str(")")
            }
        }
    }
}

// ============================================================================
// Serialization
// ============================================================================

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Term {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Term::parse(&text).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_kinds() {
        assert_eq!(VariableKind::of("x"), Some(VariableKind::Individual));
        assert_eq!(VariableKind::of("z12"), Some(VariableKind::Individual));
        assert_eq!(VariableKind::of("e"), Some(VariableKind::Event));
        assert_eq!(VariableKind::of("e3"), Some(VariableKind::Event));
        assert_eq!(VariableKind::of("P"), Some(VariableKind::Function));
        assert_eq!(VariableKind::of("EQUAL"), None);
        assert_eq!(VariableKind::of("won:1"), None);
        assert_eq!(VariableKind::of("_a"), None);
        assert_eq!(VariableKind::of("reagan"), None);
        assert_eq!(VariableKind::of(""), None);
    }

    #[test]
    fn test_display_merges_binders() {
        let term = Term::lambdas(
            ["P", "Q", "e"],
            Term::exists_all(
                ["z", "y"],
                Term::and(
                    Term::app(Term::var("P"), Term::var("z")),
                    Term::app(Term::var("Q"), Term::var("y")),
                ),
            ),
        );
        assert_eq!(term.to_string(), "\\P Q e.exists z y.(P(z) & Q(y))");
    }

    #[test]
    fn test_display_uncurries_application() {
        let term = Term::app_all(
            Term::constant("won:1"),
            [Term::var("e"), Term::var("y")],
        );
        assert_eq!(term.to_string(), "won:1(e,y)");
    }

    #[test]
    fn test_display_flattens_conjunction() {
        let right_nested = Term::and(
            Term::constant("a"),
            Term::and(Term::constant("b"), Term::constant("c")),
        );
        let left_nested = Term::and(
            Term::and(Term::constant("a"), Term::constant("b")),
            Term::constant("c"),
        );
        assert_eq!(right_nested.to_string(), "(a & b & c)");
        assert_eq!(left_nested.to_string(), "(a & b & c)");
    }

    #[test]
    fn test_display_parenthesizes_lambda_head() {
        let term = Term::app(
            Term::lambda("x", Term::app(Term::var("P"), Term::var("x"))),
            Term::var("y"),
        );
        assert_eq!(term.to_string(), "(\\x.P(x))(y)");
    }

    #[test]
    fn test_identity_marker() {
        assert!(Term::identity().is_identity());
        assert!(!Term::constant("none").is_identity());
        assert_eq!(Term::identity().to_string(), "None");
    }

    #[test]
    fn test_free_variables() {
        let term = Term::lambda(
            "x",
            Term::app_all(Term::constant("EQUAL"), [Term::var("x"), Term::var("z")]),
        );
        let free = term.free_variables();
        assert!(free.contains("z"));
        assert!(!free.contains("x"));
    }

    #[test]
    fn test_conjoin_empty() {
        assert!(Term::conjoin(Vec::new()).is_none());
    }
}
