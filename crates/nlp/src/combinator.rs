//! CCG combinators over terms.
//!
//! | Label         | Rule                   | Term                         |
//! |---------------|------------------------|------------------------------|
//! | `>`           | forward application    | `f(g)`                       |
//! | `<`           | backward application   | `g(f)`                       |
//! | `>B`, `>Bx`   | forward composition    | `\C.f(g(C))`                 |
//! | `<B`, `<Bx`   | backward composition   | `\C.g(f(C))`                 |
//! | `>S`, `>Sx`   | forward substitution   | `\S.f(S)(g(S))`              |
//! | `<S`, `<Sx`   | backward substitution  | `\S.g(S)(f(S))`              |
//!
//! `f` is the left operand and `g` the right one. Whatever the rule, the
//! identity marker `None` on either side yields the other operand.
//!
//! ```rust
//! use ccgsem_core::Term;
//! use ccgsem_nlp::combinator::CombinatorRule;
//!
//! let subject = Term::parse(r"\x.EQUAL(x,reagan)").unwrap();
//! let verb = Term::parse(r"\P e.exists y.(P(y) & had(e,y))").unwrap();
//! let rule: CombinatorRule = "<".parse().unwrap();
//! let sentence = rule.combine(&subject, &verb).unwrap();
//! assert_eq!(sentence.to_string(), r"\e.exists y.(EQUAL(y,reagan) & had(e,y))");
//! ```

use ccgsem_core::{fresh_variable, Term, VariableKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::SemanticError;

/// The binary rules of the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombinatorRule {
    ForwardApplication,
    BackwardApplication,
    ForwardComposition,
    BackwardComposition,
    ForwardSubstitution,
    BackwardSubstitution,
}

impl CombinatorRule {
    /// Canonical label.
    pub fn label(self) -> &'static str {
        match self {
            CombinatorRule::ForwardApplication => ">",
            CombinatorRule::BackwardApplication => "<",
            CombinatorRule::ForwardComposition => ">B",
            CombinatorRule::BackwardComposition => "<B",
            CombinatorRule::ForwardSubstitution => ">Sx",
            CombinatorRule::BackwardSubstitution => "<Sx",
        }
    }

    /// Combine two operands and validate the result.
    pub fn combine(self, left: &Term, right: &Term) -> Result<Term, SemanticError> {
        if left.is_identity() {
            return Ok(right.clone());
        }
        if right.is_identity() {
            return Ok(left.clone());
        }
        let term = match self {
            CombinatorRule::ForwardApplication => left.apply(right)?,
            CombinatorRule::BackwardApplication => right.apply(left)?,
            CombinatorRule::ForwardComposition => compose(left, right)?,
            CombinatorRule::BackwardComposition => compose(right, left)?,
            CombinatorRule::ForwardSubstitution => substitute(left, right)?,
            CombinatorRule::BackwardSubstitution => substitute(right, left)?,
        };
        check_composed(&term)?;
        Ok(term)
    }
}

impl fmt::Display for CombinatorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CombinatorRule {
    type Err = SemanticError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let rule = match label {
            ">" => CombinatorRule::ForwardApplication,
            "<" => CombinatorRule::BackwardApplication,
            _ if label.starts_with(">B") => CombinatorRule::ForwardComposition,
            _ if label.starts_with("<B") => CombinatorRule::BackwardComposition,
            _ if label.starts_with(">S") => CombinatorRule::ForwardSubstitution,
            _ if label.starts_with("<S") => CombinatorRule::BackwardSubstitution,
            _ => {
                return Err(SemanticError::MalformedTree {
                    reason: format!("unknown binary rule '{}'", label),
                })
            }
        };
        Ok(rule)
    }
}

/// Type-raising labels. They are accepted on unary nodes and leave the
/// child's meaning unchanged.
pub fn is_type_raising(label: &str) -> bool {
    matches!(label, ">T" | "<T")
}

fn names_of(a: &Term, b: &Term) -> std::collections::BTreeSet<String> {
    let mut names = a.variable_names();
    names.extend(b.variable_names());
    names
}

/// `\C.f(g(C))`. `C` is the outermost binder because the composed
/// category takes the argument of `g` first.
fn compose(f: &Term, g: &Term) -> Result<Term, SemanticError> {
    let c = fresh_variable("C", &names_of(f, g));
    let inner = g.apply(&Term::var(&c))?;
    Ok(Term::lambda(c, f.apply(&inner)?))
}

/// `\S.f(S)(g(S))`
fn substitute(f: &Term, g: &Term) -> Result<Term, SemanticError> {
    let s = fresh_variable("S", &names_of(f, g));
    let sv = Term::var(&s);
    let body = Term::app(f.apply(&sv)?, g.apply(&sv)?).simplify()?;
    Ok(Term::lambda(s, body))
}

// ============================================================================
// Validation
// ============================================================================

/// The printed form must read back as the same term.
pub fn check_syntax(term: &Term) -> Result<(), SemanticError> {
    let printed = term.to_string();
    let reparsed = Term::parse(&printed).map_err(|e| SemanticError::InvalidTerm {
        term: printed.clone(),
        reason: e.to_string(),
    })?;
    if reparsed != *term {
        return Err(SemanticError::InvalidTerm {
            term: printed,
            reason: "reads back as a different term".to_string(),
        });
    }
    Ok(())
}

/// Syntax check plus a check for ill-formed applications and conjuncts.
///
/// Rejected shapes:
/// - a head that is not an identifier, including a leftover redex
/// - an individual or event variable used as a function
/// - a constant applied to a non-atomic argument, a predicate variable,
///   or `None`
/// - a lambda abstraction as a conjunct
pub fn check_composed(term: &Term) -> Result<(), SemanticError> {
    if let Some(reason) = misplaced(term) {
        return Err(SemanticError::InvalidTerm {
            term: term.to_string(),
            reason,
        });
    }
    check_syntax(term)
}

fn variable_kind(term: &Term) -> Option<VariableKind> {
    match term {
        Term::Var(name) => VariableKind::of(name),
        _ => None,
    }
}

fn is_predicate_variable(term: &Term) -> bool {
    variable_kind(term) == Some(VariableKind::Function)
}

fn misplaced(term: &Term) -> Option<String> {
    match term {
        Term::Var(_) | Term::Const(_) => None,
        Term::Lambda(_, body) | Term::Exists(_, body) => misplaced(body),
        Term::And(..) => {
            let conjuncts = term.conjuncts();
            if let Some(lambda) = conjuncts.iter().find(|c| matches!(c, Term::Lambda(..))) {
                return Some(format!("abstraction '{}' used as a conjunct", lambda));
            }
            conjuncts.into_iter().find_map(misplaced)
        }
        Term::Apply(..) => {
            let (head, args) = term.uncurry();
            if !head.is_atomic() {
                return Some(format!("'{}' applied without reduction", head));
            }
            if variable_kind(head).is_some_and(VariableKind::is_individual_like) {
                return Some(format!("variable '{}' used as a function", head));
            }
            if !is_predicate_variable(head) {
                let bad = args
                    .iter()
                    .find(|a| !a.is_atomic() || a.is_identity() || is_predicate_variable(a));
                if let Some(arg) = bad {
                    return Some(format!("'{}' applied to '{}'", head, arg));
                }
            }
            args.into_iter().find_map(misplaced)
        }
    }
}
