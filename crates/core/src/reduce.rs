//! # Reduction and Equivalence
//!
//! - [`Term::substitute`]: capture-avoiding substitution
//! - [`Term::simplify`]: beta reduction to normal form, normal order
//! - [`Term::apply`]: `simplify(f(a))`, the workhorse of composition
//! - [`Term::alpha_eq`]: equality up to renaming of bound variables
//!
//! Reduction carries a step budget. Untyped terms need not terminate
//! (`(\x.x(x))(\x.x(x))`), and exhausting the budget is reported as
//! [`TermError::ReductionLimit`] instead of looping.

use std::collections::BTreeSet;

use crate::error::TermError;
use crate::term::Term;

/// Maximum number of beta steps taken by [`Term::simplify`].
pub const DEFAULT_REDUCTION_LIMIT: usize = 256;

/// Pick a variable name based on `base` that does not occur in `avoid`.
///
/// `base` itself is returned when free; otherwise trailing digits are
/// replaced by the smallest positive counter that is free, so the result
/// keeps the kind of `base` (`y` gives `y1`, `P` gives `P1`, `e` gives `e1`).
pub fn fresh_variable(base: &str, avoid: &BTreeSet<String>) -> String {
    if !avoid.contains(base) {
        return base.to_string();
    }
    let stem = base.trim_end_matches(|c: char| c.is_ascii_digit());
    let mut counter = 1usize;
    loop {
        let candidate = format!("{}{}", stem, counter);
        if !avoid.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

type BinderCtor = fn(String, Box<Term>) -> Term;

impl Term {
    fn binder_parts(&self) -> Option<(BinderCtor, &str, &Term)> {
        match self {
            Term::Lambda(variable, body) => {
                Some((Term::Lambda as BinderCtor, variable.as_str(), &**body))
            }
            Term::Exists(variable, body) => {
                Some((Term::Exists as BinderCtor, variable.as_str(), &**body))
            }
            _ => None,
        }
    }

    /// Replace free occurrences of `variable` with `value`.
    ///
    /// Binders that would capture a free variable of `value` are renamed
    /// first.
    pub fn substitute(&self, variable: &str, value: &Term) -> Term {
        let value_free = value.free_variables();
        self.substitute_with(variable, value, &value_free)
    }

    fn substitute_with(&self, variable: &str, value: &Term, value_free: &BTreeSet<String>) -> Term {
        match self {
            Term::Var(name) if name == variable => value.clone(),
            Term::Var(_) | Term::Const(_) => self.clone(),
            Term::Apply(function, argument) => Term::app(
                function.substitute_with(variable, value, value_free),
                argument.substitute_with(variable, value, value_free),
            ),
            Term::And(left, right) => Term::and(
                left.substitute_with(variable, value, value_free),
                right.substitute_with(variable, value, value_free),
            ),
            Term::Lambda(..) | Term::Exists(..) => {
                let Some((rebuild, bound, body)) = self.binder_parts() else {
                    return self.clone();
                };
                if bound == variable {
                    return self.clone();
                }
                if value_free.contains(bound) && body.free_variables().contains(variable) {
                    let mut avoid = body.variable_names();
                    avoid.extend(value_free.iter().cloned());
                    avoid.insert(variable.to_string());
                    let fresh = fresh_variable(bound, &avoid);
                    let renamed = body.substitute(bound, &Term::var(fresh.clone()));
                    rebuild(
                        fresh,
                        Box::new(renamed.substitute_with(variable, value, value_free)),
                    )
                } else {
                    rebuild(
                        bound.to_string(),
                        Box::new(body.substitute_with(variable, value, value_free)),
                    )
                }
            }
        }
    }

    /// Beta-reduce to normal form within [`DEFAULT_REDUCTION_LIMIT`] steps.
    pub fn simplify(&self) -> Result<Term, TermError> {
        self.simplify_within(DEFAULT_REDUCTION_LIMIT)
    }

    /// Beta-reduce to normal form within `limit` steps.
    pub fn simplify_within(&self, limit: usize) -> Result<Term, TermError> {
        let mut fuel = limit;
        self.normalize(&mut fuel, limit)
    }

    fn normalize(&self, fuel: &mut usize, limit: usize) -> Result<Term, TermError> {
        match self {
            Term::Var(_) | Term::Const(_) => Ok(self.clone()),
            Term::Apply(..) => match self.head_normalize(fuel, limit)? {
                Term::Apply(function, argument) => Ok(Term::app(
                    function.normalize(fuel, limit)?,
                    argument.normalize(fuel, limit)?,
                )),
                other => other.normalize(fuel, limit),
            },
            Term::Lambda(variable, body) => {
                Ok(Term::lambda(variable.clone(), body.normalize(fuel, limit)?))
            }
            Term::Exists(variable, body) => {
                Ok(Term::exists(variable.clone(), body.normalize(fuel, limit)?))
            }
            Term::And(left, right) => Ok(Term::and(
                left.normalize(fuel, limit)?,
                right.normalize(fuel, limit)?,
            )),
        }
    }

    /// Contract the outermost redex along the application spine until the
    /// head is no longer a lambda. Arguments are substituted unreduced.
    fn head_normalize(&self, fuel: &mut usize, limit: usize) -> Result<Term, TermError> {
        let Term::Apply(function, argument) = self else {
            return Ok(self.clone());
        };
        match function.head_normalize(fuel, limit)? {
            Term::Lambda(variable, body) => {
                if *fuel == 0 {
                    return Err(TermError::ReductionLimit { limit });
                }
                *fuel -= 1;
                body.substitute(&variable, argument).head_normalize(fuel, limit)
            }
            other => Ok(Term::app(other, (**argument).clone())),
        }
    }

    /// Apply this term to `argument` and reduce the result.
    ///
    /// ```rust
    /// use ccgsem_core::Term;
    ///
    /// let modifier = Term::parse(r"\P y.(P(y) & COUNT(y,four))").unwrap();
    /// let noun = Term::parse(r"\x.children(x)").unwrap();
    /// let phrase = modifier.apply(&noun).unwrap();
    /// assert_eq!(phrase.to_string(), r"\y.(children(y) & COUNT(y,four))");
    /// ```
    pub fn apply(&self, argument: &Term) -> Result<Term, TermError> {
        Term::app(self.clone(), argument.clone()).simplify()
    }

    /// Equality up to consistent renaming of bound variables.
    ///
    /// Conjunction chains compare by their flattened conjunct lists, so the
    /// bracketing of `&` does not matter (the printed form does not show it).
    pub fn alpha_eq(&self, other: &Term) -> bool {
        alpha(self, other, &mut Vec::new())
    }
}

fn alpha<'a>(a: &'a Term, b: &'a Term, env: &mut Vec<(&'a str, &'a str)>) -> bool {
    match (a, b) {
        (Term::Var(x), Term::Var(y)) => {
            let binding = env
                .iter()
                .rev()
                .find(|(l, r)| *l == x.as_str() || *r == y.as_str());
            match binding {
                Some((l, r)) => *l == x.as_str() && *r == y.as_str(),
                None => x == y,
            }
        }
        (Term::Const(x), Term::Const(y)) => x == y,
        (Term::Apply(f1, a1), Term::Apply(f2, a2)) => alpha(f1, f2, env) && alpha(a1, a2, env),
        (Term::And(..), Term::And(..)) => {
            let left = a.conjuncts();
            let right = b.conjuncts();
            left.len() == right.len()
                && left
                    .into_iter()
                    .zip(right)
                    .all(|(l, r)| alpha(l, r, env))
        }
        (Term::Lambda(v1, b1), Term::Lambda(v2, b2))
        | (Term::Exists(v1, b1), Term::Exists(v2, b2)) => {
            env.push((v1.as_str(), v2.as_str()));
            let equal = alpha(b1, b2, env);
            env.pop();
            equal
        }
        _ => false,
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.alpha_eq(other)
    }
}
