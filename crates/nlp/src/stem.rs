//! Stem terms: the meaning skeleton a category implies.
//!
//! A stem conjoins one atom per predicate variable, closes every non-head
//! argument variable existentially, and abstracts over the predicate
//! variables and then the head:
//!
//! ```text
//! P: [z], Q: [y], head e   ==>   \P Q e.exists z y.(P(z) & Q(y))
//! ```
//!
//! Semantic-type rules extend a stem with further conjuncts before it is
//! turned into a [`Term`].

use ccgsem_core::{Term, VariableKind};

use crate::variables::{Argument, PredicateBinding, VariableAssignment};

/// A stem under construction.
#[derive(Debug, Clone)]
pub struct Stem {
    predicates: Vec<PredicateBinding>,
    head: String,
    existentials: Vec<String>,
    extra: Vec<Term>,
}

impl Stem {
    /// Build the stem for an allocation.
    pub fn build(assignment: &VariableAssignment) -> Self {
        let head = assignment.head.clone();
        let mut existentials: Vec<String> = Vec::new();
        let mut equality_only: Vec<String> = Vec::new();

        for binding in &assignment.predicates {
            for argument in binding.arguments.iter().rev() {
                let var = argument.variable();
                if var == head {
                    continue;
                }
                match argument {
                    Argument::Variable(_) => {
                        if !existentials.iter().any(|v| v == var) {
                            existentials.push(var.to_string());
                        }
                    }
                    Argument::Equality(_) => {
                        if !equality_only.iter().any(|v| v == var) {
                            equality_only.push(var.to_string());
                        }
                    }
                }
            }
        }
        for var in equality_only {
            if !existentials.contains(&var) {
                existentials.push(var);
            }
        }

        Self {
            predicates: assignment.predicates.clone(),
            head,
            existentials,
            extra: Vec::new(),
        }
    }

    /// The lambda-bound head variable.
    pub fn head(&self) -> &str {
        &self.head
    }

    /// Existentially closed variables, outermost first.
    pub fn existentials(&self) -> &[String] {
        &self.existentials
    }

    /// Predicate variables, outermost first.
    pub fn predicate_names(&self) -> Vec<&str> {
        self.predicates.iter().map(|b| b.name.as_str()).collect()
    }

    /// Individual and event variables of the conjunction, in the order the
    /// event roles are numbered: last predicate atom first, and within an
    /// atom its arguments in application order. Equality arguments are
    /// skipped.
    pub fn role_variables(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for binding in self.predicates.iter().rev() {
            for argument in binding.arguments.iter().rev() {
                if let Argument::Variable(var) = argument {
                    let individual = VariableKind::of(var).is_some_and(VariableKind::is_individual_like);
                    if individual && !out.contains(&var.as_str()) {
                        out.push(var);
                    }
                }
            }
        }
        out
    }

    /// Add a conjunct after the predicate atoms.
    pub fn conjoin(mut self, atom: Term) -> Self {
        self.extra.push(atom);
        self
    }

    /// The finished term, or `None` when there is nothing to conjoin.
    pub fn to_term(&self) -> Option<Term> {
        let atoms = self.predicates.iter().map(|binding| {
            let arguments = binding.arguments.iter().rev().map(Argument::to_term);
            Term::app_all(Term::var(binding.name.clone()), arguments)
        });
        let body = Term::conjoin(atoms.chain(self.extra.iter().cloned()))?;
        let closed = Term::exists_all(self.existentials.iter().cloned(), body);
        let binders = self
            .predicates
            .iter()
            .map(|b| b.name.clone())
            .chain(std::iter::once(self.head.clone()))
            .collect::<Vec<_>>();
        Some(Term::lambdas(binders, closed))
    }
}
