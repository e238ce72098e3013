//! Variable allocation over category trees.
//!
//! Every function level of a category becomes a predicate variable drawn
//! from the pool `P, Q, R, S`, paired with the argument variables named by
//! the slots of its argument category. The slot of the innermost result
//! category is the head variable.
//!
//! For `((S{e}\NP{Y})/NP{Z})` the allocation is `P: [z]`, `Q: [y]`,
//! head `e`: the first argument (the object) is visited first.

use ccgsem_core::{fresh_variable, Term};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::category::CategoryTree;
use crate::SemanticError;

static SLOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]*)\}").expect("slot pattern"));

/// Names for predicate variables, in allocation order.
pub const PREDICATE_POOL: [&str; 4] = ["P", "Q", "R", "S"];

/// One argument passed to a predicate variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// A bare individual or event variable.
    Variable(String),
    /// An entity argument of a function-typed argument category, passed as
    /// the property of being equal to the variable: `\x.EQUAL(x,v)`.
    Equality(String),
}

impl Argument {
    /// The variable this argument refers to.
    pub fn variable(&self) -> &str {
        match self {
            Argument::Variable(v) | Argument::Equality(v) => v,
        }
    }

    pub fn to_term(&self) -> Term {
        match self {
            Argument::Variable(v) => Term::var(v.clone()),
            Argument::Equality(v) => {
                let avoid: BTreeSet<String> = [v.clone()].into_iter().collect();
                let x = fresh_variable("x", &avoid);
                Term::lambda(
                    x.clone(),
                    Term::app_all(Term::constant("EQUAL"), [Term::var(x), Term::var(v.clone())]),
                )
            }
        }
    }
}

/// A predicate variable and the arguments it is applied to.
///
/// `arguments[0]` is applied last, so `[y, z]` builds `P(z)(y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateBinding {
    pub name: String,
    pub arguments: Vec<Argument>,
}

/// Result of allocating variables over a category tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableAssignment {
    /// Predicate variables in discovery order.
    pub predicates: Vec<PredicateBinding>,
    /// The variable the whole category denotes.
    pub head: String,
}

impl VariableAssignment {
    /// Walk a category tree and allocate its variables.
    ///
    /// At each function node the argument is resolved first and given the
    /// next predicate variable, then the walk continues into the result.
    pub fn allocate(tree: &CategoryTree) -> Result<Self, SemanticError> {
        let mut allocator = Allocator {
            tree,
            next: 0,
            predicates: Vec::new(),
        };
        let head = allocator.visit(tree)?;
        Ok(Self {
            predicates: allocator.predicates,
            head,
        })
    }

    /// Replace the head variable, as event categories require.
    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = head.into();
        self
    }
}

struct Allocator<'t> {
    tree: &'t CategoryTree,
    next: usize,
    predicates: Vec<PredicateBinding>,
}

impl Allocator<'_> {
    fn error(&self, reason: impl Into<String>) -> SemanticError {
        SemanticError::category(self.tree.to_string(), reason)
    }

    fn next_predicate(&mut self) -> Result<String, SemanticError> {
        let name = PREDICATE_POOL
            .get(self.next)
            .ok_or_else(|| self.error("predicate variable pool exhausted"))?;
        self.next += 1;
        Ok(name.to_string())
    }

    fn visit(&mut self, node: &CategoryTree) -> Result<String, SemanticError> {
        match node {
            CategoryTree::Atom(atom) => {
                let mut vars = slots(atom);
                let head = vars
                    .pop()
                    .ok_or_else(|| self.error(format!("'{}' has no variable slot", atom)))?;
                if !vars.is_empty() {
                    let name = self.next_predicate()?;
                    self.predicates.push(PredicateBinding {
                        name,
                        arguments: vars.into_iter().map(Argument::Variable).collect(),
                    });
                }
                Ok(head)
            }
            CategoryTree::Function { result, argument } => {
                let arguments = self.arguments(argument)?;
                let name = self.next_predicate()?;
                self.predicates.push(PredicateBinding { name, arguments });
                self.visit(result)
            }
        }
    }

    fn arguments(&self, node: &CategoryTree) -> Result<Vec<Argument>, SemanticError> {
        match node {
            CategoryTree::Atom(atom) => {
                let vars = slots(atom);
                if vars.is_empty() {
                    return Err(self.error(format!("'{}' has no variable slot", atom)));
                }
                Ok(vars.into_iter().map(Argument::Variable).collect())
            }
            CategoryTree::Function { .. } => self.nested(node),
        }
    }

    /// A function-typed argument contributes its own head, then each of its
    /// arguments from the innermost out. Entity arguments become equality
    /// properties; function arguments contribute their head.
    fn nested(&self, node: &CategoryTree) -> Result<Vec<Argument>, SemanticError> {
        let mut spine = Vec::new();
        let mut current = node;
        while let CategoryTree::Function { result, argument } = current {
            spine.push(argument.as_ref());
            current = result;
        }

        let mut values = vec![Argument::Variable(self.head_of(current)?)];
        for argument in spine.into_iter().rev() {
            let var = self.head_of(argument)?;
            values.push(if argument.is_atom() {
                Argument::Equality(var)
            } else {
                Argument::Variable(var)
            });
        }
        Ok(values)
    }

    fn head_of(&self, node: &CategoryTree) -> Result<String, SemanticError> {
        let mut current = node;
        while let CategoryTree::Function { result, .. } = current {
            current = result;
        }
        match current {
            CategoryTree::Atom(atom) => slots(atom)
                .pop()
                .ok_or_else(|| self.error(format!("'{}' has no variable slot", atom))),
            CategoryTree::Function { .. } => Err(self.error("unreachable category shape")),
        }
    }
}

/// Lower-cased contents of the `{...}` slots of an atomic category.
pub fn slots(atom: &str) -> Vec<String> {
    SLOT.captures_iter(atom)
        .map(|captures| captures[1].trim().to_lowercase())
        .filter(|slot| !slot.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocate(indexed: &str) -> VariableAssignment {
        VariableAssignment::allocate(&CategoryTree::parse(indexed).unwrap()).unwrap()
    }

    fn vars(names: &[&str]) -> Vec<Argument> {
        names
            .iter()
            .map(|n| Argument::Variable(n.to_string()))
            .collect()
    }

    #[test]
    fn test_slots() {
        assert_eq!(slots("NP{Y}<1>"), vec!["y"]);
        assert_eq!(slots("S[dcl]{e}"), vec!["e"]);
        assert_eq!(slots("N{Y}{Z}"), vec!["y", "z"]);
        assert!(slots("conj").is_empty());
    }

    #[test]
    fn test_transitive_verb() {
        let a = allocate(r"((S[dcl]{_}\NP{Y}<1>){_}/NP{Z}<2>){_}");
        assert_eq!(a.head, "e");
        assert_eq!(a.predicates.len(), 2);
        assert_eq!(a.predicates[0].name, "P");
        assert_eq!(a.predicates[0].arguments, vars(&["z"]));
        assert_eq!(a.predicates[1].name, "Q");
        assert_eq!(a.predicates[1].arguments, vars(&["y"]));
    }

    #[test]
    fn test_adjective() {
        let a = allocate(r"(N{Y}/N{Y}<1>){_}");
        assert_eq!(a.head, "y");
        assert_eq!(a.predicates[0].arguments, vars(&["y"]));
    }

    #[test]
    fn test_function_argument_uses_equality() {
        let a = allocate(r"((S{Y}\NP{Z}){Y}\(S{Y}<1>\NP{Z}){Y}){_}");
        assert_eq!(a.head, "y");
        assert_eq!(
            a.predicates[0].arguments,
            vec![
                Argument::Variable("y".into()),
                Argument::Equality("z".into())
            ]
        );
        assert_eq!(a.predicates[1].arguments, vars(&["z"]));
    }

    #[test]
    fn test_atomic_category() {
        let a = allocate("N{_}");
        assert_eq!(a.head, "e");
        assert!(a.predicates.is_empty());
    }

    #[test]
    fn test_pool_exhaustion() {
        let tree = CategoryTree::parse("S{e}/A{Y}/B{Z}/C{W}/D{V}/E{U}").unwrap();
        let result = VariableAssignment::allocate(&tree);
        assert!(matches!(result, Err(SemanticError::CategoryParse { .. })));
    }

    #[test]
    fn test_missing_slot() {
        let tree = CategoryTree::parse("S/NP").unwrap();
        assert!(VariableAssignment::allocate(&tree).is_err());
    }

    #[test]
    fn test_equality_argument_term() {
        let eq = Argument::Equality("z".into()).to_term();
        assert_eq!(eq.to_string(), r"\x.EQUAL(x,z)");
        let clash = Argument::Equality("x".into()).to_term();
        assert_eq!(clash.to_string(), r"\x1.EQUAL(x1,x)");
    }
}
