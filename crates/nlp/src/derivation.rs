//! Semantic derivations.
//!
//! A [`Derivation`] mirrors the syntax tree it was composed from, with a
//! term at every node. Besides the final [`Derivation::expression`], it
//! records how that term came about:
//!
//! ```text
//! \P y.(P(y) & COUNT(y,four)) > \x.children(x) ==> \y.(children(y) & COUNT(y,four))
//! ```

use ccgsem_core::Term;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::fmt;

use crate::classifier::SemanticType;

/// Rule label recorded at leaves.
pub const LEAF_RULE: &str = "Leaf";

/// One node of a derivation and everything below it.
#[derive(Debug, Clone, Serialize)]
pub struct Derivation {
    pub category: String,
    pub rule: String,
    pub term: Term,
    pub node: DerivationNode,
}

/// What kind of node a derivation is.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DerivationNode {
    Leaf {
        word: String,
        pos: String,
        semantic_type: SemanticType,
    },
    Unary {
        child: Box<Derivation>,
    },
    Binary {
        left: Box<Derivation>,
        right: Box<Derivation>,
    },
}

impl Derivation {
    pub fn leaf(
        word: impl Into<String>,
        pos: impl Into<String>,
        category: impl Into<String>,
        semantic_type: SemanticType,
        term: Term,
    ) -> Self {
        Self {
            category: category.into(),
            rule: LEAF_RULE.to_string(),
            term,
            node: DerivationNode::Leaf {
                word: word.into(),
                pos: pos.into(),
                semantic_type,
            },
        }
    }

    /// A unary node keeps its child's term.
    pub fn unary(category: impl Into<String>, rule: impl Into<String>, child: Derivation) -> Self {
        Self {
            category: category.into(),
            rule: rule.into(),
            term: child.term.clone(),
            node: DerivationNode::Unary {
                child: Box::new(child),
            },
        }
    }

    pub fn binary(
        category: impl Into<String>,
        rule: impl Into<String>,
        term: Term,
        left: Derivation,
        right: Derivation,
    ) -> Self {
        Self {
            category: category.into(),
            rule: rule.into(),
            term,
            node: DerivationNode::Binary {
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    /// The term at this node.
    pub fn expression(&self) -> &Term {
        &self.term
    }

    /// One line per binary step, innermost first.
    pub fn trace(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.collect_trace(&mut lines);
        lines
    }

    fn collect_trace(&self, lines: &mut Vec<String>) {
        match &self.node {
            DerivationNode::Leaf { .. } => {}
            DerivationNode::Unary { child } => child.collect_trace(lines),
            DerivationNode::Binary { left, right } => {
                left.collect_trace(lines);
                right.collect_trace(lines);
                lines.push(format!(
                    "{} {} {} ==> {}",
                    left.term, self.rule, right.term, self.term
                ));
            }
        }
    }

    /// Leaf nodes in sentence order.
    pub fn leaves(&self) -> Vec<&Derivation> {
        match &self.node {
            DerivationNode::Leaf { .. } => vec![self],
            DerivationNode::Unary { child } => child.leaves(),
            DerivationNode::Binary { left, right } => {
                let mut leaves = left.leaves();
                leaves.extend(right.leaves());
                leaves
            }
        }
    }

    /// The derivation as a graph with edges from parent to child.
    pub fn to_graph(&self) -> DiGraph<String, &'static str> {
        let mut graph = DiGraph::new();
        self.add_to_graph(&mut graph);
        graph
    }

    fn add_to_graph(&self, graph: &mut DiGraph<String, &'static str>) -> NodeIndex {
        let label = match &self.node {
            DerivationNode::Leaf {
                word,
                pos,
                semantic_type,
            } => format!("{}/{} [{}]\n{}", word, pos, semantic_type, self.term),
            _ => format!("{} {}\n{}", self.category, self.rule, self.term),
        };
        let index = graph.add_node(label);
        match &self.node {
            DerivationNode::Leaf { .. } => {}
            DerivationNode::Unary { child } => {
                let c = child.add_to_graph(graph);
                graph.add_edge(index, c, "child");
            }
            DerivationNode::Binary { left, right } => {
                let l = left.add_to_graph(graph);
                let r = right.add_to_graph(graph);
                graph.add_edge(index, l, "left");
                graph.add_edge(index, r, "right");
            }
        }
        index
    }

    /// Graphviz rendering of [`Derivation::to_graph`].
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::new(&self.to_graph()))
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.trace() {
            writeln!(f, "{}", line)?;
        }
        write!(f, "{}", self.term)
    }
}
