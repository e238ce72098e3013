//! Syntactic Categories and Their Indexed Forms
//!
//! A CCG parser labels each word with a bare category such as `(S\NP)/NP`.
//! The C&C "markedup" table pairs every bare category with an *indexed* form
//! that names the argument slots:
//!
//! ```text
//! (S[dcl]\NP)/NP
//!   2 ((S[dcl]{_}\NP{Y}<1>){_}/NP{Z}<2>){_}
//! ```
//!
//! [`CategoryIndex`] maps bare categories to indexed ones, and
//! [`CategoryTree`] parses an indexed category into its curried-function
//! shape: each internal node pairs a result (left) with an argument (right).
//!
//! # Example
//!
//! ```rust
//! use ccgsem_nlp::category::{CategoryIndex, CategoryTree};
//!
//! let index = CategoryIndex::from_pairs(
//!     [("(S[dcl]\\NP)/NP", "((S[dcl]{_}\\NP{Y}<1>){_}/NP{Z}<2>){_}")],
//!     CategoryIndex::default_replacements(),
//! );
//! let indexed = index.lookup("(S\\N)/N").unwrap();
//! let tree = CategoryTree::parse(indexed).unwrap();
//! assert_eq!(tree.atoms(), vec!["S[dcl]{e}", "NP{Y}<1>", "NP{Z}<2>"]);
//! ```

use regex::Regex;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::SemanticError;

/// Feature annotations such as `[dcl]`.
static FEATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("feature pattern"));

/// A single-letter slot directly after a closing parenthesis: `(S{Y}\NP{Z}){Y}`.
static GROUP_SLOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\)\{[A-Ze]\}").expect("group slot pattern"));

// ============================================================================
// Category Index
// ============================================================================

/// Lookup table from bare categories to indexed categories.
///
/// Keys are normalized on insert and on lookup: feature brackets are removed
/// (`S[dcl]` becomes `S`), a redundant outer pair of parentheses is removed,
/// then the configured string replacements are applied in order. When two
/// entries normalize to the same key the later one wins.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    entries: HashMap<String, String>,
    replacements: Vec<(String, String)>,
}

impl CategoryIndex {
    /// Create an empty index with the given key replacements.
    pub fn new(replacements: Vec<(String, String)>) -> Self {
        Self {
            entries: HashMap::new(),
            replacements,
        }
    }

    /// `NP` is written `N` in the parser's lexicon.
    pub fn default_replacements() -> Vec<(String, String)> {
        vec![("NP".to_string(), "N".to_string())]
    }

    /// Build an index from `(category, indexed)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I, replacements: Vec<(String, String)>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut index = Self::new(replacements);
        for (category, indexed) in pairs {
            index.insert(category.as_ref(), indexed);
        }
        index
    }

    /// Parse the C&C markedup format.
    ///
    /// Entries are blocks separated by blank lines. Lines starting with `#`
    /// or `=` are ignored. The first remaining line of a block is the bare
    /// category, the second token of the next line is its indexed form, and
    /// any further lines (grammatical relations) are skipped.
    pub fn from_markedup(
        text: &str,
        replacements: Vec<(String, String)>,
    ) -> Result<Self, SemanticError> {
        let mut index = Self::new(replacements);
        let mut block: Vec<&str> = Vec::new();

        for line in text.lines().chain(std::iter::once("")) {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                if !block.is_empty() {
                    index.insert_block(&block)?;
                    block.clear();
                }
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with('=') {
                continue;
            }
            block.push(trimmed);
        }
        Ok(index)
    }

    fn insert_block(&mut self, block: &[&str]) -> Result<(), SemanticError> {
        let category = block[0];
        let indexed = block
            .get(1)
            .and_then(|line| line.split_whitespace().nth(1))
            .ok_or_else(|| {
                SemanticError::config(format!(
                    "markedup entry '{}' has no indexed category",
                    category
                ))
            })?;
        self.insert(category, indexed);
        Ok(())
    }

    /// Add one entry.
    pub fn insert(&mut self, category: &str, indexed: impl Into<String>) {
        let key = self.normalize(category);
        self.entries.insert(key, indexed.into());
    }

    /// The indexed form of a bare category, if any.
    pub fn lookup(&self, category: &str) -> Option<&str> {
        self.entries
            .get(&self.normalize(category))
            .map(String::as_str)
    }

    /// Normalize a category the way keys are normalized.
    pub fn normalize(&self, category: &str) -> String {
        let mut key = strip_outer_parens(&strip_features(category)).to_string();
        for (from, to) in &self.replacements {
            key = key.replace(from.as_str(), to);
        }
        key
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn strip_features(category: &str) -> String {
    FEATURE.replace_all(category, "").into_owned()
}

/// Remove parentheses that enclose the whole category, repeatedly.
pub fn strip_outer_parens(category: &str) -> &str {
    let mut current = category.trim();
    while current.starts_with('(') && closing_paren(current, 0) == Some(current.len() - 1) {
        current = current[1..current.len() - 1].trim();
    }
    current
}

fn closing_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

// ============================================================================
// Syntactic Category
// ============================================================================

/// A category as labelled by the parser, with its indexed form and parse.
///
/// The tree is parsed on first use and kept, so a session that sees the
/// same category at many leaves parses it once.
#[derive(Debug, Clone)]
pub struct SyntacticCategory {
    raw: String,
    indexed: Option<String>,
    tree: OnceCell<Result<CategoryTree, SemanticError>>,
}

impl SyntacticCategory {
    /// Resolve `raw` against the index.
    pub fn new(raw: impl Into<String>, index: &CategoryIndex) -> Self {
        let raw = raw.into();
        let indexed = index.lookup(&raw).map(str::to_string);
        Self {
            raw,
            indexed,
            tree: OnceCell::new(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The indexed form, or `None` when the index has no entry.
    pub fn indexed(&self) -> Option<&str> {
        self.indexed.as_deref()
    }

    /// The parsed curried-function tree.
    pub fn tree(&self) -> Result<&CategoryTree, SemanticError> {
        self.tree
            .get_or_init(|| match &self.indexed {
                Some(indexed) => CategoryTree::parse(indexed),
                None => Err(SemanticError::category(
                    &self.raw,
                    "no indexed form in the category table",
                )),
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl fmt::Display for SyntacticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

// ============================================================================
// Category Tree
// ============================================================================

/// An indexed category as a curried function.
///
/// `((S{e}\NP{Y})/NP{Z})` is `Function(Function(S{e}, NP{Y}), NP{Z})`:
/// it takes `NP{Z}`, then `NP{Y}`, and returns `S{e}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryTree {
    /// An atomic category with its slot annotations, e.g. `NP{Y}<1>`.
    Atom(String),
    /// A function from `argument` to `result`.
    Function {
        result: Box<CategoryTree>,
        argument: Box<CategoryTree>,
    },
}

/// Nesting produced by the scanner before it is folded into a tree.
enum Group {
    Atom(String),
    List(Vec<Group>),
}

impl CategoryTree {
    /// Parse an indexed category.
    ///
    /// The string is first cleaned: `*` marks are removed, the event slot
    /// `_` becomes `e`, and slot annotations directly after a `)` are
    /// dropped. Operators at one nesting level associate to the left.
    pub fn parse(indexed: &str) -> Result<Self, SemanticError> {
        let cleaned = preprocess(indexed);
        let groups = scan(&cleaned).map_err(|reason| SemanticError::category(indexed, reason))?;
        build(groups).map_err(|reason| SemanticError::category(indexed, reason))
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, CategoryTree::Atom(_))
    }

    /// Atomic categories, left to right.
    pub fn atoms(&self) -> Vec<&str> {
        match self {
            CategoryTree::Atom(atom) => vec![atom.as_str()],
            CategoryTree::Function { result, argument } => {
                let mut atoms = result.atoms();
                atoms.extend(argument.atoms());
                atoms
            }
        }
    }
}

impl fmt::Display for CategoryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryTree::Atom(atom) => write!(f, "{}", atom),
            CategoryTree::Function { result, argument } => {
                write!(f, "[{}, {}]", result, argument)
            }
        }
    }
}

/// Drop `*` markers, read `_` as the event slot `e`, and remove the slot a
/// parenthesised group repeats from its contents.
fn preprocess(indexed: &str) -> String {
    let indexed = indexed.replace('*', "").replace('_', "e");
    GROUP_SLOT.replace_all(&indexed, ")").into_owned()
}

fn level_mut(root: &mut Vec<Group>, level: usize) -> Result<&mut Vec<Group>, String> {
    let mut current = root;
    for _ in 0..level {
        current = match current.last_mut() {
            Some(Group::List(inner)) => inner,
            _ => return Err("operator outside its group".to_string()),
        };
    }
    Ok(current)
}

/// Single left-to-right scan. A `)` is not applied immediately: the number
/// of pending closes is subtracted from the level at the next operator.
fn scan(category: &str) -> Result<Vec<Group>, String> {
    let mut root = Vec::new();
    let mut level = 0usize;
    let mut pending_pops = 0usize;
    let mut depth = 0usize;
    let mut atom = String::new();
    let mut after_operator = false;

    for c in category.chars() {
        match c {
            '(' => {
                level_mut(&mut root, level)?.push(Group::List(Vec::new()));
                level += 1;
                depth += 1;
            }
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced ')'".to_string())?;
                pending_pops += 1;
            }
            '/' | '\\' => {
                if atom.is_empty() {
                    return Err(format!("missing operand before '{}'", c));
                }
                level_mut(&mut root, level)?.push(Group::Atom(std::mem::take(&mut atom)));
                if pending_pops > 0 && level > 0 {
                    level = level
                        .checked_sub(pending_pops)
                        .ok_or_else(|| "unbalanced ')'".to_string())?;
                    pending_pops = 0;
                }
                after_operator = true;
            }
            c if c.is_whitespace() => {}
            c => {
                atom.push(c);
                after_operator = false;
            }
        }
    }

    if depth != 0 {
        return Err("unbalanced '('".to_string());
    }
    if after_operator {
        return Err("missing operand at end".to_string());
    }
    if !atom.is_empty() {
        level_mut(&mut root, level)?.push(Group::Atom(atom));
    }
    Ok(root)
}

fn build(groups: Vec<Group>) -> Result<CategoryTree, String> {
    let mut items = groups.into_iter().map(|group| match group {
        Group::Atom(atom) => Ok(CategoryTree::Atom(atom)),
        Group::List(inner) => build(inner),
    });
    let first = items.next().ok_or_else(|| "empty category".to_string())??;
    items.try_fold(first, |result, argument| {
        Ok(CategoryTree::Function {
            result: Box::new(result),
            argument: Box::new(argument?),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator_count(s: &str) -> usize {
        s.chars().filter(|c| *c == '/' || *c == '\\').count()
    }

    #[test]
    fn test_preprocess() {
        assert_eq!(
            preprocess(r"((S[dcl]{_}\NP{Y}<1>){_}/NP{Z}<2>){_}"),
            r"((S[dcl]{e}\NP{Y}<1>)/NP{Z}<2>)"
        );
        assert_eq!(preprocess(r"(S{X}\NP{Y*})"), r"(S{X}\NP{Y})");
        assert_eq!(
            preprocess(r"((S{Y}\NP{Z}){Y}\(S{Y}<1>\NP{Z}){Y}){_}"),
            r"((S{Y}\NP{Z})\(S{Y}<1>\NP{Z}))"
        );
    }

    #[test]
    fn test_strip_features() {
        assert_eq!(strip_features(r"S[wq]/(S[q]/NP)"), "S/(S/NP)");
        assert_eq!(strip_features(r"(S[dcl]\NP)/NP[nb]"), r"(S\NP)/NP");
        assert_eq!(strip_features("conj"), "conj");
    }

    #[test]
    fn test_parse_transitive_verb() {
        let tree = CategoryTree::parse(r"((S[dcl]{_}\NP{Y}<1>){_}/NP{Z}<2>){_}").unwrap();
        let expected = CategoryTree::Function {
            result: Box::new(CategoryTree::Function {
                result: Box::new(CategoryTree::Atom("S[dcl]{e}".into())),
                argument: Box::new(CategoryTree::Atom("NP{Y}<1>".into())),
            }),
            argument: Box::new(CategoryTree::Atom("NP{Z}<2>".into())),
        };
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_parse_function_argument() {
        let tree = CategoryTree::parse(r"((S{Y}\NP{Z}){Y}\(S{Y}<1>\NP{Z}){Y}){_}").unwrap();
        match &tree {
            CategoryTree::Function { result, argument } => {
                assert!(!result.is_atom());
                assert!(!argument.is_atom());
            }
            other => panic!("expected function, got {}", other),
        }
        assert_eq!(tree.atoms(), vec!["S{Y}", "NP{Z}", "S{Y}<1>", "NP{Z}"]);
    }

    #[test]
    fn test_parse_left_associative() {
        let tree = CategoryTree::parse("S{e}/NP{Y}/NP{Z}").unwrap();
        assert_eq!(tree.to_string(), "[[S{e}, NP{Y}], NP{Z}]");
    }

    #[test]
    fn test_parse_right_nested_argument() {
        let tree = CategoryTree::parse(r"(A{X}/(B{Y}/C{Z}))/D{W}").unwrap();
        assert_eq!(tree.to_string(), "[[A{X}, [B{Y}, C{Z}]], D{W}]");
    }

    #[test]
    fn test_parse_atom() {
        let tree = CategoryTree::parse("N{_}").unwrap();
        assert_eq!(tree, CategoryTree::Atom("N{e}".into()));
    }

    #[test]
    fn test_atom_count_is_operators_plus_one() {
        let categories = [
            r"((S[dcl]{_}\NP{Y}<1>){_}/NP{Z}<2>){_}",
            r"((S{Y}\NP{Z}){Y}\(S{Y}<1>\NP{Z}){Y}){_}",
            r"(N{Y}/N{Y}<1>){_}",
            r"(((S{_}\NP{Y}<1>){_}/PP{W}<3>){_}/NP{Z}<2>){_}",
            "N{_}",
        ];
        for category in categories {
            let tree = CategoryTree::parse(category).unwrap();
            assert_eq!(tree.atoms().len(), operator_count(category) + 1);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(CategoryTree::parse(r"((S{_}\NP{Y})").is_err());
        assert!(CategoryTree::parse(r"(S{_}\NP{Y}))").is_err());
        assert!(CategoryTree::parse(r"S{_}\").is_err());
        assert!(CategoryTree::parse(r"S{_}\\NP{Y}").is_err());
        assert!(CategoryTree::parse("()").is_err());
        assert!(CategoryTree::parse("").is_err());
    }

    #[test]
    fn test_normalize_keys() {
        let index = CategoryIndex::new(CategoryIndex::default_replacements());
        assert_eq!(index.normalize(r"(S[dcl]\NP)/NP"), r"(S\N)/N");
        assert_eq!(index.normalize(r"((S\NP)/NP)"), r"(S\N)/N");
        assert_eq!(index.normalize("NP[nb]/N"), "N/N");
        assert_eq!(index.normalize(r"(S\NP)\(S\NP)"), r"(S\N)\(S\N)");
    }

    #[test]
    fn test_markedup_loading() {
        let text = "# comment paragraph\n# more\n\n\
                    =begin\n\n\
                    N\n  0 N{_}\n\n\
                    (S[dcl]\\NP)/NP\n  2 ((S[dcl]{_}\\NP{Y}<1>){_}/NP{Z}<2>){_}\n  1 ncsubj %l %f _\n";
        let index =
            CategoryIndex::from_markedup(text, CategoryIndex::default_replacements()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup("N"), Some("N{_}"));
        assert_eq!(
            index.lookup(r"(S\N)/N"),
            Some(r"((S[dcl]{_}\NP{Y}<1>){_}/NP{Z}<2>){_}")
        );
        assert_eq!(index.lookup(r"(S\NP)/NP"), index.lookup(r"(S\N)/N"));
    }

    #[test]
    fn test_markedup_missing_indexed_line() {
        let result = CategoryIndex::from_markedup("N\n\nNP\n  0 NP{_}\n", Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_unmapped_category_has_no_tree() {
        let index = CategoryIndex::default();
        let category = SyntacticCategory::new("PP/NP", &index);
        assert!(category.indexed().is_none());
        assert!(category.tree().is_err());
    }
}
