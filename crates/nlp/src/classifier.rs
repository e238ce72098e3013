//! Semantic Type Classification
//!
//! Decides what role a word plays in the meaning of a sentence from its
//! spelling, part-of-speech tag and syntactic category.
//!
//! # Lookup Order
//!
//! 1. **Special cases**: hand-written rows keyed on word, POS and category,
//!    tried in ascending priority. A row yields a semantic type or a literal
//!    term template.
//! 2. **Patterns**: an ordered table of word and POS regexes. The built-in
//!    table tags `the` as UNIQUE, `NN` as TYPE, `VBD` as EVENT, and so on.
//! 3. Otherwise the word has no semantic type.
//!
//! Every regex matches from the start of its input.

use ccgsem_core::VariableKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::SemanticError;

// ============================================================================
// Semantic Types
// ============================================================================

/// The closed set of semantic roles a word can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemanticType {
    /// Verbs, prepositions, possessives: introduce an event with roles.
    Event,
    /// Adjectives and adverbs: add a property of the head.
    Mod,
    /// Cardinal numbers.
    Count,
    /// `not`, `n't`.
    Negate,
    /// `no`.
    Complement,
    /// `the`.
    Unique,
    /// Common nouns.
    Type,
    /// Proper nouns and pronouns.
    Entity,
    /// Coordinating conjunctions.
    Conj,
    /// Wh-words.
    Question,
    /// Wh-words asking for an entity.
    #[serde(rename = "ENTQUESTION")]
    EntQuestion,
    /// `a`, `an`: no semantic contribution.
    Indef,
    /// Forms of `be`.
    Copula,
    /// A literal term supplied by a special case or the lexicon.
    SpecialCase,
}

impl SemanticType {
    pub const ALL: [SemanticType; 14] = [
        SemanticType::Event,
        SemanticType::Mod,
        SemanticType::Count,
        SemanticType::Negate,
        SemanticType::Complement,
        SemanticType::Unique,
        SemanticType::Type,
        SemanticType::Entity,
        SemanticType::Conj,
        SemanticType::Question,
        SemanticType::EntQuestion,
        SemanticType::Indef,
        SemanticType::Copula,
        SemanticType::SpecialCase,
    ];

    /// The upper-case tag used in configuration files.
    pub fn tag(self) -> &'static str {
        match self {
            SemanticType::Event => "EVENT",
            SemanticType::Mod => "MOD",
            SemanticType::Count => "COUNT",
            SemanticType::Negate => "NEGATE",
            SemanticType::Complement => "COMPLEMENT",
            SemanticType::Unique => "UNIQUE",
            SemanticType::Type => "TYPE",
            SemanticType::Entity => "ENTITY",
            SemanticType::Conj => "CONJ",
            SemanticType::Question => "QUESTION",
            SemanticType::EntQuestion => "ENTQUESTION",
            SemanticType::Indef => "INDEF",
            SemanticType::Copula => "COPULA",
            SemanticType::SpecialCase => "SPECIAL_CASE",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SemanticType {
    type Err = SemanticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticType::ALL
            .into_iter()
            .find(|t| t.tag() == s)
            .ok_or_else(|| SemanticError::config(format!("unknown semantic type '{}'", s)))
    }
}

/// What the classifier decided for a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Build the term with the rule for this type.
    Tag(SemanticType),
    /// Use this term template; `{0}` stands for the word.
    Literal(String),
}

impl Classification {
    /// Read a special-case result: a known tag, or else a literal template.
    pub fn from_result(result: &str) -> Self {
        match result.parse::<SemanticType>() {
            Ok(tag) => Classification::Tag(tag),
            Err(_) => Classification::Literal(result.to_string()),
        }
    }

    pub fn semantic_type(&self) -> SemanticType {
        match self {
            Classification::Tag(tag) => *tag,
            Classification::Literal(_) => SemanticType::SpecialCase,
        }
    }
}

/// Words of length one are prefixed with `_` so they cannot be read as
/// variables once they appear in a term.
pub fn normalize_word(word: &str) -> String {
    if word.chars().count() == 1 {
        format!("_{}", word)
    } else {
        word.to_string()
    }
}

/// The constant a word becomes inside a term.
///
/// Names that would read back as variables (`x1`, `p2`, `e`) get a leading
/// `_`.
pub fn predicate_name(word: &str) -> String {
    let name = normalize_word(word).to_lowercase();
    if VariableKind::of(&name).is_some() {
        format!("_{}", name)
    } else {
        name
    }
}

fn anchored(pattern: &str) -> Result<Regex, SemanticError> {
    Regex::new(&format!("^(?:{})", pattern))
        .map_err(|e| SemanticError::config(format!("invalid pattern '{}': {}", pattern, e)))
}

// ============================================================================
// Special Cases
// ============================================================================

/// Which categories a special case applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryPattern {
    /// Written `.*`.
    Any,
    /// Exact match on the normalized category.
    Exact(String),
}

/// One special-case row.
#[derive(Debug, Clone)]
pub struct SpecialCase {
    pub priority: i64,
    word: Regex,
    pos: Regex,
    pub category: CategoryPattern,
    pub result: Classification,
}

impl SpecialCase {
    pub fn new(
        priority: i64,
        word: &str,
        pos: &str,
        category: &str,
        result: &str,
    ) -> Result<Self, SemanticError> {
        let category = if category == ".*" {
            CategoryPattern::Any
        } else {
            CategoryPattern::Exact(category.to_string())
        };
        Ok(Self {
            priority,
            word: anchored(word)?,
            pos: anchored(pos)?,
            category,
            result: Classification::from_result(result),
        })
    }

    pub fn matches(&self, word: &str, pos: &str, category: &str) -> bool {
        let category_ok = match &self.category {
            CategoryPattern::Any => true,
            CategoryPattern::Exact(expected) => expected == category,
        };
        category_ok && self.word.is_match(word) && self.pos.is_match(pos)
    }
}

/// Special cases, kept sorted by priority.
#[derive(Debug, Clone, Default)]
pub struct SpecialCaseTable {
    rows: Vec<SpecialCase>,
}

impl SpecialCaseTable {
    pub fn new(mut rows: Vec<SpecialCase>) -> Self {
        rows.sort_by_key(|row| row.priority);
        Self { rows }
    }

    /// Parse tab-separated rows: `priority  word  pos  category  result`.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_tsv(text: &str) -> Result<Self, SemanticError> {
        let mut rows = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            let [priority, word, pos, category, result] = fields[..] else {
                return Err(SemanticError::config(format!(
                    "special case line {}: expected 5 tab-separated fields, got {}",
                    number + 1,
                    fields.len()
                )));
            };
            let priority = priority.parse::<i64>().map_err(|e| {
                SemanticError::config(format!("special case line {}: {}", number + 1, e))
            })?;
            rows.push(SpecialCase::new(priority, word, pos, category, result)?);
        }
        Ok(Self::new(rows))
    }

    /// Rewrite exact category patterns with `normalize`.
    pub fn normalize_categories(mut self, normalize: impl Fn(&str) -> String) -> Self {
        for row in &mut self.rows {
            if let CategoryPattern::Exact(category) = &row.category {
                row.category = CategoryPattern::Exact(normalize(category));
            }
        }
        self
    }

    /// The first row matching, in priority order.
    pub fn find(&self, word: &str, pos: &str, category: &str) -> Option<&SpecialCase> {
        self.rows.iter().find(|row| row.matches(word, pos, category))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Pattern Table
// ============================================================================

/// What a pattern row is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternTarget {
    Word,
    Pos,
}

/// One pattern row.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub target: PatternTarget,
    regex: Regex,
    pub tag: SemanticType,
}

impl PatternRule {
    pub fn new(target: PatternTarget, pattern: &str, tag: SemanticType) -> Result<Self, SemanticError> {
        Ok(Self {
            target,
            regex: anchored(pattern)?,
            tag,
        })
    }
}

/// Ordered regex table; the first matching row wins.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    rules: Vec<PatternRule>,
}

impl PatternTable {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// The built-in table for Penn Treebank tags and English function words.
    pub fn english() -> Result<Self, SemanticError> {
        use PatternTarget::{Pos, Word};
        use SemanticType::*;

        let rows: [(PatternTarget, &str, SemanticType); 11] = [
            (Word, r"(?i)_?an?$", Indef),
            (Word, r"(?i)not$|n't$", Negate),
            (Word, r"(?i)no$", Complement),
            (Word, r"(?i)the$", Unique),
            (Pos, r"NN$|NNS$", Type),
            (Pos, r"NNP.?$|PRP.?$", Entity),
            (Pos, r"CC$", Conj),
            (Pos, r"VB.?$|POS$|IN$|TO$", Event),
            (Pos, r"RB.?$|JJ.?$", Mod),
            (Pos, r"CD$", Count),
            (Pos, r"WDT$|WP.?$|WRB$", Question),
        ];
        let rules = rows
            .into_iter()
            .map(|(target, pattern, tag)| PatternRule::new(target, pattern, tag))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// Parse rows `regex  TAG` (matched against the POS tag) or
    /// `word|pos  regex  TAG`, tab-separated.
    pub fn from_tsv(text: &str) -> Result<Self, SemanticError> {
        let mut rules = Vec::new();
        for (number, line) in text.lines().enumerate() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            let (target, pattern, tag) = match fields[..] {
                [pattern, tag] => (PatternTarget::Pos, pattern, tag),
                ["word", pattern, tag] => (PatternTarget::Word, pattern, tag),
                ["pos", pattern, tag] => (PatternTarget::Pos, pattern, tag),
                _ => {
                    return Err(SemanticError::config(format!(
                        "pattern line {}: expected 'regex<TAB>TAG' or 'word|pos<TAB>regex<TAB>TAG'",
                        number + 1
                    )))
                }
            };
            rules.push(PatternRule::new(target, pattern, tag.parse()?)?);
        }
        Ok(Self::new(rules))
    }

    pub fn find(&self, word: &str, pos: &str) -> Option<SemanticType> {
        self.rules
            .iter()
            .find(|rule| match rule.target {
                PatternTarget::Word => rule.regex.is_match(word),
                PatternTarget::Pos => rule.regex.is_match(pos),
            })
            .map(|rule| rule.tag)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Special cases first, then patterns.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    pub special_cases: SpecialCaseTable,
    pub patterns: PatternTable,
}

impl Classifier {
    pub fn new(special_cases: SpecialCaseTable, patterns: PatternTable) -> Self {
        Self {
            special_cases,
            patterns,
        }
    }

    /// Classify a word. `category` must already be normalized the way the
    /// special-case categories were.
    pub fn classify(&self, word: &str, pos: &str, category: &str) -> Option<Classification> {
        let word = normalize_word(word);
        if let Some(row) = self.special_cases.find(&word, pos, category) {
            return Some(row.result.clone());
        }
        self.patterns.find(&word, pos).map(Classification::Tag)
    }
}
