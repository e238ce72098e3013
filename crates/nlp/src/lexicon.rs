//! Predicate lexicon: explicit terms for words and categories.
//!
//! ```text
//! " comment
//! #WORDS
//! everyone :: \P.P(everyone)
//! #CATEGORIES
//! N/N :: \P x.(P(x) & {0}(x))
//! ```
//!
//! Word entries are used as they are. Category entries are templates in
//! which `{0}` stands for the word, used only when nothing else gives a
//! word a meaning.

use ccgsem_core::Term;
use std::collections::HashMap;

use crate::classifier::predicate_name;
use crate::SemanticError;

const SEPARATOR: &str = " :: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Words,
    Categories,
}

/// Terms keyed by word, and term templates keyed by category.
#[derive(Debug, Clone, Default)]
pub struct PredicateLexicon {
    words: HashMap<String, Vec<Term>>,
    categories: HashMap<String, Vec<String>>,
}

impl PredicateLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the sectioned lexicon format.
    ///
    /// Word terms are parsed here; a malformed one is a configuration
    /// error. Category keys are stored as written and should be normalized
    /// with [`PredicateLexicon::normalize_categories`] before lookup.
    pub fn parse(text: &str) -> Result<Self, SemanticError> {
        let mut lexicon = Self::new();
        let mut section: Option<Section> = None;

        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('"') {
                continue;
            }
            if let Some(name) = line.strip_prefix('#') {
                section = Some(match name.trim() {
                    "WORDS" => Section::Words,
                    "CATEGORIES" => Section::Categories,
                    other => {
                        return Err(SemanticError::config(format!(
                            "invalid lexicon section '{}'",
                            other
                        )))
                    }
                });
                continue;
            }
            let (key, value) = line.split_once(SEPARATOR).ok_or_else(|| {
                SemanticError::config(format!(
                    "lexicon line {} is not 'key :: term': {}",
                    number + 1,
                    line
                ))
            })?;
            let (key, value) = (key.trim(), value.trim());
            match section {
                Some(Section::Words) => {
                    let term = Term::parse(value).map_err(|e| {
                        SemanticError::config(format!("lexicon line {}: {}", number + 1, e))
                    })?;
                    lexicon.insert_word(key, term);
                }
                Some(Section::Categories) => lexicon.insert_category(key, value),
                None => {
                    return Err(SemanticError::config(format!(
                        "lexicon line {} precedes any section",
                        number + 1
                    )))
                }
            }
        }
        Ok(lexicon)
    }

    pub fn insert_word(&mut self, word: impl Into<String>, term: Term) {
        self.words.entry(word.into()).or_default().push(term);
    }

    pub fn insert_category(&mut self, category: impl Into<String>, template: impl Into<String>) {
        self.categories
            .entry(category.into())
            .or_default()
            .push(template.into());
    }

    /// Rekey category templates, e.g. with the category index's
    /// normalization, so raw parser categories find them.
    pub fn normalize_categories(self, normalize: impl Fn(&str) -> String) -> Self {
        let mut categories: HashMap<String, Vec<String>> = HashMap::new();
        for (category, templates) in self.categories {
            categories
                .entry(normalize(&category))
                .or_default()
                .extend(templates);
        }
        Self {
            words: self.words,
            categories,
        }
    }

    /// Explicit terms for a word: exact spelling first, then lower case.
    pub fn word(&self, word: &str) -> &[Term] {
        self.words
            .get(word)
            .or_else(|| self.words.get(&word.to_lowercase()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Instantiate the templates for a category with a word.
    ///
    /// Each result is a parse result of its own, so one bad template does
    /// not hide the others.
    pub fn category(&self, category: &str, word: &str) -> Vec<Result<Term, SemanticError>> {
        let name = predicate_name(word);
        self.categories
            .get(category)
            .map(|templates| {
                templates
                    .iter()
                    .map(|template| {
                        Term::parse(&template.replace("{0}", &name)).map_err(SemanticError::from)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.categories.is_empty()
    }
}

impl std::str::FromStr for PredicateLexicon {
    type Err = SemanticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
