//! Engine configuration.
//!
//! A [`Configuration`] bundles every table the composer consults. It is
//! built once, never changes afterwards, and is shared by reference.
//! [`EngineSettings`] is the JSON form naming the files to build it from:
//!
//! ```json
//! {
//!   "markedup": "markedup",
//!   "special_cases": "specialcases.tsv",
//!   "lexicon": "predicates.lex",
//!   "question_marker": "?",
//!   "max_derivations": 10
//! }
//! ```
//!
//! Relative paths are resolved against the directory of the settings file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::category::CategoryIndex;
use crate::classifier::{Classification, Classifier, PatternTable, SpecialCaseTable};
use crate::lexicon::PredicateLexicon;
use crate::rules::RuleLibrary;
use crate::SemanticError;

/// Everything the composer needs to know about the language.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub categories: CategoryIndex,
    pub classifier: Classifier,
    pub lexicon: PredicateLexicon,
    pub rules: RuleLibrary,
}

impl Configuration {
    /// Build a configuration with an empty lexicon and the standard rules.
    ///
    /// Special-case categories are normalized with the category index so
    /// that they compare equal to normalized parser categories.
    pub fn new(
        categories: CategoryIndex,
        special_cases: SpecialCaseTable,
        patterns: PatternTable,
    ) -> Self {
        let special_cases = special_cases.normalize_categories(|c| categories.normalize(c));
        Self {
            classifier: Classifier::new(special_cases, patterns),
            categories,
            lexicon: PredicateLexicon::new(),
            rules: RuleLibrary::default(),
        }
    }

    /// Use a predicate lexicon, rekeying its categories like the index.
    pub fn with_lexicon(mut self, lexicon: PredicateLexicon) -> Self {
        let categories = &self.categories;
        self.lexicon = lexicon.normalize_categories(|c| categories.normalize(c));
        self
    }

    pub fn with_rules(mut self, rules: RuleLibrary) -> Self {
        self.rules = rules;
        self
    }

    /// Classify a word as labelled by the parser.
    pub fn classify(&self, word: &str, pos: &str, raw_category: &str) -> Option<Classification> {
        let category = self.categories.normalize(raw_category);
        self.classifier.classify(word, pos, &category)
    }

    /// Load every table named by the settings.
    pub fn from_settings(settings: &EngineSettings) -> Result<Self, SemanticError> {
        let categories = CategoryIndex::from_markedup(
            &read(&settings.markedup)?,
            settings.replacements.clone(),
        )?;
        let special_cases = SpecialCaseTable::from_tsv(&read(&settings.special_cases)?)?;
        let patterns = match &settings.patterns {
            Some(path) => PatternTable::from_tsv(&read(path)?)?,
            None => PatternTable::english()?,
        };
        let lexicon = match &settings.lexicon {
            Some(path) => PredicateLexicon::parse(&read(path)?)?,
            None => PredicateLexicon::new(),
        };

        info!(
            "Loaded {} categories, {} special cases, {} patterns",
            categories.len(),
            special_cases.len(),
            patterns.len()
        );
        Ok(Self::new(categories, special_cases, patterns).with_lexicon(lexicon))
    }
}

fn read(path: &Path) -> Result<String, SemanticError> {
    fs::read_to_string(path)
        .map_err(|e| SemanticError::config(format!("cannot read '{}': {}", path.display(), e)))
}

fn default_replacements() -> Vec<(String, String)> {
    CategoryIndex::default_replacements()
}

fn default_question_marker() -> String {
    "?".to_string()
}

/// Paths and knobs for building a [`Configuration`] and driving a parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSettings {
    /// C&C markedup file.
    pub markedup: PathBuf,
    /// Tab-separated special cases.
    pub special_cases: PathBuf,
    /// Tab-separated patterns; the built-in English table when absent.
    #[serde(default)]
    pub patterns: Option<PathBuf>,
    #[serde(default)]
    pub lexicon: Option<PathBuf>,
    /// Category key replacements, applied in order.
    #[serde(default = "default_replacements")]
    pub replacements: Vec<(String, String)>,
    #[serde(default = "default_question_marker")]
    pub question_marker: String,
    /// Upper bound on syntax trees composed per sentence.
    #[serde(default)]
    pub max_derivations: Option<usize>,
}

impl EngineSettings {
    /// Settings with the two required files and defaults elsewhere.
    pub fn new(markedup: impl Into<PathBuf>, special_cases: impl Into<PathBuf>) -> Self {
        Self {
            markedup: markedup.into(),
            special_cases: special_cases.into(),
            patterns: None,
            lexicon: None,
            replacements: default_replacements(),
            question_marker: default_question_marker(),
            max_derivations: None,
        }
    }

    /// Parse settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, SemanticError> {
        serde_json::from_str(json)
            .map_err(|e| SemanticError::config(format!("invalid settings: {}", e)))
    }

    /// Read a JSON settings file, resolving relative paths against its
    /// directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SemanticError> {
        let path = path.as_ref();
        let settings = Self::from_json(&read(path)?)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(settings.resolve(base))
    }

    /// Make relative paths relative to `base`.
    pub fn resolve(mut self, base: &Path) -> Self {
        let join = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.markedup = join(self.markedup);
        self.special_cases = join(self.special_cases);
        self.patterns = self.patterns.map(join);
        self.lexicon = self.lexicon.map(join);
        self
    }
}
