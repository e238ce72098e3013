//! Sentence-level driver.
//!
//! [`SemanticParser`] takes a POS-tagged sentence, asks a [`CcgParser`]
//! for syntax trees, and composes each tree in a fresh session. A sentence
//! whose last token is the question marker is composed with the question
//! rules.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::composer::Composer;
use crate::config::{Configuration, EngineSettings};
use crate::derivation::Derivation;
use crate::syntax::SyntaxTree;
use crate::SemanticError;

/// A word and its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub word: String,
    pub pos: String,
}

impl TaggedToken {
    pub fn new(word: impl Into<String>, pos: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            pos: pos.into(),
        }
    }

    /// Tokens without a letter or digit, such as `.` and `?`.
    pub fn is_punctuation(&self) -> bool {
        !self.word.chars().any(char::is_alphanumeric)
    }
}

/// Anything that produces CCG derivations for a tagged sentence.
pub trait CcgParser {
    fn parse(&self, tokens: &[TaggedToken]) -> Vec<SyntaxTree>;
}

impl<F> CcgParser for F
where
    F: Fn(&[TaggedToken]) -> Vec<SyntaxTree>,
{
    fn parse(&self, tokens: &[TaggedToken]) -> Vec<SyntaxTree> {
        self(tokens)
    }
}

/// One syntax tree and the derivations composed from it.
#[derive(Debug, Clone, Serialize)]
pub struct SemanticParse {
    pub syntax: SyntaxTree,
    pub derivations: Vec<Derivation>,
}

/// Drives a CCG parser and the composer over whole sentences.
pub struct SemanticParser<'c, P> {
    config: &'c Configuration,
    parser: P,
    question_marker: String,
    max_derivations: Option<usize>,
}

impl<'c, P: CcgParser> SemanticParser<'c, P> {
    pub fn new(config: &'c Configuration, parser: P) -> Self {
        Self {
            config,
            parser,
            question_marker: "?".to_string(),
            max_derivations: None,
        }
    }

    /// Take the question marker and derivation bound from settings.
    pub fn with_settings(self, settings: &EngineSettings) -> Self {
        let parser = self.with_question_marker(settings.question_marker.clone());
        match settings.max_derivations {
            Some(max) => parser.with_max_derivations(max),
            None => parser,
        }
    }

    pub fn with_question_marker(mut self, marker: impl Into<String>) -> Self {
        self.question_marker = marker.into();
        self
    }

    /// Compose at most `max` syntax trees per sentence.
    pub fn with_max_derivations(mut self, max: usize) -> Self {
        self.max_derivations = Some(max);
        self
    }

    pub fn is_question(&self, tokens: &[TaggedToken]) -> bool {
        tokens
            .last()
            .is_some_and(|t| t.word == self.question_marker)
    }

    /// Parse and compose a tagged sentence.
    ///
    /// Every tree is checked before any is composed; a malformed tree fails
    /// the whole sentence.
    pub fn parse(&self, tokens: &[TaggedToken]) -> Result<Vec<SemanticParse>, SemanticError> {
        let question = self.is_question(tokens);
        let words: Vec<TaggedToken> = tokens
            .iter()
            .filter(|t| !t.is_punctuation())
            .cloned()
            .collect();

        let mut trees = self.parser.parse(&words);
        if let Some(max) = self.max_derivations {
            trees.truncate(max);
        }
        for tree in &trees {
            tree.validate()?;
        }

        let parses = trees
            .into_iter()
            .map(|tree| {
                let derivations = self.compose_tree(&tree, question)?;
                Ok(SemanticParse {
                    syntax: tree,
                    derivations,
                })
            })
            .collect::<Result<Vec<_>, SemanticError>>()?;

        info!(
            "Composed {} syntax trees into {} derivations for {} words{}",
            parses.len(),
            parses.iter().map(|p| p.derivations.len()).sum::<usize>(),
            words.len(),
            if question { " (question)" } else { "" }
        );
        Ok(parses)
    }

    /// Compose one externally supplied tree in a fresh session.
    pub fn compose_tree(&self, tree: &SyntaxTree, question: bool) -> Result<Vec<Derivation>, SemanticError> {
        tree.validate()?;
        Composer::new(self.config).compose(tree, question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryIndex;
    use crate::classifier::{PatternTable, SpecialCaseTable};
    use std::cell::RefCell;

    fn config() -> Configuration {
        let index = CategoryIndex::from_pairs(
            [("N", "N{_}"), (r"S\NP", r"(S{_}\NP{Y}<1>){_}")],
            CategoryIndex::default_replacements(),
        );
        Configuration::new(index, SpecialCaseTable::default(), PatternTable::english().unwrap())
    }

    fn tokens(sentence: &[(&str, &str)]) -> Vec<TaggedToken> {
        sentence.iter().map(|(w, p)| TaggedToken::new(*w, *p)).collect()
    }

    fn intransitive(tokens: &[TaggedToken]) -> Vec<SyntaxTree> {
        vec![SyntaxTree::binary(
            "S",
            "<",
            SyntaxTree::leaf(&tokens[0].word, &tokens[0].pos, "N"),
            SyntaxTree::leaf(&tokens[1].word, &tokens[1].pos, r"S\NP"),
        )]
    }

    #[test]
    fn test_punctuation_removed_and_question_detected() {
        let config = config();
        let seen = RefCell::new(Vec::new());
        let parser = SemanticParser::new(&config, |t: &[TaggedToken]| {
            seen.borrow_mut().push(t.len());
            intransitive(t)
        });
        let sentence = tokens(&[("Reagan", "NNP"), ("won", "VBD"), ("?", ".")]);
        assert!(parser.is_question(&sentence));
        let parses = parser.parse(&sentence).unwrap();
        assert_eq!(*seen.borrow(), vec![2]);
        assert_eq!(parses.len(), 1);
        assert_eq!(
            parses[0].derivations[0].expression().to_string(),
            r"\e.exists y.(EQUAL(y,reagan) & won:1(e,y))"
        );
    }

    #[test]
    fn test_max_derivations() {
        let config = config();
        let parser = SemanticParser::new(&config, |t: &[TaggedToken]| {
            let mut trees = intransitive(t);
            trees.extend(intransitive(t));
            trees
        })
        .with_max_derivations(1);
        let parses = parser
            .parse(&tokens(&[("Reagan", "NNP"), ("won", "VBD"), (".", ".")]))
            .unwrap();
        assert_eq!(parses.len(), 1);
    }

    #[test]
    fn test_malformed_tree_fails_sentence() {
        let config = config();
        let parser = SemanticParser::new(&config, |_: &[TaggedToken]| {
            vec![SyntaxTree::leaf("", "NN", "N")]
        });
        assert!(matches!(
            parser.parse(&tokens(&[("dog", "NN")])),
            Err(SemanticError::MalformedTree { .. })
        ));
    }

    #[test]
    fn test_syntax_kept_without_semantics() {
        let config = config();
        let parser = SemanticParser::new(&config, |_: &[TaggedToken]| {
            vec![SyntaxTree::leaf("xyzzy", "SYM", "N")]
        });
        let parses = parser.parse(&tokens(&[("xyzzy", "SYM")])).unwrap();
        assert_eq!(parses.len(), 1);
        assert!(parses[0].derivations.is_empty());
    }

    #[test]
    fn test_settings() {
        let config = config();
        let mut settings = EngineSettings::new("m", "s");
        settings.question_marker = "?!".into();
        settings.max_derivations = Some(3);
        let parser = SemanticParser::new(&config, intransitive).with_settings(&settings);
        assert!(parser.is_question(&tokens(&[("won", "VBD"), ("?!", ".")])));
        assert!(!parser.is_question(&tokens(&[("won", "VBD"), ("?", ".")])));
        assert_eq!(parser.max_derivations, Some(3));
    }
}
