//! End-to-end tests for the nlp crate.
//!
//! These tests load the sample tables under `data/` and check that:
//! - Leaf meanings come out as expected for each semantic type
//! - Whole sentences compose into a single logical form
//! - Questions use the question rules
//! - Failures remove candidates without aborting the walk

use ccgsem_core::Term;
use ccgsem_nlp::{
    CategoryIndex, Composer, Configuration, EngineSettings, PatternTable, PredicateLexicon,
    SemanticCategory, SemanticError, SemanticParser, SemanticType, SpecialCaseTable,
    SyntacticCategory, SyntaxTree, TaggedToken,
};

fn config() -> Configuration {
    let index = CategoryIndex::from_markedup(
        include_str!("../data/markedup"),
        CategoryIndex::default_replacements(),
    )
    .unwrap();
    let special = SpecialCaseTable::from_tsv(include_str!("../data/specialcases.tsv")).unwrap();
    let lexicon = PredicateLexicon::parse(include_str!("../data/predicates.lex")).unwrap();
    Configuration::new(index, special, PatternTable::english().unwrap()).with_lexicon(lexicon)
}

fn leaf_term(config: &Configuration, word: &str, pos: &str, category: &str, question: bool) -> Term {
    let category = SyntacticCategory::new(category, &config.categories);
    SemanticCategory::build(config, word, pos, &category, question)
        .unwrap()
        .term
}

fn term(s: &str) -> Term {
    Term::parse(s).unwrap()
}

// ============================================================================
// Leaf Meanings
// ============================================================================

#[test]
fn leaf_scenarios() {
    let config = config();
    let cases = [
        ("won", "VBD", r"(S\N)/N", r"\P Q e.exists z y.(P(z) & Q(y) & won:1(e,y) & won:2(e,z))"),
        ("successful", "JJ", "N/N", r"\P y.(P(y) & successful(y))"),
        ("four", "CD", "N/N", r"\P y.(P(y) & COUNT(y,four))"),
        ("the", "DT", "N/N", r"\P y.(P(y) & UNIQUE(y))"),
        ("Reagan", "NNP", "N", r"\x.EQUAL(x, reagan)"),
        ("and", "CC", "conj", r"\P Q x.(P(x) & Q(x))"),
        (
            "not",
            "RB",
            r"(S\N)\(S\N)",
            r"\P Q y.exists z.(P(\x.EQUAL(x,z))(y) & Q(z) & NEGATION(y))",
        ),
    ];
    for (word, pos, category, expected) in cases {
        assert_eq!(
            leaf_term(&config, word, pos, category, false),
            term(expected),
            "{} {} {}",
            word,
            pos,
            category
        );
    }
}

#[test]
fn leaf_terms_print_and_parse_back() {
    let config = config();
    for (word, pos, category) in [
        ("won", "VBD", r"(S\NP)/NP"),
        ("not", "RB", r"(S\NP)\(S\NP)"),
        ("in", "IN", r"(NP\NP)/NP"),
        ("quickly", "RB", r"(S\NP)\(S\NP)"),
    ] {
        let printed = leaf_term(&config, word, pos, category, false).to_string();
        assert_eq!(Term::parse(&printed).unwrap().to_string(), printed);
    }
}

#[test]
fn question_leaves() {
    let config = config();
    assert_eq!(
        leaf_term(&config, "What", "WP", "S/(S/N)", true),
        term(r"\P.exists x.(P(x) & TARGET(x))")
    );
    assert_eq!(
        leaf_term(&config, "is", "VBZ", r"(S\N)/N", true),
        term(r"\P x.P(x)")
    );
    assert!(leaf_term(&config, "is", "VBZ", r"(S\N)/N", false).is_identity());
}

#[test]
fn lexicon_supplies_meanings() {
    let config = config();
    let n = SyntacticCategory::new("N", &config.categories);

    let everyone = SemanticCategory::lexical_candidates(&config, "everyone", "NN", &n, false);
    let terms: Vec<String> = everyone.iter().map(|c| c.term.to_string()).collect();
    assert_eq!(terms, vec![r"\x.PERSON(x)", r"\x.everyone(x)"]);
    assert_eq!(everyone[0].semantic_type, SemanticType::SpecialCase);
    assert_eq!(everyone[1].semantic_type, SemanticType::Type);

    let unknown = SemanticCategory::lexical_candidates(&config, "Zork", "FW", &n, false);
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].term, term(r"\x.zork(x)"));
}

// ============================================================================
// Sentences
// ============================================================================

fn reagan_had_four_children() -> SyntaxTree {
    let object = SyntaxTree::unary(
        "NP",
        "lex",
        SyntaxTree::binary(
            "N",
            ">",
            SyntaxTree::leaf("four", "CD", "N/N"),
            SyntaxTree::leaf("children", "NNS", "N"),
        ),
    );
    SyntaxTree::binary(
        "S[dcl]",
        "<",
        SyntaxTree::unary("NP", "lex", SyntaxTree::leaf("Reagan", "NNP", "N")),
        SyntaxTree::binary(
            r"S[dcl]\NP",
            ">",
            SyntaxTree::leaf("had", "VBD", r"(S[dcl]\NP)/NP"),
            object,
        ),
    )
}

#[test]
fn sentence_composes_to_one_logical_form() {
    let config = config();
    let derivations = Composer::new(&config)
        .compose(&reagan_had_four_children(), false)
        .unwrap();
    assert_eq!(derivations.len(), 1);
    let expected = r"\e.exists z y.(children(z) & COUNT(z,four) & EQUAL(y,reagan) & had:1(e,y) & had:2(e,z))";
    assert_eq!(derivations[0].expression().to_string(), expected);

    let trace = derivations[0].trace();
    assert_eq!(trace.len(), 3);
    assert!(trace[2].starts_with(r"\x.EQUAL(x,reagan) < "));
    assert!(trace[2].ends_with(expected));
}

#[test]
fn tree_from_json() {
    let json = r#"{
        "node": "binary", "category": "S", "rule": "<",
        "left": {"node": "leaf", "word": "Reagan", "pos": "NNP", "category": "N"},
        "right": {"node": "leaf", "word": "won", "pos": "VBD", "category": "S\\NP"}
    }"#;
    let tree = SyntaxTree::from_json(json).unwrap();
    let derivations = Composer::new(&config()).compose(&tree, false).unwrap();
    assert_eq!(
        derivations[0].expression(),
        &term(r"\e.exists y.(EQUAL(y,reagan) & won:1(e,y))")
    );
}

#[test]
fn question_through_the_driver() {
    let config = config();
    let parser = SemanticParser::new(&config, |tokens: &[TaggedToken]| {
        assert_eq!(tokens.len(), 3);
        vec![SyntaxTree::binary(
            "S",
            "<",
            SyntaxTree::binary(
                "NP",
                ">",
                SyntaxTree::leaf(&tokens[0].word, &tokens[0].pos, "NP/N"),
                SyntaxTree::leaf(&tokens[1].word, &tokens[1].pos, "N"),
            ),
            SyntaxTree::leaf(&tokens[2].word, &tokens[2].pos, r"S\NP"),
        )]
    });
    let sentence = [
        TaggedToken::new("Which", "WDT"),
        TaggedToken::new("actor", "NN"),
        TaggedToken::new("won", "VBD"),
        TaggedToken::new("?", "."),
    ];
    let parses = parser.parse(&sentence).unwrap();
    assert_eq!(parses.len(), 1);
    assert_eq!(
        parses[0].derivations[0].expression(),
        &term(r"\e.exists y.(actor(y) & TARGET(y) & won:1(e,y))")
    );

    // Without the marker "Which" has no statement rule and falls back to
    // the lexicon's N/N template.
    let parses = parser.parse(&sentence[..3]).unwrap();
    assert_eq!(
        parses[0].derivations[0].expression(),
        &term(r"\e.exists y.(actor(y) & which(y) & won:1(e,y))")
    );
}

#[test]
fn modifier_composes_with_transitive_verb() {
    // Reagan (also >B won) > Oscar
    let config = config();
    let verb_phrase = SyntaxTree::binary(
        r"S\NP",
        ">",
        SyntaxTree::binary(
            r"(S\NP)/NP",
            ">B",
            SyntaxTree::leaf("also", "RB", r"(S\NP)/(S\NP)"),
            SyntaxTree::leaf("won", "VBD", r"(S\NP)/NP"),
        ),
        SyntaxTree::leaf("Oscar", "NNP", "N"),
    );
    let tree = SyntaxTree::binary("S", "<", SyntaxTree::leaf("Reagan", "NNP", "N"), verb_phrase);

    let derivations = Composer::new(&config).compose(&tree, false).unwrap();
    assert_eq!(derivations.len(), 1);
    let trace = derivations[0].trace();
    assert_eq!(trace.len(), 3);
    assert!(trace[0].ends_with(
        r"==> \C Q y.exists z.((exists z1 y1.(C(z1) & EQUAL(y1,z) & won:1(y,y1) & won:2(y,z1))) & Q(z) & also(y))"
    ));
    // Oscar fills the object role, Reagan the subject role.
    assert_eq!(
        derivations[0].expression(),
        &term(
            r"\y.exists z.((exists z1 y1.(EQUAL(z1,oscar) & EQUAL(y1,z) & won:1(y,y1) & won:2(y,z1))) & EQUAL(z,reagan) & also(y))"
        )
    );
}

#[test]
fn verb_composes_into_negation() {
    let config = config();
    let tree = SyntaxTree::binary(
        r"(S\NP)/NP",
        "<Bx",
        SyntaxTree::leaf("won", "VBD", r"(S\NP)/NP"),
        SyntaxTree::leaf("not", "RB", r"(S\NP)\(S\NP)"),
    );
    let derivations = Composer::new(&config).compose(&tree, false).unwrap();
    assert_eq!(derivations.len(), 1);
    assert_eq!(
        derivations[0].expression(),
        &term(
            r"\C Q y.exists z.((exists z1 y1.(C(z1) & EQUAL(y1,z) & won:1(y,y1) & won:2(y,z1))) & Q(z) & NEGATION(y))"
        )
    );
}

#[test]
fn verb_substitutes_into_adjunct() {
    // won <Sx without: both share the object slot S.
    let config = config();
    let adjunct = leaf_term(&config, "without", "IN", r"((S\NP)\(S\NP))/NP", false);
    assert_eq!(
        adjunct,
        term(
            r"\P Q R e.exists w y z.(P(w) & Q(\x.EQUAL(x,z),y) & R(z) & without:1(e,z) & without:2(e,y) & without:3(e,w))"
        )
    );

    let tree = SyntaxTree::binary(
        r"(S\NP)/NP",
        "<Sx",
        SyntaxTree::leaf("won", "VBD", r"(S\NP)/NP"),
        SyntaxTree::leaf("without", "IN", r"((S\NP)\(S\NP))/NP"),
    );
    let derivations = Composer::new(&config).compose(&tree, false).unwrap();
    assert_eq!(derivations.len(), 1);
    assert_eq!(
        derivations[0].expression(),
        &term(
            r"\S R e.exists w y z.(S(w) & (exists z1 y1.(S(z1) & EQUAL(y1,z) & won:1(y,y1) & won:2(y,z1))) & R(z) & without:1(e,z) & without:2(e,y) & without:3(e,w))"
        )
    );
}

#[test]
fn modifier_without_room_for_verb_is_dropped() {
    // A property-level modifier cannot take a verb that still expects a
    // predicate subject; the composed term is rejected, not returned.
    let config = config();
    let tree = SyntaxTree::binary(
        r"(S\NP)/NP",
        ">B",
        SyntaxTree::leaf("successful", "JJ", "N/N"),
        SyntaxTree::leaf("won", "VBD", r"(S\NP)/NP"),
    );
    let derivations = Composer::new(&config).compose(&tree, false).unwrap();
    assert!(derivations.is_empty());
}

#[test]
fn settings_file_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/settings.json");
    let settings = EngineSettings::load(path).unwrap();
    assert_eq!(settings.max_derivations, Some(10));
    let config = Configuration::from_settings(&settings).unwrap();
    let derivations = Composer::new(&config)
        .compose(&reagan_had_four_children(), false)
        .unwrap();
    assert_eq!(derivations.len(), 1);
}

// ============================================================================
// Failure Handling
// ============================================================================

#[test]
fn identity_words_vanish() {
    let config = config();
    let tree = SyntaxTree::binary(
        "NP",
        ">",
        SyntaxTree::leaf("an", "DT", "NP/N"),
        SyntaxTree::leaf("actor", "NN", "N"),
    );
    let derivations = Composer::new(&config).compose(&tree, false).unwrap();
    assert_eq!(derivations[0].expression(), &term(r"\x.actor(x)"));
}

#[test]
fn unmappable_category_gives_no_derivations() {
    let config = config();
    let tree = SyntaxTree::binary(
        "S",
        "<",
        SyntaxTree::leaf("Reagan", "NNP", "N"),
        SyntaxTree::leaf("won", "VBD", r"(S\NP)/PP"),
    );
    let derivations = Composer::new(&config).compose(&tree, false).unwrap();
    assert!(derivations.is_empty());
}

#[test]
fn malformed_tree_is_rejected() {
    let config = config();
    let parser = SemanticParser::new(&config, |_: &[TaggedToken]| Vec::new());
    let tree = SyntaxTree::binary(
        "S",
        "ba",
        SyntaxTree::leaf("Reagan", "NNP", "N"),
        SyntaxTree::leaf("won", "VBD", r"S\NP"),
    );
    let err = parser.compose_tree(&tree, false).unwrap_err();
    assert!(matches!(err, SemanticError::MalformedTree { .. }));
    assert!(!err.is_local());
}
