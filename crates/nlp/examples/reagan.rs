//! Composing "Reagan had four children" and "Which actor won?"
//!
//! Run with: cargo run -p ccgsem-nlp --example reagan
//!
//! Set RUST_LOG=debug to see every dropped candidate.
//!
//! This example demonstrates:
//! - Loading the sample tables through a settings file
//! - Leaf meanings for each word
//! - Composing a hand-built CCG derivation
//! - Question mode through the sentence driver
//! - Rendering a derivation as Graphviz

use ccgsem_nlp::{
    Composer, Configuration, EngineSettings, SemanticError, SemanticParser, SyntaxTree,
    TaggedToken,
};

fn main() -> Result<(), SemanticError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("=== CCG to Neo-Davidsonian Logical Forms ===\n");

    let settings = EngineSettings::load(concat!(env!("CARGO_MANIFEST_DIR"), "/data/settings.json"))?;
    let config = Configuration::from_settings(&settings)?;

    // -------------------------------------------------------------------------
    // 1. A declarative sentence
    // -------------------------------------------------------------------------
    println!("1. Reagan had four children");
    println!("---------------------------\n");

    let tree = SyntaxTree::binary(
        "S[dcl]",
        "<",
        SyntaxTree::unary("NP", "lex", SyntaxTree::leaf("Reagan", "NNP", "N")),
        SyntaxTree::binary(
            r"S[dcl]\NP",
            ">",
            SyntaxTree::leaf("had", "VBD", r"(S[dcl]\NP)/NP"),
            SyntaxTree::unary(
                "NP",
                "lex",
                SyntaxTree::binary(
                    "N",
                    ">",
                    SyntaxTree::leaf("four", "CD", "N/N"),
                    SyntaxTree::leaf("children", "NNS", "N"),
                ),
            ),
        ),
    );
    println!("Syntax: {}\n", tree);

    let composer = Composer::new(&config);
    for derivation in composer.compose(&tree, false)? {
        println!("Leaves:");
        for leaf in derivation.leaves() {
            println!("  {:<40} {}", leaf.category, leaf.term);
        }
        println!("\nSteps:");
        for step in derivation.trace() {
            println!("  {}", step);
        }
        println!("\nLogical form: {}\n", derivation.expression());
        println!("Graphviz:\n{}", derivation.to_dot());
    }

    // -------------------------------------------------------------------------
    // 2. A question
    // -------------------------------------------------------------------------
    println!("2. Which actor won?");
    println!("-------------------\n");

    // A stand-in for a real CCG parser: one fixed derivation shape.
    let ccg = |tokens: &[TaggedToken]| {
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
    };
    let parser = SemanticParser::new(&config, ccg).with_settings(&settings);
    let sentence = [
        TaggedToken::new("Which", "WDT"),
        TaggedToken::new("actor", "NN"),
        TaggedToken::new("won", "VBD"),
        TaggedToken::new("?", "."),
    ];
    for parse in parser.parse(&sentence)? {
        for derivation in &parse.derivations {
            println!("Logical form: {}", derivation.expression());
        }
    }

    Ok(())
}
