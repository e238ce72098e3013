//! Terms: parsing, printing, reduction and equivalence
//!
//! Run with: cargo run -p ccgsem-core --example terms
//!
//! This example demonstrates:
//! - Parsing the textual term grammar
//! - Variable kinds read off identifier spelling
//! - Beta reduction by application
//! - Capture-avoiding substitution
//! - Alpha-equivalence as equality

use ccgsem_core::{Term, TermError, VariableKind};

fn main() -> Result<(), TermError> {
    println!("=== Lambda Terms for Event Semantics ===\n");

    // -------------------------------------------------------------------------
    // 1. Parsing and printing
    // -------------------------------------------------------------------------
    println!("1. Parsing and Printing");
    println!("-----------------------");

    let verb = Term::parse(r"\P Q e.exists z y.(P(z) & Q(y) & won:1(e,y) & won:2(e,z))")?;
    println!("Verb:        {}", verb);
    for name in ["P", "e", "y", "won:1", "EQUAL"] {
        let kind = match VariableKind::of(name) {
            Some(kind) => format!("{:?} variable", kind),
            None => "constant".to_string(),
        };
        println!("  {:<8} {}", name, kind);
    }
    println!();

    // -------------------------------------------------------------------------
    // 2. Application
    // -------------------------------------------------------------------------
    println!("2. Application");
    println!("--------------");

    let object = Term::parse(r"\x.EQUAL(x,oscar)")?;
    let subject = Term::parse(r"\x.EQUAL(x,reagan)")?;
    let with_object = verb.apply(&object)?;
    let sentence = with_object.apply(&subject)?;
    println!("won(oscar):          {}", with_object);
    println!("won(oscar)(reagan):  {}\n", sentence);

    // -------------------------------------------------------------------------
    // 3. Capture avoidance and equivalence
    // -------------------------------------------------------------------------
    println!("3. Capture Avoidance");
    println!("--------------------");

    let relation = Term::parse(r"\y x.R(x,y)")?;
    let applied = relation.apply(&Term::var("x"))?;
    println!("(\\y x.R(x,y))(x) = {}", applied);
    println!(
        "alpha-equivalent to \\z.R(z,x)? {}",
        applied == Term::parse(r"\z.R(z,x)")?
    );

    match Term::parse(r"(\x.x(x))(\x.x(x))")?.simplify() {
        Ok(term) => println!("omega reduced to {}", term),
        Err(e) => println!("omega: {}", e),
    }

    Ok(())
}
