//! # Core - Lambda Terms for Event Semantics
//!
//! This crate provides the term language that sentence meanings are built in:
//!
//! - **Terms**: variables, constants, application, lambda abstraction,
//!   existential closure and conjunction ([`Term`])
//! - **Parsing**: the textual grammar, `\P Q e.exists z y.(P(z) & Q(y))`
//! - **Reduction**: capture-avoiding substitution and beta reduction
//! - **Equivalence**: alpha-equivalence, used as `PartialEq`
//! - **Errors**: parse and reduction failures as values ([`TermError`])
//!
//! ## Example
//!
//! ```rust
//! use ccgsem_core::Term;
//!
//! let verb = Term::parse(r"\P e.exists y.(P(y) & had(e,y))").unwrap();
//! let subject = Term::parse(r"\x.EQUAL(x,reagan)").unwrap();
//!
//! let sentence = verb.apply(&subject).unwrap();
//! assert_eq!(
//!     sentence.to_string(),
//!     r"\e.exists y.(EQUAL(y,reagan) & had(e,y))"
//! );
//! ```

pub mod error;
pub mod parse;
pub mod reduce;
pub mod term;

pub use error::TermError;
pub use parse::EXISTS_KEYWORDS;
pub use reduce::{fresh_variable, DEFAULT_REDUCTION_LIMIT};
pub use term::{Term, VariableKind, IDENTITY};
