//! Parser for the textual term grammar.
//!
//! ```text
//! expression  := operand ('&' operand)*
//! operand     := '\' variable+ '.' expression
//!              | 'exists' variable+ '.' expression
//!              | application
//! application := primary ('(' expression (',' expression)* ')')*
//! primary     := identifier | '(' expression ')'
//! ```
//!
//! Binder bodies extend as far right as possible, `&` associates to the
//! left, and `f(a,b)` is shorthand for `f(a)(b)`. `exist` and `some` are
//! accepted as spellings of `exists`.

use std::str::FromStr;

use logos::Logos;

use crate::error::TermError;
use crate::term::{Term, VariableKind};

/// Identifiers the grammar reserves for existential quantification.
pub const EXISTS_KEYWORDS: [&str; 3] = ["exists", "exist", "some"];

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Token {
    #[token("\\")]
    Lambda,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token("(")]
    Open,

    #[token(")")]
    Close,

    #[token("&")]
    And,

    // Names may carry role suffixes (`won:1`) and other punctuation.
    #[regex(r"[^\\.,()& \t\r\n\f]+", |lex| lex.slice().to_string())]
    Ident(String),
}

impl Token {
    fn text(&self) -> &str {
        match self {
            Token::Lambda => "\\",
            Token::Dot => ".",
            Token::Comma => ",",
            Token::Open => "(",
            Token::Close => ")",
            Token::And => "&",
            Token::Ident(name) => name,
        }
    }
}

/// Lex a term into tokens paired with their byte offsets.
fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, TermError> {
    let mut lex = Token::lexer(input);
    let mut tokens = Vec::new();

    while let Some(token) = lex.next() {
        match token {
            Ok(token) => tokens.push((token, lex.span().start)),
            Err(()) => {
                return Err(TermError::UnexpectedToken {
                    found: lex.slice().to_string(),
                    position: lex.span().start,
                    input: input.to_string(),
                })
            }
        }
    }
    Ok(tokens)
}

enum BinderKind {
    Lambda,
    Exists,
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(Token, usize)>,
    cursor: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, TermError> {
        Ok(Self {
            input,
            tokens: tokenize(input)?,
            cursor: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|(token, _)| token)
    }

    fn next(&mut self) -> Result<(Token, usize), TermError> {
        let lexeme = self
            .tokens
            .get(self.cursor)
            .cloned()
            .ok_or_else(|| TermError::UnexpectedEnd {
                input: self.input.to_string(),
            })?;
        self.cursor += 1;
        Ok(lexeme)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self, token: &Token, position: usize) -> TermError {
        TermError::UnexpectedToken {
            found: token.text().to_string(),
            position,
            input: self.input.to_string(),
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), TermError> {
        let (token, position) = self.next()?;
        if &token == expected {
            Ok(())
        } else {
            Err(self.unexpected(&token, position))
        }
    }

    fn complete(mut self) -> Result<Term, TermError> {
        let term = self.expression()?;
        match self.tokens.get(self.cursor) {
            None => Ok(term),
            Some((_, position)) => Err(TermError::TrailingInput {
                position: *position,
                input: self.input.to_string(),
            }),
        }
    }

    fn expression(&mut self) -> Result<Term, TermError> {
        let mut left = self.operand()?;
        while self.eat(&Token::And) {
            let right = self.operand()?;
            left = Term::and(left, right);
        }
        Ok(left)
    }

    fn operand(&mut self) -> Result<Term, TermError> {
        match self.peek() {
            Some(Token::Lambda) => {
                self.cursor += 1;
                self.binder(BinderKind::Lambda)
            }
            Some(Token::Ident(name)) if EXISTS_KEYWORDS.contains(&name.as_str()) => {
                self.cursor += 1;
                self.binder(BinderKind::Exists)
            }
            _ => self.application(),
        }
    }

    fn binder(&mut self, kind: BinderKind) -> Result<Term, TermError> {
        let mut variables = Vec::new();
        loop {
            match self.next()? {
                (Token::Ident(name), _) => {
                    if VariableKind::of(&name).is_none() {
                        return Err(TermError::InvalidBinder { name });
                    }
                    variables.push(name);
                }
                (Token::Dot, _) if !variables.is_empty() => break,
                (token, position) => return Err(self.unexpected(&token, position)),
            }
        }
        let body = self.expression()?;
        Ok(match kind {
            BinderKind::Lambda => Term::lambdas(variables, body),
            BinderKind::Exists => Term::exists_all(variables, body),
        })
    }

    fn application(&mut self) -> Result<Term, TermError> {
        let mut term = self.primary()?;
        while self.eat(&Token::Open) {
            loop {
                let argument = self.expression()?;
                term = Term::app(term, argument);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
            self.expect(&Token::Close)?;
        }
        Ok(term)
    }

    fn primary(&mut self) -> Result<Term, TermError> {
        match self.next()? {
            (Token::Ident(name), _) => Ok(Term::atom(name)),
            (Token::Open, _) => {
                let inner = self.expression()?;
                self.expect(&Token::Close)?;
                Ok(inner)
            }
            (token, position) => Err(self.unexpected(&token, position)),
        }
    }
}

impl Term {
    /// Parse a term from its string form.
    ///
    /// ```rust
    /// use ccgsem_core::Term;
    ///
    /// let term = Term::parse(r"\x.EQUAL(x,reagan)").unwrap();
    /// assert_eq!(term.to_string(), r"\x.EQUAL(x,reagan)");
    /// ```
    pub fn parse(input: &str) -> Result<Term, TermError> {
        Parser::new(input)?.complete()
    }
}

impl FromStr for Term {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Term::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_atoms() {
        assert!(matches!(Term::parse("x").unwrap(), Term::Var(_)));
        assert!(matches!(Term::parse("reagan").unwrap(), Term::Const(_)));
        assert!(matches!(Term::parse("won:1").unwrap(), Term::Const(_)));
        assert!(Term::parse("None").unwrap().is_identity());
    }

    #[test]
    fn test_tokenize_offsets() {
        let tokens = tokenize(r"\x.won:1(e, x)").unwrap();
        let kinds: Vec<&str> = tokens.iter().map(|(t, _)| t.text()).collect();
        assert_eq!(kinds, vec!["\\", "x", ".", "won:1", "(", "e", ",", "x", ")"]);
        assert_eq!(tokens[3].1, 3);
        assert_eq!(tokens[7].1, 12);
    }

    #[test]
    fn test_parse_uncurried_application() {
        let term = Term::parse("COUNT(y,four)").unwrap();
        let (head, args) = term.uncurry();
        assert_eq!(head.name(), Some("COUNT"));
        assert_eq!(args.len(), 2);

        let curried = Term::parse("COUNT(y)(four)").unwrap();
        assert_eq!(term, curried);
    }

    #[test]
    fn test_lambda_body_extends_right() {
        let term = Term::parse(r"\x.P(x) & Q(x)").unwrap();
        match term {
            Term::Lambda(variable, body) => {
                assert_eq!(variable, "x");
                assert!(matches!(*body, Term::And(..)));
            }
            other => panic!("expected lambda, got {}", other),
        }
    }

    #[test]
    fn test_conjunction_is_left_associative() {
        let term = Term::parse("(a & b & c)").unwrap();
        match term {
            Term::And(left, right) => {
                assert!(matches!(*left, Term::And(..)));
                assert_eq!(right.name(), Some("c"));
            }
            other => panic!("expected conjunction, got {}", other),
        }
    }

    #[test]
    fn test_exists_spellings() {
        let a = Term::parse("exists x.P(x)").unwrap();
        let b = Term::parse("some x.P(x)").unwrap();
        assert!(matches!(a, Term::Exists(..)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_trip_strings() {
        let inputs = [
            r"\P Q e.exists z y.(P(z) & Q(y) & won:1(e,y) & won:2(e,z))",
            r"\P y.(P(y) & COUNT(y,four))",
            r"\x.EQUAL(x,reagan)",
            r"\P Q x.(P(x) & Q(x))",
            r"\P.exists x.(P(x) & TARGET(x))",
            r"\P Q y.exists z.(P(\x.EQUAL(x,z),y) & Q(z) & NEGATION(y))",
            r"(\x.P(x))(y)",
            "None",
        ];
        for input in inputs {
            let term = Term::parse(input).unwrap();
            assert_eq!(term.to_string(), input);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Term::parse(""),
            Err(TermError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            Term::parse("P(x"),
            Err(TermError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            Term::parse("P(x))"),
            Err(TermError::TrailingInput { .. })
        ));
        assert!(matches!(
            Term::parse(r"\reagan.P(reagan)"),
            Err(TermError::InvalidBinder { .. })
        ));
        assert!(matches!(
            Term::parse(r"\.P(x)"),
            Err(TermError::UnexpectedToken { .. })
        ));
    }
}
