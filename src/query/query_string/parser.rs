//! Parser for user-typed search queries
//!
//! Builds a [`BoolQuery`] from the token stream: positive clauses become
//! `must`, `-` clauses become `must_not`. A quoted phrase requires all of
//! its words (the artifact has no positional data, so adjacency cannot be
//! enforced). `title:` restricts a clause to title terms and `obj:` to
//! API symbols; an unknown field prefix is treated as literal query text.

use crate::query::ast::{MatchNoneQuery, QueryNode};
use crate::query::nodes::{BoolQuery, MatchQuery, ObjectQuery};
use crate::index::SearchField;
use crate::error::DocdexError;
use crate::Result;

use super::lexer::{Lexer, Token};

/// Parser for query strings
pub struct QueryStringParser {
    lexer: Lexer,
    current: Token,
}

impl QueryStringParser {
    /// Create a parser and prime the first token
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse a query string into an executable query node
    pub fn parse(input: &str) -> Result<Box<dyn QueryNode>> {
        Self::new(input)?.parse_query()
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn parse_query(mut self) -> Result<Box<dyn QueryNode>> {
        let mut query = BoolQuery::new();

        loop {
            match self.current.clone() {
                Token::Eof => break,
                Token::Minus => {
                    self.advance()?;
                    let clause = self.parse_clause()?;
                    query = query.must_not_boxed(clause);
                }
                Token::Colon => {
                    // A stray colon carries no meaning; skip it
                    self.advance()?;
                }
                _ => {
                    let clause = self.parse_clause()?;
                    query = query.must_boxed(clause);
                }
            }
        }

        if query.is_empty() {
            return Ok(Box::new(MatchNoneQuery));
        }
        Ok(Box::new(query))
    }

    fn parse_clause(&mut self) -> Result<Box<dyn QueryNode>> {
        match self.current.clone() {
            Token::QuotedString(phrase) => {
                self.advance()?;
                Ok(Box::new(MatchQuery::new(phrase)))
            }
            Token::Term(word) => {
                self.advance()?;

                if self.current != Token::Colon {
                    return Ok(Box::new(MatchQuery::new(word)));
                }

                // field:atom
                self.advance()?;
                let atom = match self.current.clone() {
                    Token::Term(value) => {
                        self.advance()?;
                        value
                    }
                    Token::QuotedString(value) => {
                        self.advance()?;
                        value
                    }
                    _ => {
                        return Err(DocdexError::QueryError(format!(
                            "expected a word after {:?}:",
                            word
                        )))
                    }
                };

                match word.to_lowercase().as_str() {
                    "title" => Ok(Box::new(MatchQuery::in_field(SearchField::Title, atom))),
                    "obj" | "object" => Ok(Box::new(ObjectQuery::new(atom))),
                    // Unknown prefix: the colon was part of the text
                    _ => Ok(Box::new(MatchQuery::new(format!("{} {}", word, atom)))),
                }
            }
            other => Err(DocdexError::QueryError(format!(
                "unexpected token {:?}",
                other
            ))),
        }
    }
}
