//! Recursive-descent parser for the artifact object literal
//!
//! Produces a `serde_json::Value`; typed deserialization into the raw
//! index model happens afterwards via serde.

use serde_json::{Map, Number, Value};

use super::lexer::{Lexer, Token};
use crate::error::DocdexError;
use crate::Result;

/// Parser over the token stream of an object literal
pub struct LiteralParser {
    lexer: Lexer,
    current: Token,
}

impl LiteralParser {
    /// Create a parser for the given input and prime the first token
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the input as a single value followed by end of input
    pub fn parse(mut self) -> Result<Value> {
        let value = self.parse_value()?;
        if self.current != Token::Eof {
            return Err(self.error(format!("trailing input after literal: {:?}", self.current)));
        }
        Ok(value)
    }

    fn error(&self, message: String) -> DocdexError {
        DocdexError::Parse {
            line: self.lexer.line(),
            column: self.lexer.column(),
            message,
        }
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.current.clone() {
            Token::LeftBrace => self.parse_object(),
            Token::LeftBracket => self.parse_array(),
            Token::String(s) => {
                self.advance()?;
                Ok(Value::String(s))
            }
            Token::Int(n) => {
                self.advance()?;
                Ok(Value::Number(Number::from(n)))
            }
            Token::Float(f) => {
                self.advance()?;
                let number = Number::from_f64(f)
                    .ok_or_else(|| self.error(format!("non-finite number {}", f)))?;
                Ok(Value::Number(number))
            }
            Token::True => {
                self.advance()?;
                Ok(Value::Bool(true))
            }
            Token::False => {
                self.advance()?;
                Ok(Value::Bool(false))
            }
            Token::Null => {
                self.advance()?;
                Ok(Value::Null)
            }
            other => Err(self.error(format!("expected a value, found {:?}", other))),
        }
    }

    fn parse_object(&mut self) -> Result<Value> {
        // Skip `{`
        self.advance()?;

        let mut map = Map::new();
        if self.current == Token::RightBrace {
            self.advance()?;
            return Ok(Value::Object(map));
        }

        loop {
            let key = match self.current.clone() {
                Token::String(s) => s,
                Token::Ident(s) => s,
                other => return Err(self.error(format!("expected object key, found {:?}", other))),
            };
            self.advance()?;

            if self.current != Token::Colon {
                return Err(self.error(format!("expected ':', found {:?}", self.current)));
            }
            self.advance()?;

            let value = self.parse_value()?;
            map.insert(key, value);

            match self.current {
                Token::Comma => self.advance()?,
                Token::RightBrace => {
                    self.advance()?;
                    return Ok(Value::Object(map));
                }
                ref other => {
                    return Err(self.error(format!("expected ',' or '}}', found {:?}", other)))
                }
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        // Skip `[`
        self.advance()?;

        let mut items = Vec::new();
        if self.current == Token::RightBracket {
            self.advance()?;
            return Ok(Value::Array(items));
        }

        loop {
            items.push(self.parse_value()?);

            match self.current {
                Token::Comma => self.advance()?,
                Token::RightBracket => {
                    self.advance()?;
                    return Ok(Value::Array(items));
                }
                ref other => {
                    return Err(self.error(format!("expected ',' or ']', found {:?}", other)))
                }
            }
        }
    }
}
