//! Recursive descent parser
//!
//! ```text
//! expression = term (('+' | '-') term)*
//! term       = factor (('*' | '/') factor)*
//! factor     = NUMBER | IDENT '(' expression ')' | '(' expression ')' | IDENT
//! ```
//!
//! All binary operators are left associative. There is no unary minus.

use crate::ast::{BinaryOp, Expr};
use crate::lexer::{tokenize, Token};
use crate::stack::ensure_sufficient_stack;
use reckon_core::ReckonError;

/// Parse tokens into an expression tree
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Tokenize `input` and prepare to parse it
    pub fn new(input: &str) -> Self {
        Self::from_tokens(tokenize(input))
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Parse the whole token sequence as one expression
    pub fn parse(mut self) -> Result<Expr, ReckonError> {
        if self.tokens.is_empty() {
            return Err(ReckonError::empty_expression());
        }

        let expr = self.parse_expression()?;

        // Check that all tokens were consumed
        if let Some(token) = self.peek() {
            return Err(match token {
                Token::RParen => ReckonError::unexpected_closing_paren(),
                other => ReckonError::trailing_input(other.text()),
            });
        }

        tracing::debug!(expr = %expr, "parsed");
        Ok(expr)
    }

    // expression = term (('+' | '-') term)*
    fn parse_expression(&mut self) -> Result<Expr, ReckonError> {
        ensure_sufficient_stack(|| self.parse_sum())
    }

    fn parse_sum(&mut self) -> Result<Expr, ReckonError> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    // term = factor (('*' | '/') factor)*
    fn parse_term(&mut self) -> Result<Expr, ReckonError> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    // Order matters: number, function call, group, variable
    fn parse_factor(&mut self) -> Result<Expr, ReckonError> {
        let token = self.advance().ok_or_else(ReckonError::unexpected_eof)?;

        match token {
            // Overflowing literals parse as inf, which has no literal rendering
            Token::Number(text) => match text.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Expr::number(value)),
                Ok(_) => {
                    Err(ReckonError::invalid_number(&text).with_note("literal is out of range"))
                }
                Err(_) => Err(ReckonError::invalid_number(&text)),
            },
            Token::Identifier(name) if matches!(self.peek(), Some(Token::LParen)) => {
                self.advance(); // consume '('
                let arg = self.parse_expression()?;
                self.expect_closing_paren()?;
                Expr::call(&name, arg)
            }
            Token::LParen => {
                let inner = self.parse_expression()?;
                self.expect_closing_paren()?;
                Ok(inner)
            }
            Token::Identifier(name) => Ok(Expr::variable(name)),
            Token::RParen => Err(ReckonError::unexpected_closing_paren()),
            other => Err(ReckonError::unexpected_token(other.text())),
        }
    }

    fn expect_closing_paren(&mut self) -> Result<(), ReckonError> {
        match self.peek() {
            Some(Token::RParen) => {
                self.advance();
                Ok(())
            }
            found => Err(ReckonError::expected_closing_paren(found.map(Token::text))),
        }
    }
}

/// Parse an expression string into a tree
pub fn parse(input: &str) -> Result<Expr, ReckonError> {
    Parser::new(input)
        .parse()
        .map_err(|e| e.with_expression(input))
}
