//! Tokenizer
//!
//! Single pass, one character of lookahead. Whitespace is skipped and any
//! character outside the grammar is dropped with a warning.

use std::fmt;

/// Lexical token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Raw numeric text, validated later by the parser
    Number(String),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    /// Source text of the token
    pub fn text(&self) -> &str {
        match self {
            Token::Number(s) | Token::Identifier(s) => s,
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::LParen => "(",
            Token::RParen => ")",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Tokenize an expression string
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' => {
                tokens.push(Token::Plus);
                chars.next();
            }
            '-' => {
                tokens.push(Token::Minus);
                chars.next();
            }
            '*' => {
                tokens.push(Token::Star);
                chars.next();
            }
            '/' => {
                tokens.push(Token::Slash);
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        num_str.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(num_str));
            }
            c if c.is_alphabetic() => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Identifier(ident));
            }
            other => {
                tracing::warn!(character = %other, input, "skipping unrecognized character");
                chars.next();
            }
        }
    }

    tracing::trace!(count = tokens.len(), "tokenized");
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).iter().map(|t| t.text().to_string()).collect()
    }

    #[test]
    fn test_tokenize_simple() {
        let tokens = tokenize("a + b");
        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[0], Token::Identifier(_)));
        assert!(matches!(tokens[1], Token::Plus));
        assert!(matches!(tokens[2], Token::Identifier(_)));
    }

    #[test]
    fn test_operators_and_parens() {
        assert_eq!(texts("(1+2)*3/4-5"), vec!["(", "1", "+", "2", ")", "*", "3", "/", "4", "-", "5"]);
    }

    #[test]
    fn test_whitespace_is_skipped() {
        assert_eq!(texts("  12 \t*\n x  "), vec!["12", "*", "x"]);
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_numbers_are_greedy() {
        assert_eq!(tokenize("3.14"), vec![Token::Number("3.14".to_string())]);
        assert_eq!(tokenize("3.4.5"), vec![Token::Number("3.4.5".to_string())]);
        assert_eq!(tokenize(".5"), vec![Token::Number(".5".to_string())]);
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(texts("sin(x2)"), vec!["sin", "(", "x2", ")"]);
        // Case-sensitive, must start with a letter
        assert_eq!(texts("Abc 2abc"), vec!["Abc", "2", "abc"]);
    }

    #[test]
    fn test_unrecognized_characters_are_dropped() {
        assert_eq!(texts("5 @ 3"), vec!["5", "3"]);
        assert_eq!(texts("x_1"), vec!["x", "1"]);
        assert_eq!(texts("2^3"), vec!["2", "3"]);
    }
}
