//! Tokenizer for keypad expressions.
//!
//! Splits an expression string into numbers, the four arithmetic operators
//! and parentheses. Anything else is skipped.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    /// A single operator or parenthesis, or a run of digits with an optional
    /// decimal point and fraction.
    static ref TOKEN: Regex = Regex::new(r"[+\-*/()]|\d+\.?\d*").unwrap();
}

/// Errors raised while turning an expression string into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no tokens found in expression")]
    NoTokens,
    #[error("invalid number literal: {0}")]
    InvalidNumber(String),
}

/// One of the four binary operators understood by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    /// Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    LParen,
    RParen,
}

/// Tokenize an expression.
///
/// A `-` that opens the string and is directly followed by a digit belongs to
/// the first number, so a result like `-3` can be fed back in unchanged.
/// Every other `-` is the subtraction operator.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let (negate_first, body) = match input.strip_prefix('-') {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => (true, rest),
        _ => (false, input),
    };

    let mut tokens = Vec::new();
    for m in TOKEN.find_iter(body) {
        let text = m.as_str();
        let token = match text {
            "(" => Token::LParen,
            ")" => Token::RParen,
            _ => match text.chars().next().and_then(Operator::from_symbol) {
                Some(op) if text.len() == 1 => Token::Operator(op),
                _ => Token::Number(parse_number(text)?),
            },
        };
        tokens.push(token);
    }

    if tokens.is_empty() {
        return Err(ParseError::NoTokens);
    }

    if negate_first && let Some(Token::Number(n)) = tokens.first_mut() {
        *n = -*n;
    }

    Ok(tokens)
}

fn parse_number(text: &str) -> Result<f64, ParseError> {
    // "12." is a complete literal on the keypad
    text.trim_end_matches('.')
        .parse()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_and_operators() {
        assert_eq!(
            tokenize("2+3.5*4").unwrap(),
            vec![
                Token::Number(2.0),
                Token::Operator(Operator::Add),
                Token::Number(3.5),
                Token::Operator(Operator::Mul),
                Token::Number(4.0),
            ]
        );
    }

    #[test]
    fn test_parentheses_are_tokens() {
        assert_eq!(
            tokenize("(1)").unwrap(),
            vec![Token::LParen, Token::Number(1.0), Token::RParen]
        );
    }

    #[test]
    fn test_trailing_dot() {
        assert_eq!(tokenize("12.").unwrap(), vec![Token::Number(12.0)]);
    }

    #[test]
    fn test_unknown_characters_skipped() {
        assert_eq!(
            tokenize(" 7 x 2 ").unwrap(),
            vec![Token::Number(7.0), Token::Number(2.0)]
        );
        // a bare leading dot is not part of the literal
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(5.0)]);
    }

    #[test]
    fn test_leading_sign_merges_into_first_number() {
        assert_eq!(
            tokenize("-3-1").unwrap(),
            vec![
                Token::Number(-3.0),
                Token::Operator(Operator::Sub),
                Token::Number(1.0),
            ]
        );
    }

    #[test]
    fn test_minus_elsewhere_is_an_operator() {
        assert_eq!(
            tokenize("2*-3").unwrap(),
            vec![
                Token::Number(2.0),
                Token::Operator(Operator::Mul),
                Token::Operator(Operator::Sub),
                Token::Number(3.0),
            ]
        );
        assert_eq!(
            tokenize("- 3").unwrap(),
            vec![Token::Operator(Operator::Sub), Token::Number(3.0)]
        );
    }

    #[test]
    fn test_no_tokens() {
        assert_eq!(tokenize("").unwrap_err(), ParseError::NoTokens);
        assert_eq!(tokenize("abc").unwrap_err(), ParseError::NoTokens);
        assert_eq!(tokenize("...").unwrap_err(), ParseError::NoTokens);
    }

    #[test]
    fn test_precedence_table() {
        assert!(Operator::Mul.precedence() > Operator::Add.precedence());
        assert_eq!(Operator::Mul.precedence(), Operator::Div.precedence());
        assert_eq!(Operator::Add.precedence(), Operator::Sub.precedence());
    }

    #[test]
    fn test_symbols() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(Operator::from_symbol('^'), None);
    }
}
