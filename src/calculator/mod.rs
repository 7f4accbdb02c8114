//! Calculator module for evaluating keypad expressions.
//!
//! This module provides functionality to:
//! - Tokenize an expression into numbers and operators
//! - Evaluate it with `*` and `/` binding tighter than `+` and `-`
//! - Detect whether user input looks like an expression
//! - Copy results to the clipboard

mod clipboard;
mod detection;
mod evaluation;
mod token;

pub use clipboard::{ClipboardError, copy_to_clipboard};
pub use detection::{ignored_chars, looks_like_expression};
pub use evaluation::{
    CalcResult, ERROR_TEXT, Operand, UNDEFINED_TEXT, evaluate, evaluate_expression,
    evaluate_tokens, format_number,
};
pub use token::{Operator, ParseError, Token, tokenize};
