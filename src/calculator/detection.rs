//! Expression detection for the calculator.
//!
//! Tells the front end whether a line of input is something the keypad
//! evaluator can make sense of, and which characters it would skip.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches strings containing only characters the tokenizer consumes,
    /// plus whitespace.
    static ref KEYPAD_SAFE_CHARS: Regex = Regex::new(r"^[\d\s\.\+\-\*/()]+$").unwrap();
}

/// Check if input looks like a keypad expression.
///
/// Returns `true` if the input:
/// 1. Contains only keypad characters
/// 2. Has at least one binary operator
/// 3. Is not just a plain number
pub fn looks_like_expression(input: &str) -> bool {
    let trimmed = input.trim();

    if trimmed.len() < 2 {
        return false;
    }

    if !KEYPAD_SAFE_CHARS.is_match(trimmed) {
        return false;
    }

    if is_plain_number(trimmed) {
        return false;
    }

    has_operator(trimmed)
}

/// Characters the tokenizer will silently skip, in order of appearance.
///
/// Whitespace is not reported. A `.` is reported only when it cannot be part
/// of a number literal, as in `.5`, `1..2` or `1.5.3`.
pub fn ignored_chars(input: &str) -> Vec<char> {
    let mut ignored = Vec::new();
    // (inside a digit run, that run already has its decimal point)
    let mut number = None;

    for c in input.chars() {
        number = match (c, number) {
            ('0'..='9', None) => Some(false),
            ('0'..='9', Some(dot)) => Some(dot),
            ('.', Some(false)) => Some(true),
            _ => {
                let kept = matches!(c, '+' | '-' | '*' | '/' | '(' | ')') || c.is_whitespace();
                if !kept {
                    ignored.push(c);
                }
                None
            }
        };
    }

    ignored
}

/// Check if the input is just a plain number (no operations).
fn is_plain_number(input: &str) -> bool {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    // Allow optional leading minus for negative numbers
    let to_check = cleaned.strip_prefix('-').unwrap_or(&cleaned);

    !to_check.is_empty() && to_check.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Check if input contains a binary operator.
fn has_operator(input: &str) -> bool {
    if input.contains('+') || input.contains('*') || input.contains('/') {
        return true;
    }

    // A minus counts unless it only opens the expression
    let chars: Vec<char> = input.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' && i > 0 {
            let prev_non_space = chars[..i]
                .iter()
                .rev()
                .find(|&&ch| !ch.is_whitespace())
                .copied();

            if let Some(prev) = prev_non_space
                && (prev.is_ascii_digit() || prev == ')' || prev == '.')
            {
                return true;
            }
        }
    }

    false
}
