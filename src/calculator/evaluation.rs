//! Expression evaluation.
//!
//! Evaluates a flat infix expression with two stacks, one for operands and
//! one for pending operators. `*` and `/` bind tighter than `+` and `-`;
//! operators of equal precedence apply left to right. Parentheses are
//! tokenized but take no part in the evaluation order.

use super::token::{Operator, ParseError, Token, tokenize};

/// Text returned by [`evaluate`] when the input holds no tokens.
pub const ERROR_TEXT: &str = "Error";

/// Text returned by [`evaluate`] when the result is undefined.
pub const UNDEFINED_TEXT: &str = "NaN";

/// A value on the operand stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Value(f64),
    /// Result of an operation with no defined value, such as division by
    /// zero. Anything combined with it stays undefined.
    Undefined,
}

impl Operand {
    /// Wrap a float, mapping NaN to `Undefined`.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Self::Undefined
        } else {
            Self::Value(value)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Apply `op` with `self` on the left and `rhs` on the right.
    pub fn apply(self, op: Operator, rhs: Operand) -> Operand {
        let (Self::Value(a), Self::Value(b)) = (self, rhs) else {
            return Self::Undefined;
        };

        match op {
            Operator::Add => Self::from_f64(a + b),
            Operator::Sub => Self::from_f64(a - b),
            Operator::Mul => Self::from_f64(a * b),
            Operator::Div if b == 0.0 => Self::Undefined,
            Operator::Div => Self::from_f64(a / b),
        }
    }
}

/// Evaluate an already tokenized expression.
///
/// Never fails: a dangling operator (`5+`, `*2`) or an expression with no
/// numbers at all evaluates to [`Operand::Undefined`]. When numbers are left
/// over without an operator between them, the last one wins.
pub fn evaluate_tokens(tokens: &[Token]) -> Operand {
    let mut operands: Vec<Operand> = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Operator> = Vec::new();

    for token in tokens {
        match *token {
            Token::Number(n) => operands.push(Operand::from_f64(n)),
            Token::Operator(op) => {
                while let Some(&top) = operators.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    operators.pop();
                    reduce(&mut operands, top);
                }
                operators.push(op);
            }
            Token::LParen | Token::RParen => {}
        }
    }

    while let Some(op) = operators.pop() {
        reduce(&mut operands, op);
    }

    operands.pop().unwrap_or(Operand::Undefined)
}

/// Pop two operands, apply `op` and push the result.
fn reduce(operands: &mut Vec<Operand>, op: Operator) {
    let rhs = operands.pop();
    let lhs = operands.pop();

    let result = match (lhs, rhs) {
        (Some(lhs), Some(rhs)) => lhs.apply(op, rhs),
        _ => {
            tracing::debug!(operator = %op, "missing operand");
            Operand::Undefined
        }
    };

    operands.push(result);
}

/// Tokenize and evaluate an expression.
pub fn evaluate_expression(input: &str) -> Result<Operand, ParseError> {
    let tokens = tokenize(input)?;
    let result = evaluate_tokens(&tokens);
    tracing::trace!(input, tokens = tokens.len(), ?result, "evaluated");
    Ok(result)
}

/// Evaluate an expression to its display text.
///
/// Returns [`ERROR_TEXT`] when nothing could be tokenized,
/// [`UNDEFINED_TEXT`] for an undefined result, and the number otherwise.
pub fn evaluate(input: &str) -> String {
    match evaluate_expression(input) {
        Ok(Operand::Value(v)) => format_number(v),
        Ok(Operand::Undefined) => UNDEFINED_TEXT.to_string(),
        Err(e) => {
            tracing::debug!(input, error = %e, "parse failed");
            ERROR_TEXT.to_string()
        }
    }
}

/// Canonical text for a number.
///
/// Shortest decimal that reads back to the same value, never in exponent
/// form, so every finite result is itself a valid expression.
pub fn format_number(value: f64) -> String {
    if value.is_infinite() {
        if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        // also covers -0
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Insert thousand separators into the integer part of a formatted number.
fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(pos) => unsigned.split_at(pos),
        None => (unsigned, ""),
    };

    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return text.to_string();
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}{}{}", sign, grouped, frac_part)
}

/// Result of evaluating a calculator expression.
#[derive(Clone, Debug)]
pub enum CalcResult {
    /// The expression produced a number.
    Success {
        /// The original expression.
        expression: String,
        /// The numeric value.
        value: f64,
        /// Formatted for display, possibly with thousand separators.
        display_result: String,
        /// Formatted for clipboard (canonical number text).
        clipboard_result: String,
    },
    /// The expression evaluated to an undefined value.
    Undefined { expression: String },
    /// Nothing in the expression could be tokenized.
    Error {
        expression: String,
        error: ParseError,
    },
}

impl CalcResult {
    /// Evaluate `input`, grouping the integer digits of the displayed
    /// result when `group_digits` is set.
    pub fn new(input: &str, group_digits: bool) -> Self {
        let expression = input.trim().to_string();

        match evaluate_expression(&expression) {
            Ok(Operand::Value(value)) => {
                let clipboard_result = format_number(value);
                let display_result = if group_digits {
                    group_thousands(&clipboard_result)
                } else {
                    clipboard_result.clone()
                };
                Self::Success {
                    expression,
                    value,
                    display_result,
                    clipboard_result,
                }
            }
            Ok(Operand::Undefined) => Self::Undefined { expression },
            Err(error) => Self::Error { expression, error },
        }
    }

    /// Get the expression that was evaluated.
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. }
            | Self::Undefined { expression }
            | Self::Error { expression, .. } => expression,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Get the display string.
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display_result, .. } => display_result,
            Self::Undefined { .. } => UNDEFINED_TEXT,
            Self::Error { .. } => ERROR_TEXT,
        }
    }

    /// Get the clipboard string (only for numeric results).
    pub fn clipboard(&self) -> Option<&str> {
        match self {
            Self::Success {
                clipboard_result, ..
            } => Some(clipboard_result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("2+3*4"), "14");
        assert_eq!(evaluate("2*3+4"), "10");
        assert_eq!(evaluate("1+8/4-2"), "1");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(evaluate("10-2-3"), "5");
        assert_eq!(evaluate("8/2/2"), "2");
        assert_eq!(evaluate("2*6/3*2"), "8");
    }

    #[test]
    fn test_decimals() {
        assert_eq!(evaluate("1.5*2"), "3");
        assert_eq!(evaluate("0.1+0.2"), "0.30000000000000004");
        assert_eq!(evaluate("1/4"), "0.25");
    }

    #[test]
    fn test_division_by_zero_is_undefined() {
        assert_eq!(evaluate("5/0"), UNDEFINED_TEXT);
        assert_eq!(evaluate_expression("5/0").unwrap(), Operand::Undefined);
        // the sentinel propagates through later operations
        assert_eq!(evaluate("5/0+1"), UNDEFINED_TEXT);
        assert_eq!(evaluate("1+0*5/0*3"), UNDEFINED_TEXT);
    }

    #[test]
    fn test_parse_error() {
        assert_eq!(evaluate(""), ERROR_TEXT);
        assert_eq!(evaluate("hello"), ERROR_TEXT);
        assert_eq!(evaluate_expression(" ").unwrap_err(), ParseError::NoTokens);
    }

    #[test]
    fn test_parentheses_are_inert() {
        assert_eq!(evaluate("3+(2*2)"), "7");
        assert_eq!(evaluate("(1+2)*3"), "7");
        assert_eq!(evaluate("()"), UNDEFINED_TEXT);
    }

    #[test]
    fn test_dangling_operators() {
        assert_eq!(evaluate("5+"), UNDEFINED_TEXT);
        assert_eq!(evaluate("*5"), UNDEFINED_TEXT);
        assert_eq!(evaluate("2*-3"), UNDEFINED_TEXT);
    }

    #[test]
    fn test_leftover_operands() {
        assert_eq!(evaluate("2 3"), "3");
    }

    #[test]
    fn test_negative_results_round_trip() {
        let result = evaluate("2-5");
        assert_eq!(result, "-3");
        assert_eq!(evaluate(&result), "-3");
        assert_eq!(evaluate("-3*2"), "-6");
    }

    #[test]
    fn test_results_are_idempotent() {
        for input in ["2+3*4", "1/3", "0.1+0.2", "1-9", "123456789*1000", "7/8"] {
            let first = evaluate(input);
            assert_eq!(evaluate(&first), first, "input {}", input);
        }
    }

    #[test]
    fn test_left_to_right_reference() {
        // compare against a hand-rolled two-pass evaluation
        use Operator::*;
        let cases = vec![
            (vec![1.0, 2.0, 3.0, 4.0], vec![Sub, Mul, Div]),
            (vec![9.0, 3.0, 3.0, 2.0], vec![Div, Sub, Add]),
            (vec![2.0, 2.0, 2.0, 2.0, 5.0], vec![Mul, Add, Mul, Sub]),
        ];

        for (numbers, ops) in &cases {
            let mut text = format_number(numbers[0]);
            for (op, n) in ops.iter().zip(&numbers[1..]) {
                text.push(op.symbol());
                text.push_str(&format_number(*n));
            }

            // first pass folds * and /, second pass folds + and -
            let mut terms = vec![numbers[0]];
            let mut signs = Vec::new();
            for (op, &n) in ops.iter().zip(&numbers[1..]) {
                match op {
                    Operator::Mul => *terms.last_mut().unwrap() *= n,
                    Operator::Div => *terms.last_mut().unwrap() /= n,
                    _ => {
                        terms.push(n);
                        signs.push(*op);
                    }
                }
            }
            let mut expected = terms[0];
            for (op, t) in signs.iter().zip(&terms[1..]) {
                match op {
                    Operator::Add => expected += t,
                    _ => expected -= t,
                }
            }

            assert_eq!(
                evaluate_expression(&text).unwrap(),
                Operand::Value(expected),
                "expression {}",
                text
            );
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(1e21), "1000000000000000000000");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_nan_from_arithmetic_is_undefined() {
        let inf = Operand::Value(f64::INFINITY);
        assert_eq!(inf.apply(Operator::Sub, inf), Operand::Undefined);
        assert_eq!(
            Operand::Undefined.apply(Operator::Add, Operand::Value(1.0)),
            Operand::Undefined
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1000000"), "1,000,000");
        assert_eq!(group_thousands("-1234.5678"), "-1,234.5678");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("Infinity"), "Infinity");
    }

    #[test]
    fn test_calc_result() {
        let result = CalcResult::new(" 1000 * 1000 ", true);
        assert!(result.is_success());
        assert_eq!(result.expression(), "1000 * 1000");
        assert_eq!(result.display(), "1,000,000");
        assert_eq!(result.clipboard(), Some("1000000"));

        let result = CalcResult::new("1000*1000", false);
        assert_eq!(result.display(), "1000000");
    }

    #[test]
    fn test_calc_result_failures() {
        let result = CalcResult::new("1/0", true);
        assert!(!result.is_success());
        assert_eq!(result.display(), "NaN");
        assert_eq!(result.clipboard(), None);

        let result = CalcResult::new("", true);
        assert!(matches!(result, CalcResult::Error { .. }));
        assert_eq!(result.display(), "Error");
    }
}
