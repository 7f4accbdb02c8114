use super::Key;
use crate::calculator::{Operator, UNDEFINED_TEXT, evaluate, format_number};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Leading number of the display, the way `%` reads it.
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+|Infinity)").unwrap();
}

/// Display and expression strings of the keypad.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeypadState {
    /// What the display shows.
    pub display: String,
    /// The expression handed to the evaluator on `=`.
    pub expression: String,
}

impl Default for KeypadState {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            expression: String::new(),
        }
    }
}

impl KeypadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the state after pressing `key`.
    pub fn press(&self, key: Key) -> Self {
        let next = match key {
            Key::Digit(d) => self.input_digit(d),
            Key::Dot => self.input_dot(),
            Key::Clear => Self::default(),
            Key::ToggleSign => self.toggle_sign(),
            Key::Percent => self.input_percent(),
            Key::Operator(op) => self.input_operator(op),
            Key::Equals => self.equals(),
        };

        tracing::trace!(
            key = %key,
            display = %next.display,
            expression = %next.expression,
            "key pressed"
        );
        next
    }

    /// Press every key in `keys` in order.
    ///
    /// Whitespace is skipped; characters that are not keys are logged and
    /// skipped too.
    pub fn press_all(&self, keys: &str) -> Self {
        keys.chars()
            .filter(|c| !c.is_whitespace())
            .fold(self.clone(), |state, c| match Key::from_char(c) {
                Some(key) => state.press(key),
                None => {
                    tracing::warn!(key = %c, "not a keypad key");
                    state
                }
            })
    }

    fn input_digit(&self, digit: u8) -> Self {
        let digit = char::from(b'0' + digit.min(9));

        if self.display == "0" {
            Self::from_text(digit.to_string())
        } else {
            self.append(digit)
        }
    }

    fn input_dot(&self) -> Self {
        // only the operand being typed matters
        let entry = match self.display.rfind(['+', '-', '*', '/']) {
            Some(pos) => &self.display[pos + 1..],
            None => self.display.as_str(),
        };

        if entry.contains('.') {
            self.clone()
        } else {
            self.append('.')
        }
    }

    fn toggle_sign(&self) -> Self {
        match self.display.strip_prefix('-') {
            Some(display) => Self {
                display: display.to_string(),
                expression: self
                    .expression
                    .strip_prefix('-')
                    .unwrap_or(&self.expression)
                    .to_string(),
            },
            None => Self {
                display: format!("-{}", self.display),
                expression: format!("-{}", self.expression),
            },
        }
    }

    fn input_percent(&self) -> Self {
        let Some(value) = leading_number(&self.display) else {
            return Self::from_text(UNDEFINED_TEXT.to_string());
        };

        if value == 0.0 {
            return self.clone();
        }

        Self::from_text(format_number(value / 100.0))
    }

    fn input_operator(&self, op: Operator) -> Self {
        if self.expression.is_empty() {
            return self.clone();
        }

        let ends_with_operator = |s: &str| s.ends_with(['+', '-', '*', '/']);

        if ends_with_operator(&self.expression) {
            let mut next = self.clone();
            next.expression.pop();
            next.expression.push(op.symbol());
            if ends_with_operator(&next.display) {
                next.display.pop();
            }
            next.display.push(op.symbol());
            next
        } else {
            self.append(op.symbol())
        }
    }

    fn equals(&self) -> Self {
        let result = evaluate(&self.expression);
        tracing::debug!(expression = %self.expression, %result, "evaluated keypad expression");
        Self::from_text(result)
    }

    fn append(&self, c: char) -> Self {
        let mut next = self.clone();
        next.display.push(c);
        next.expression.push(c);
        next
    }

    fn from_text(text: String) -> Self {
        Self {
            display: text.clone(),
            expression: text,
        }
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let m = LEADING_NUMBER.find(text)?;
    let literal = m.as_str().trim();

    match literal.trim_start_matches(['+', '-']) {
        "Infinity" if literal.starts_with('-') => Some(f64::NEG_INFINITY),
        "Infinity" => Some(f64::INFINITY),
        _ => literal.trim_end_matches('.').parse().ok(),
    }
}
