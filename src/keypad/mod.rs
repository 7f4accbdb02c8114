//! Keypad front end state.
//!
//! The keypad keeps two strings side by side: what the display shows and the
//! raw expression that is handed to the evaluator when `=` is pressed. Each
//! key press is a pure transition from one [`KeypadState`] to the next.

mod state;

pub use state::KeypadState;

use crate::calculator::Operator;

/// A button on the keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A digit button, `0` to `9`.
    Digit(u8),
    /// The decimal point.
    Dot,
    /// "AC", reset everything.
    Clear,
    /// "±", flip the sign of the entry.
    ToggleSign,
    /// "%", divide the current entry by 100.
    Percent,
    Operator(Operator),
    Equals,
}

impl Key {
    /// Map a typed character to a key.
    ///
    /// Besides the symbols printed on the keypad this accepts `c`/`C` for
    /// clear, `~` for the sign toggle and `x` for multiplication.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => c.to_digit(10).map(|d| Self::Digit(d as u8)),
            '.' => Some(Self::Dot),
            'c' | 'C' => Some(Self::Clear),
            '~' | '±' => Some(Self::ToggleSign),
            '%' => Some(Self::Percent),
            '=' => Some(Self::Equals),
            'x' | '×' => Some(Self::Operator(Operator::Mul)),
            '÷' => Some(Self::Operator(Operator::Div)),
            '−' => Some(Self::Operator(Operator::Sub)),
            _ => Operator::from_symbol(c).map(Self::Operator),
        }
    }

    /// Get the label printed on the button.
    pub fn label(&self) -> &'static str {
        const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

        match self {
            Self::Digit(d) => DIGITS.get(*d as usize).copied().unwrap_or("?"),
            Self::Dot => ".",
            Self::Clear => "AC",
            Self::ToggleSign => "±",
            Self::Percent => "%",
            Self::Operator(Operator::Add) => "+",
            Self::Operator(Operator::Sub) => "−",
            Self::Operator(Operator::Mul) => "×",
            Self::Operator(Operator::Div) => "÷",
            Self::Equals => "=",
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Operator> for Key {
    fn from(op: Operator) -> Self {
        Self::Operator(op)
    }
}
