//! A keypad calculator.
//!
//! [`calculator`] holds the expression evaluator, [`keypad`] the button
//! state machine that feeds it, and [`config`] the user settings read by the
//! `zcalc` binary.

pub mod calculator;
pub mod config;
pub mod keypad;
