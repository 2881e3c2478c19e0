//! A keypad-driven arithmetic calculator.
//!
//! Key presses and button activations become [`keypad::Command`]s, which a
//! [`session::Session`] applies to a [`calculator::Editor`] and reflects on a
//! [`display::Display`].

pub mod calculator;
pub mod config;
pub mod display;
pub mod keypad;
pub mod session;
