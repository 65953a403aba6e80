//! Diagnostic text parsers.
//!
//! Every parser is a pure function from a raw command-output blob to an
//! optional typed value. Diagnostic output varies across device and OS
//! versions, and with whether a target application was named, so metrics
//! get several independent extraction strategies tried in a fixed order.
//! Absence is the only failure signal — malformed input never panics and
//! never yields a guessed default.

pub mod battery;
pub mod cpu;
pub mod graphics;
pub mod memory;
