//! Pure rock/paper/scissors rules.
//!
//! No session state lives here: this crate only knows what the three throws
//! are, how they are spelled on the wire, and who wins a single exchange.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod rules;
mod types;

pub use rules::outcome_for;
pub use types::{Outcome, ParseThrowError, Throw};
