//! ASCII plotting for the one-shot `show --plot` output.

pub mod ascii;

pub use ascii::*;
