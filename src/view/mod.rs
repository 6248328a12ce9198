//! Derived view state.
//!
//! Pure functions from loaded data + user choices to what the presentation
//! layer renders:
//!
//! - lookback filtering (`range`)
//! - selectable series derivation and sticky selection (`series`)
//! - search/sort/paginate table pages (`table`)
//! - gap-aware chart series preparation (`chart`)
//!
//! Everything here recomputes eagerly; nothing holds hidden state, so the same
//! inputs always produce the same view.

pub mod chart;
pub mod range;
pub mod series;
pub mod table;

pub use chart::*;
pub use range::*;
pub use series::*;
pub use table::*;
