//! # glossa-chars
//!
//! Character model: per-context next-character frequencies for every order
//! up to a configured maximum, blended into a single distribution by
//! interpolating from the longest matching context down to order zero.

pub mod blend;
pub mod history;
pub mod model;
pub mod table;

pub use history::CharHistory;
pub use model::{CharView, CharacterModel};
pub use table::{ContextStats, ContextTable, TableStats};
