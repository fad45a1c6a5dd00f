//! Database Models
//!
//! Record types mapped from SQLite rows.
//!
//! - `character`: characters, base attributes and the temporary overlay
//! - `catalog`: equipment, class and armor definitions, progression tables
//! - `links`: join rows tying catalog entries to characters

mod catalog;
mod character;
mod links;


pub use catalog::*;
pub use character::*;
pub use links::*;
