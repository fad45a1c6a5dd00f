//! Property-based tests for the character sheet engine
//!
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Test Modules
//!
//! - `modifier_props`: ability modifier arithmetic
//!   - Modifier is the floor of (score - 10) / 2
//!   - Modifier is monotonic in the score
//!
//! - `overlay_props`: overlay recomputation against a real database
//!   - Overlay equals base plus the bonuses of the current link set
//!   - Result does not depend on equip order
//!   - Unequipping everything leaves no overlay
//!
//! By default, proptest runs 256 cases per property. The database-backed
//! properties lower this, and `PROPTEST_CASES` overrides both.

mod modifier_props;
mod overlay_props;
