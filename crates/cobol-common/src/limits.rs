//! Centralized limits for tree walks.
//!
//! Trees come from an external parser. These bounds keep ancestor walks
//! finite even if a malformed tree ever contains a parent cycle.

/// Maximum number of parent links followed when looking for an enclosing
/// section or program.
pub const MAX_ANCESTOR_WALK: usize = 10_000;

/// Maximum nesting of contained programs followed when building the
/// global-variable view.
pub const MAX_PROGRAM_NESTING: usize = 256;
