//! Validation utilities for the Wisent buffer layout
//!
//! Pure functions with no I/O dependencies: checked offset arithmetic and
//! string/path checks.

pub mod bounds;
pub mod parsing;

pub use bounds::{advance, check_child_range};
pub use parsing::{parse_head_path, validate_string};
