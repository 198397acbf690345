//! Checked offset arithmetic for section and slot access
//!
//! Pure functions with no I/O. Every derived offset in the buffer goes
//! through [`advance`].

use crate::error::{Result, WisentError};
use core::ops::Range;

/// Span of `count` elements of `element_size` bytes starting at `cursor`
///
/// Fails closed on overflow instead of wrapping.
pub const fn advance(cursor: usize, count: usize, element_size: usize) -> Result<Range<usize>> {
    let len = match count.checked_mul(element_size) {
        Some(len) => len,
        None => return Err(WisentError::ArraySizeOverflow),
    };
    match cursor.checked_add(len) {
        Some(end) => Ok(cursor..end),
        None => Err(WisentError::ArraySizeOverflow),
    }
}

/// Validate an argument slot index against the argument count
pub const fn check_argument_index(index: usize, count: usize) -> Result<()> {
    if index >= count {
        return Err(WisentError::ArgumentOutOfBounds { index, count });
    }
    Ok(())
}

/// Validate an expression descriptor index against the expression count
pub const fn check_expression_index(index: usize, count: usize) -> Result<()> {
    if index >= count {
        return Err(WisentError::ExpressionOutOfBounds { index, count });
    }
    Ok(())
}

/// Validate a descriptor's child range: `start <= end <= argument_count`
pub fn check_child_range(
    expression: usize,
    start: u64,
    end: u64,
    argument_count: usize,
) -> Result<Range<usize>> {
    let invalid = WisentError::InvalidChildRange {
        expression,
        start,
        end,
    };
    let start_index = usize::try_from(start).map_err(|_| invalid)?;
    let end_index = usize::try_from(end).map_err(|_| invalid)?;
    if start_index > end_index || end_index > argument_count {
        return Err(invalid);
    }
    Ok(start_index..end_index)
}
