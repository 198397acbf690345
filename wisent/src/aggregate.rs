//! Parallel numeric aggregation
//!
//! Same grouping and truncation rules as [`wisent_core::sum_numeric`], with
//! the per-group sums computed on the rayon pool.

use rayon::prelude::*;
use wisent_core::{aggregate::sum_run, ArgumentRun, Element, Expression, WisentError};

use crate::Result;

/// Sum of the numeric groups among `expression`'s direct children
///
/// Groups are combined in a tree rather than left to right, so a sum whose
/// running total overflows part way but whose final total fits may succeed
/// here and fail sequentially.
pub fn par_sum_numeric(expression: &Expression<'_>) -> Result<i64> {
    let runs: Vec<ArgumentRun<'_>> = expression.children()?.collect();
    let total = runs.par_iter().map(sum_run).try_reduce(
        || 0,
        |left, right| left.checked_add(right).ok_or(WisentError::AggregateOverflow),
    )?;
    Ok(total)
}

/// Parallel sum over an element's children; fails for scalar slots
pub fn par_sum_element(element: &Element<'_>) -> Result<i64> {
    par_sum_numeric(&element.expression()?)
}
