//! Numeric aggregation over run-grouped children
//!
//! Integer runs are summed exactly with overflow checking. Double runs are
//! summed as doubles and the group total is truncated toward zero before it
//! joins the integer total. Other known types are skipped.

use crate::atom::Element;
use crate::error::{Result, WisentError};
use crate::expression::{ArgumentRun, Expression};
use crate::format::ArgumentType;

/// Sum of the numeric groups among `expression`'s direct children
pub fn sum_numeric(expression: &Expression<'_>) -> Result<i64> {
    sum_runs(expression.children()?)
}

/// Sum of the numeric groups among an element's direct children
///
/// Fails with `NotAnExpression` for scalar slots.
pub fn sum_element(element: &Element<'_>) -> Result<i64> {
    sum_numeric(&element.expression()?)
}

/// Sum any sequence of argument runs
pub fn sum_runs<'a, I>(runs: I) -> Result<i64>
where
    I: IntoIterator<Item = ArgumentRun<'a>>,
{
    runs.into_iter().try_fold(0i64, |total, run| {
        total
            .checked_add(sum_run(&run)?)
            .ok_or(WisentError::AggregateOverflow)
    })
}

/// Contribution of one run to the total
pub fn sum_run(run: &ArgumentRun<'_>) -> Result<i64> {
    match run.argument_type()? {
        ArgumentType::Long => run
            .values::<i64>()?
            .try_fold(0i64, |total, value| total.checked_add(value))
            .ok_or(WisentError::AggregateOverflow),
        ArgumentType::Double => truncate(run.values::<f64>()?.sum()),
        _ => Ok(0),
    }
}

/// Truncate a double total toward zero, rejecting values outside `i64`
pub fn truncate(total: f64) -> Result<i64> {
    // 2^63 is exactly representable; i64::MAX is not
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if !total.is_finite() || total >= LIMIT || total < -LIMIT {
        return Err(WisentError::AggregateOverflow);
    }
    Ok(total as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::tests::raw_buffer;
    use crate::buffer::Buffer;
    use crate::format::{ExpressionDescriptor, TypeTag};

    #[test]
    fn test_sum_integer_run() {
        // (root 10 20 30) as a compressed run
        let bytes = raw_buffer(
            &[0, 10, 20, 30],
            &[5, TypeTag::run(ArgumentType::Long).raw(), 3, 0],
            &[ExpressionDescriptor::new(0, 1, 4)],
            b"root\0",
        );
        let buffer = Buffer::new(&bytes).unwrap();
        let root = buffer.root().unwrap();

        assert_eq!(sum_element(&root), Ok(60));
    }

    #[test]
    fn test_sum_mixed_groups() {
        // (root 1.75 2.5 7 "s") -> trunc(1.75) + trunc(2.5) + 7
        let bytes = raw_buffer(
            &[0, 1.75f64.to_bits(), 2.5f64.to_bits(), 7, 0],
            &[5, 2, 2, 1, 3],
            &[ExpressionDescriptor::new(2, 1, 5)],
            b"s\0root\0",
        );
        let buffer = Buffer::new(&bytes).unwrap();
        let root = buffer.expression(0).unwrap();

        assert_eq!(sum_numeric(&root), Ok(1 + 2 + 7));
    }

    #[test]
    fn test_sum_double_run_truncates_group_total() {
        let bytes = raw_buffer(
            &[0, 0.5f64.to_bits(), 0.5f64.to_bits(), 0.75f64.to_bits()],
            &[5, TypeTag::run(ArgumentType::Double).raw(), 3, 0],
            &[ExpressionDescriptor::new(0, 1, 4)],
            b"root\0",
        );
        let buffer = Buffer::new(&bytes).unwrap();
        assert_eq!(sum_numeric(&buffer.expression(0).unwrap()), Ok(1));
    }

    #[test]
    fn test_sum_overflow() {
        let bytes = raw_buffer(
            &[0, i64::MAX as u64, 1],
            &[5, 1, 1],
            &[ExpressionDescriptor::new(0, 1, 3)],
            b"root\0",
        );
        let buffer = Buffer::new(&bytes).unwrap();
        assert_eq!(
            sum_numeric(&buffer.expression(0).unwrap()),
            Err(WisentError::AggregateOverflow)
        );
        assert_eq!(truncate(f64::NAN), Err(WisentError::AggregateOverflow));
        assert_eq!(truncate(-3.9), Ok(-3));
    }

    #[test]
    fn test_sum_scalar_element() {
        let bytes = raw_buffer(&[4], &[1], &[], &[]);
        let buffer = Buffer::new(&bytes).unwrap();
        assert_eq!(
            sum_element(&buffer.root().unwrap()),
            Err(WisentError::NotAnExpression { index: 0 })
        );
    }
}
