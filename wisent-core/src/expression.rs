//! Nested expressions and run-grouped child traversal
//!
//! An expression's children are the argument slots `[start, end)` named by its
//! descriptor. Long homogeneous prefixes may be run-compressed: the first tag
//! of the range carries the run flag and the second tag byte holds the run
//! length instead of a type. The values of every slot in the run, including
//! the second one, are still genuine per-slot data. Elements yielded by an
//! [`ArgumentRun`] therefore decode with the run's type code, not with the
//! tag byte stored at their own slot.
//!
//! [`Children`] walks the range and yields one [`ArgumentRun`] for the
//! compressed prefix (if any) followed by one single-slot group per remaining
//! slot. It only captures descriptor data, so calling `children()` again
//! always restarts from the same state.

use crate::atom::Element;
use crate::buffer::Buffer;
use crate::error::{Result, WisentError};
use crate::format::constants::{MAX_RUN_LENGTH, TYPE_MASK};
use crate::format::{ArgumentType, ExpressionDescriptor};
use crate::traits::ScalarAtom;
use crate::validation::bounds::check_child_range;
use core::iter::{Flatten, FusedIterator};
use core::ops::Range;

/// Handle to an expression descriptor
#[derive(Clone, Copy)]
pub struct Expression<'a> {
    buffer: Buffer<'a>,
    index: usize,
}

impl<'a> Expression<'a> {
    /// `index` must be below the buffer's expression count
    pub(crate) fn new(buffer: Buffer<'a>, index: usize) -> Self {
        Self { buffer, index }
    }

    /// Descriptor index
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn buffer(&self) -> Buffer<'a> {
        self.buffer
    }

    pub fn descriptor(&self) -> Result<ExpressionDescriptor> {
        self.buffer.descriptor(self.index)
    }

    /// Head symbol name
    pub fn head(&self) -> Result<&'a str> {
        let descriptor = self.descriptor()?;
        self.buffer.string_at(descriptor.symbol_name_offset)
    }

    /// Head symbol bytes, without UTF-8 validation
    pub fn head_bytes(&self) -> Result<&'a [u8]> {
        let descriptor = self.descriptor()?;
        self.buffer.string_bytes_at(descriptor.symbol_name_offset)
    }

    /// Whether the head equals `name`
    pub fn has_head(&self, name: &str) -> Result<bool> {
        self.head_bytes().map(|head| head == name.as_bytes())
    }

    /// Validated child slot range
    pub fn child_range(&self) -> Result<Range<usize>> {
        let descriptor = self.descriptor()?;
        check_child_range(
            self.index,
            descriptor.start_child_offset,
            descriptor.end_child_offset,
            self.buffer.argument_count(),
        )
    }

    /// Number of child slots
    pub fn child_count(&self) -> Result<usize> {
        self.child_range().map(|range| range.len())
    }

    /// Lazy run-grouped children
    ///
    /// The child range and any leading run are validated here, so the returned
    /// iterator itself cannot fail.
    pub fn children(&self) -> Result<Children<'a>> {
        let range = self.child_range()?;
        let run_end = leading_run_end(&self.buffer, &range)?;
        Ok(Children {
            buffer: self.buffer,
            start: range.start,
            run_end,
            cursor: range.start,
            end: range.end,
        })
    }

    /// Children with run grouping removed, in slot order
    pub fn flat_children(&self) -> Result<FlatChildren<'a>> {
        self.children().map(FlatChildren::new)
    }
}

/// End of the compressed run opening `range`, or `range.start` when there is none
fn leading_run_end(buffer: &Buffer<'_>, range: &Range<usize>) -> Result<usize> {
    if range.is_empty() {
        return Ok(range.start);
    }

    let tag = buffer.type_tag(range.start)?;
    if !tag.is_run() {
        return Ok(range.start);
    }

    let length = buffer.type_tag(range.start + 1)?.raw();
    let run_end = range.start + length as usize;
    if length > MAX_RUN_LENGTH || run_end > range.end {
        return Err(WisentError::InvalidRunLength {
            index: range.start,
            length,
        });
    }
    Ok(run_end)
}

impl PartialEq for Expression<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.buffer.same_region(&other.buffer)
    }
}

impl core::fmt::Debug for Expression<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut debug = f.debug_struct("Expression");
        debug.field("index", &self.index);
        if let Ok(head) = self.head() {
            debug.field("head", &head);
        }
        debug.finish()
    }
}

impl core::fmt::Display for Expression<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let head = match self.head() {
            Ok(head) => head,
            Err(err) => return write!(f, "#<{err}>"),
        };
        let children = match self.flat_children() {
            Ok(children) => children,
            Err(err) => return write!(f, "({head} #<{err}>)"),
        };

        write!(f, "({head}")?;
        for child in children {
            write!(f, " {child}")?;
        }
        write!(f, ")")
    }
}

/// One group of children sharing a type code
#[derive(Clone, Copy)]
pub struct ArgumentRun<'a> {
    buffer: Buffer<'a>,
    type_code: u8,
    start: usize,
    end: usize,
    compressed: bool,
}

impl<'a> ArgumentRun<'a> {
    /// Type code of the group, with the run flag masked off
    pub fn type_code(&self) -> u8 {
        self.type_code
    }

    pub fn argument_type(&self) -> Result<ArgumentType> {
        ArgumentType::from_u8(self.type_code).ok_or(WisentError::UnknownArgumentType {
            index: self.start,
            tag: self.type_code,
        })
    }

    /// Slot range covered by the group
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the group came from a run-compressed prefix
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Lazily map every slot of the group to an element
    pub fn iter(&self) -> RunElements<'a> {
        RunElements {
            buffer: self.buffer,
            type_code: self.type_code,
            slots: self.range(),
        }
    }

    /// Raw slot values of a run whose type matches `T`
    pub fn values<T: ScalarAtom>(&self) -> Result<RunValues<'a, T>> {
        if self.type_code != T::argument_type().to_u8() {
            return Err(WisentError::RunTypeMismatch {
                expected: T::argument_type(),
                found: self.type_code,
            });
        }
        let values = self.buffer.arguments();
        Ok(RunValues {
            values,
            slots: self.range(),
            _marker: core::marker::PhantomData,
        })
    }
}

impl core::fmt::Debug for ArgumentRun<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArgumentRun")
            .field("type_code", &self.type_code)
            .field("range", &self.range())
            .field("compressed", &self.compressed)
            .finish()
    }
}

impl<'a> IntoIterator for ArgumentRun<'a> {
    type Item = Element<'a>;
    type IntoIter = RunElements<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Elements of one argument run
#[derive(Debug, Clone)]
pub struct RunElements<'a> {
    buffer: Buffer<'a>,
    type_code: u8,
    slots: Range<usize>,
}

impl<'a> Iterator for RunElements<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .next()
            .map(|index| Element::in_group(self.buffer, index, self.type_code))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl DoubleEndedIterator for RunElements<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.slots
            .next_back()
            .map(|index| Element::in_group(self.buffer, index, self.type_code))
    }
}

impl ExactSizeIterator for RunElements<'_> {}
impl FusedIterator for RunElements<'_> {}

/// Typed raw values of one argument run
#[derive(Debug, Clone)]
pub struct RunValues<'a, T> {
    values: crate::buffer::ArgumentValues<'a>,
    slots: Range<usize>,
    _marker: core::marker::PhantomData<T>,
}

impl<T: ScalarAtom> Iterator for RunValues<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let index = self.slots.next()?;
        self.values.get(index).ok().map(T::from_slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

/// Lazy run-grouped children of an expression
///
/// State is `(cursor, run_end, end)` over validated descriptor data.
#[derive(Clone)]
pub struct Children<'a> {
    buffer: Buffer<'a>,
    start: usize,
    run_end: usize,
    cursor: usize,
    end: usize,
}

impl<'a> Children<'a> {
    /// Children of a non-expression slot
    pub(crate) fn empty(buffer: Buffer<'a>) -> Self {
        Self {
            buffer,
            start: 0,
            run_end: 0,
            cursor: 0,
            end: 0,
        }
    }

    /// Slot range covered by all groups
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    fn type_code_at(&self, index: usize) -> u8 {
        self.buffer.argument_types()[index] & TYPE_MASK
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = ArgumentRun<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }

        let run = if self.cursor < self.run_end {
            ArgumentRun {
                buffer: self.buffer,
                type_code: self.type_code_at(self.start),
                start: self.start,
                end: self.run_end,
                compressed: true,
            }
        } else {
            ArgumentRun {
                buffer: self.buffer,
                type_code: self.type_code_at(self.cursor),
                start: self.cursor,
                end: self.cursor + 1,
                compressed: false,
            }
        };
        self.cursor = run.end;
        Some(run)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.cursor;
        let groups = if self.cursor < self.run_end {
            remaining - (self.run_end - self.cursor) + 1
        } else {
            remaining
        };
        (groups, Some(groups))
    }
}

impl ExactSizeIterator for Children<'_> {}
impl FusedIterator for Children<'_> {}

impl core::fmt::Debug for Children<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Children")
            .field("cursor", &self.cursor)
            .field("run_end", &self.run_end)
            .field("end", &self.end)
            .finish()
    }
}

/// Concatenation of all child groups, in slot order
#[derive(Clone)]
pub struct FlatChildren<'a> {
    inner: Flatten<Children<'a>>,
}

impl<'a> FlatChildren<'a> {
    pub fn new(children: Children<'a>) -> Self {
        Self {
            inner: children.flatten(),
        }
    }
}

impl<'a> Iterator for FlatChildren<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl FusedIterator for FlatChildren<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::buffer::tests::raw_buffer;
    use crate::format::TypeTag;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    /// Root expression "root" over slots 1..end with the given child tags/values
    fn single_expression(values: &[u64], tags: &[u8]) -> Vec<u8> {
        let mut all_values = alloc::vec![0u64];
        all_values.extend_from_slice(values);
        let mut all_tags = alloc::vec![ArgumentType::Expression.to_u8()];
        all_tags.extend_from_slice(tags);
        raw_buffer(
            &all_values,
            &all_tags,
            &[ExpressionDescriptor::new(0, 1, all_values.len() as u64)],
            b"root\0",
        )
    }

    fn groups(expression: &Expression<'_>) -> Vec<(u8, Range<usize>)> {
        expression
            .children()
            .unwrap()
            .map(|run| (run.type_code(), run.range()))
            .collect()
    }

    #[test]
    fn test_uncompressed_children() {
        let bytes = single_expression(&[1, 2, 3], &[1, 1, 2]);
        let buffer = Buffer::new(&bytes).unwrap();
        let root = buffer.expression(0).unwrap();

        assert_eq!(groups(&root), alloc::vec![(1, 1..2), (1, 2..3), (2, 3..4)]);
        assert_eq!(root.children().unwrap().len(), 3);
    }

    #[test]
    fn test_leading_run_then_singles() {
        // Run of 3 longs, then a double
        let bytes = single_expression(
            &[10, 20, 30, 1.5f64.to_bits()],
            &[TypeTag::run(ArgumentType::Long).raw(), 3, 0, 2],
        );
        let buffer = Buffer::new(&bytes).unwrap();
        let root = buffer.expression(0).unwrap();

        let runs: Vec<_> = root.children().unwrap().collect();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].is_compressed());
        assert_eq!(runs[0].argument_type(), Ok(ArgumentType::Long));
        assert_eq!(runs[0].range(), 1..4);
        assert_eq!(runs[1].range(), 4..5);
        assert_eq!(runs[1].argument_type(), Ok(ArgumentType::Double));

        // The repurposed length slot still carries a real value
        let values: Vec<i64> = runs[0].values::<i64>().unwrap().collect();
        assert_eq!(values, alloc::vec![10, 20, 30]);
        assert_eq!(
            runs[0].values::<f64>().map(|_| ()),
            Err(WisentError::RunTypeMismatch {
                expected: ArgumentType::Double,
                found: 1,
            })
        );
    }

    #[test]
    fn test_children_restartable() {
        let bytes = single_expression(
            &[4, 5, 6, 7, 8],
            &[TypeTag::run(ArgumentType::Long).raw(), 2, 1, 1, 1],
        );
        let buffer = Buffer::new(&bytes).unwrap();
        let root = buffer.expression(0).unwrap();

        let mut partial = root.children().unwrap();
        partial.next();

        assert_eq!(groups(&root), groups(&root));
        assert_eq!(groups(&root), alloc::vec![(1, 1..3), (1, 3..4), (1, 4..5), (1, 5..6)]);
        assert_eq!(root.children().unwrap().size_hint(), (4, Some(4)));
    }

    #[test]
    fn test_flat_children() {
        let bytes = single_expression(
            &[10, 20, 30, 40],
            &[TypeTag::run(ArgumentType::Long).raw(), 3, 0, 1],
        );
        let buffer = Buffer::new(&bytes).unwrap();
        let root = buffer.expression(0).unwrap();

        let flat: Vec<_> = root.flat_children().unwrap().collect();
        assert_eq!(flat.len(), root.child_count().unwrap());
        let indices: Vec<_> = flat.iter().map(|e| e.index()).collect();
        assert_eq!(indices, alloc::vec![1, 2, 3, 4]);
        let values: Vec<_> = flat.iter().map(|e| e.as_i64()).collect();
        assert_eq!(values, alloc::vec![10, 20, 30, 40]);

        // Slot 2 holds the run length as its tag byte but is still a Long
        let atoms: Vec<_> = flat.iter().map(|e| e.resolve().unwrap()).collect();
        assert_eq!(
            atoms,
            alloc::vec![
                Atom::Integer(10),
                Atom::Integer(20),
                Atom::Integer(30),
                Atom::Integer(40)
            ]
        );
        assert_eq!(flat[1].type_tag().raw(), 3);
        assert_eq!(flat[1].argument_type(), Ok(ArgumentType::Long));
    }

    #[test]
    fn test_run_display() {
        let bytes = single_expression(
            &[10, 20, 30],
            &[TypeTag::run(ArgumentType::Long).raw(), 3, 1],
        );
        let buffer = Buffer::new(&bytes).unwrap();
        let root = buffer.expression(0).unwrap();
        let rendered: Vec<_> = root
            .flat_children()
            .unwrap()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(rendered, alloc::vec!["10", "20", "30"]);
    }

    #[test]
    fn test_direct_element_uses_own_tag() {
        let bytes = single_expression(
            &[10, 20, 30],
            &[TypeTag::run(ArgumentType::Long).raw(), 3, 1],
        );
        let buffer = Buffer::new(&bytes).unwrap();
        // Reached by index rather than through its run
        let element = buffer.element(2).unwrap();
        assert_eq!(element.type_code(), 3);
        assert_eq!(element.argument_type(), Ok(ArgumentType::String));
    }

    #[test]
    fn test_zero_length_run_flag() {
        // Flag with length 0 means no compressed run
        let bytes = single_expression(&[7, 8], &[TypeTag::run(ArgumentType::Long).raw(), 0]);
        let buffer = Buffer::new(&bytes).unwrap();
        let root = buffer.expression(0).unwrap();

        assert_eq!(groups(&root), alloc::vec![(1, 1..2), (0, 2..3)]);
    }

    #[test]
    fn test_invalid_runs() {
        // Run longer than the child range
        let bytes = single_expression(&[1, 2], &[TypeTag::run(ArgumentType::Long).raw(), 3]);
        let buffer = Buffer::new(&bytes).unwrap();
        assert_eq!(
            buffer.expression(0).unwrap().children().map(|_| ()),
            Err(WisentError::InvalidRunLength {
                index: 1,
                length: 3,
            })
        );

        // Length byte above the one-byte cap
        let values = [0u64; 130];
        let mut tags = [1u8; 130];
        tags[0] = TypeTag::run(ArgumentType::Long).raw();
        tags[1] = 128;
        let bytes = single_expression(&values, &tags);
        let buffer = Buffer::new(&bytes).unwrap();
        assert!(buffer.expression(0).unwrap().children().is_err());

        // Flag on the last slot of the buffer, no length slot to read
        let bytes = single_expression(&[1], &[TypeTag::run(ArgumentType::Long).raw()]);
        let buffer = Buffer::new(&bytes).unwrap();
        assert_eq!(
            buffer.expression(0).unwrap().children().map(|_| ()),
            Err(WisentError::ArgumentOutOfBounds { index: 2, count: 2 })
        );
    }

    #[test]
    fn test_invalid_child_range() {
        let bytes = raw_buffer(
            &[0, 1],
            &[5, 1],
            &[ExpressionDescriptor::new(0, 1, 3)],
            b"root\0",
        );
        let buffer = Buffer::new(&bytes).unwrap();
        assert_eq!(
            buffer.expression(0).unwrap().children().map(|_| ()),
            Err(WisentError::InvalidChildRange {
                expression: 0,
                start: 1,
                end: 3,
            })
        );
    }

    #[test]
    fn test_display_nested() {
        // (root 1 (inner "x" 'y) 2.5)
        let bytes = raw_buffer(
            &[0, 1, 1, 2.5f64.to_bits(), 11, 13],
            &[5, 1, 5, 2, 3, 4],
            &[
                ExpressionDescriptor::new(0, 1, 4),
                ExpressionDescriptor::new(5, 4, 6),
            ],
            b"root\0inner\0x\0y\0",
        );
        let buffer = Buffer::new(&bytes).unwrap();
        let root = buffer.expression(0).unwrap();
        assert_eq!(root.to_string(), "(root 1 (inner \"x\" 'y) 2.5)");

        let inner = buffer.element(2).unwrap().resolve().unwrap();
        assert_eq!(inner, Atom::Expression(buffer.expression(1).unwrap()));
    }
}
