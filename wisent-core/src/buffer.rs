//! Buffer view over a Wisent expression region
//!
//! A [`Buffer`] borrows a byte region and projects it into the header and
//! the four derived sections. Construction computes every section span once
//! through checked arithmetic; afterwards every accessor is a bounds-checked
//! slice operation. The view never copies or mutates the region.

use crate::atom::Element;
use crate::error::{Result, WisentError};
use crate::expression::Expression;
use crate::format::constants::*;
use crate::format::{ExpressionDescriptor, RootHeader, SectionLayout, TypeTag};
use crate::validation::bounds::{check_argument_index, check_expression_index};

/// Read-only view over a Wisent buffer
#[derive(Clone, Copy)]
pub struct Buffer<'a> {
    bytes: &'a [u8],
    argument_count: usize,
    expression_count: usize,
    types_start: usize,
    expressions_start: usize,
    strings_start: usize,
}

impl<'a> Buffer<'a> {
    /// Create a view over `bytes`
    ///
    /// Fails if the region is shorter than the header, if the counts overflow
    /// when converted to byte lengths, or if a fixed-size section extends past
    /// the end of the region. The string blob is everything after the
    /// descriptors and may be empty.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let header = RootHeader::from_bytes(bytes)?;
        let layout = SectionLayout::compute(&header)?;
        layout.check_fits(bytes.len())?;

        Ok(Self {
            bytes,
            argument_count: layout.arguments.len() / ARGUMENT_VALUE_SIZE,
            expression_count: layout.expressions.len() / EXPRESSION_DESCRIPTOR_SIZE,
            types_start: layout.argument_types.start,
            expressions_start: layout.expressions.start,
            strings_start: layout.strings_start,
        })
    }

    /// Number of argument slots
    pub fn argument_count(&self) -> usize {
        self.argument_count
    }

    /// Number of expression descriptors
    pub fn expression_count(&self) -> usize {
        self.expression_count
    }

    /// Header counts as stored
    pub fn header(&self) -> RootHeader {
        RootHeader::new(self.argument_count as u64, self.expression_count as u64)
    }

    /// The whole underlying region
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Argument value slots
    pub fn arguments(&self) -> ArgumentValues<'a> {
        ArgumentValues {
            bytes: &self.bytes[HEADER_SIZE..self.types_start],
        }
    }

    /// Argument type tag bytes, index-aligned with [`Buffer::arguments`]
    pub fn argument_types(&self) -> &'a [u8] {
        &self.bytes[self.types_start..self.expressions_start]
    }

    /// Expression descriptor table
    pub fn expressions(&self) -> ExpressionTable<'a> {
        ExpressionTable {
            bytes: &self.bytes[self.expressions_start..self.strings_start],
        }
    }

    /// Raw string blob
    pub fn string_blob(&self) -> &'a [u8] {
        &self.bytes[self.strings_start..]
    }

    /// Type tag of an argument slot
    pub fn type_tag(&self, index: usize) -> Result<TypeTag> {
        check_argument_index(index, self.argument_count)?;
        Ok(TypeTag(self.argument_types()[index]))
    }

    /// Raw 64-bit value of an argument slot
    pub fn argument_value(&self, index: usize) -> Result<u64> {
        self.arguments().get(index)
    }

    /// Descriptor at `index`
    pub fn descriptor(&self, index: usize) -> Result<ExpressionDescriptor> {
        self.expressions().get(index)
    }

    /// Bytes of the null-terminated string at `offset`, without the terminator
    pub fn string_bytes_at(&self, offset: u64) -> Result<&'a [u8]> {
        let blob = self.string_blob();
        let start = usize::try_from(offset)
            .ok()
            .filter(|&start| start < blob.len())
            .ok_or(WisentError::StringOutOfBounds {
                offset,
                len: blob.len(),
            })?;

        let rest = &blob[start..];
        let end = rest
            .iter()
            .position(|&b| b == STRING_TERMINATOR)
            .ok_or(WisentError::UnterminatedString { offset })?;
        Ok(&rest[..end])
    }

    /// Null-terminated UTF-8 string at `offset`
    pub fn string_at(&self, offset: u64) -> Result<&'a str> {
        let bytes = self.string_bytes_at(offset)?;
        core::str::from_utf8(bytes).map_err(|_| WisentError::InvalidUtf8 { offset })
    }

    /// Handle to an argument slot
    pub fn element(&self, index: usize) -> Result<Element<'a>> {
        check_argument_index(index, self.argument_count)?;
        Ok(Element::new(*self, index))
    }

    /// Handle to an expression descriptor
    pub fn expression(&self, index: usize) -> Result<Expression<'a>> {
        check_expression_index(index, self.expression_count)?;
        Ok(Expression::new(*self, index))
    }

    /// The root element, stored at argument slot 0
    ///
    /// Returns `None` for a buffer without arguments.
    pub fn root(&self) -> Option<Element<'a>> {
        (self.argument_count > 0).then(|| Element::new(*self, 0))
    }

    /// Whether two views address the same region
    pub(crate) fn same_region(&self, other: &Buffer<'_>) -> bool {
        core::ptr::eq(self.bytes.as_ptr(), other.bytes.as_ptr())
            && self.bytes.len() == other.bytes.len()
    }
}

impl core::fmt::Debug for Buffer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.bytes.len())
            .field("argument_count", &self.argument_count)
            .field("expression_count", &self.expression_count)
            .field("string_blob_len", &self.string_blob().len())
            .finish()
    }
}

/// View over the argument value section
#[derive(Debug, Clone, Copy)]
pub struct ArgumentValues<'a> {
    bytes: &'a [u8],
}

impl<'a> ArgumentValues<'a> {
    /// Number of slots
    pub fn len(&self) -> usize {
        self.bytes.len() / ARGUMENT_VALUE_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw little-endian value of slot `index`
    pub fn get(&self, index: usize) -> Result<u64> {
        check_argument_index(index, self.len())?;
        Ok(self.value_at(index))
    }

    /// `index` must already be checked against [`Self::len`]
    pub(crate) fn value_at(&self, index: usize) -> u64 {
        let start = index * ARGUMENT_VALUE_SIZE;
        let mut value = [0u8; ARGUMENT_VALUE_SIZE];
        value.copy_from_slice(&self.bytes[start..start + ARGUMENT_VALUE_SIZE]);
        u64::from_le_bytes(value)
    }

    /// Slot reinterpreted as a signed integer
    pub fn get_i64(&self, index: usize) -> Result<i64> {
        self.get(index).map(|bits| bits as i64)
    }

    /// Slot bits reinterpreted as an IEEE-754 double
    pub fn get_f64(&self, index: usize) -> Result<f64> {
        self.get(index).map(f64::from_bits)
    }

    /// Iterate over the raw slot values
    pub fn iter(&self) -> impl Iterator<Item = u64> + 'a {
        self.bytes.chunks_exact(ARGUMENT_VALUE_SIZE).map(|chunk| {
            let mut value = [0u8; ARGUMENT_VALUE_SIZE];
            value.copy_from_slice(chunk);
            u64::from_le_bytes(value)
        })
    }
}

/// View over the expression descriptor section
#[derive(Debug, Clone, Copy)]
pub struct ExpressionTable<'a> {
    bytes: &'a [u8],
}

impl<'a> ExpressionTable<'a> {
    /// Number of descriptors
    pub fn len(&self) -> usize {
        self.bytes.len() / EXPRESSION_DESCRIPTOR_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Descriptor at `index`
    pub fn get(&self, index: usize) -> Result<ExpressionDescriptor> {
        check_expression_index(index, self.len())?;
        let start = index * EXPRESSION_DESCRIPTOR_SIZE;
        ExpressionDescriptor::from_bytes(&self.bytes[start..start + EXPRESSION_DESCRIPTOR_SIZE])
    }

    /// Iterate over all descriptors
    pub fn iter(&self) -> impl Iterator<Item = Result<ExpressionDescriptor>> + 'a {
        self.bytes
            .chunks_exact(EXPRESSION_DESCRIPTOR_SIZE)
            .map(ExpressionDescriptor::from_bytes)
    }
}
