//! Argument slot handles and atom resolution
//!
//! An [`Element`] is a `(buffer, slot index)` pair. Resolving it masks the
//! slot's type tag and decodes the 64-bit value accordingly into an [`Atom`].
//!
//! Inside a compressed run only the first tag names the type and the second
//! holds the run length, so elements produced by child traversal carry the
//! type code of their group and ignore their own tag byte.

use crate::buffer::Buffer;
use crate::error::{Result, WisentError};
use crate::expression::{Children, Expression, FlatChildren};
use crate::format::{ArgumentType, TypeTag};

/// A decoded argument slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Atom<'a> {
    Integer(i64),
    Float(f64),
    Text(&'a str),
    Symbol(&'a str),
    Expression(Expression<'a>),
}

impl<'a> Atom<'a> {
    /// Logical type this atom was decoded from
    pub fn argument_type(&self) -> ArgumentType {
        match self {
            Atom::Integer(_) => ArgumentType::Long,
            Atom::Float(_) => ArgumentType::Double,
            Atom::Text(_) => ArgumentType::String,
            Atom::Symbol(_) => ArgumentType::Symbol,
            Atom::Expression(_) => ArgumentType::Expression,
        }
    }

    pub fn as_expression(&self) -> Option<Expression<'a>> {
        match self {
            Atom::Expression(expression) => Some(*expression),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`, for integer and float atoms
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Atom::Integer(value) => Some(*value as f64),
            Atom::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl core::fmt::Display for Atom<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Atom::Integer(value) => write!(f, "{value}"),
            Atom::Float(value) => write!(f, "{value:?}"),
            Atom::Text(text) => write!(f, "\"{text}\""),
            Atom::Symbol(name) => write!(f, "'{name}"),
            Atom::Expression(expression) => write!(f, "{expression}"),
        }
    }
}

/// Handle to one argument slot of a buffer
#[derive(Clone, Copy)]
pub struct Element<'a> {
    buffer: Buffer<'a>,
    index: usize,
    group_code: Option<u8>,
}

impl<'a> Element<'a> {
    /// `index` must be below the buffer's argument count
    pub(crate) fn new(buffer: Buffer<'a>, index: usize) -> Self {
        Self {
            buffer,
            index,
            group_code: None,
        }
    }

    /// Member of a child group whose type code is `type_code`
    pub(crate) fn in_group(buffer: Buffer<'a>, index: usize, type_code: u8) -> Self {
        Self {
            buffer,
            index,
            group_code: Some(type_code),
        }
    }

    /// Argument slot index
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn buffer(&self) -> Buffer<'a> {
        self.buffer
    }

    /// Raw type tag byte stored at this slot, run flag included
    ///
    /// For the second slot of a compressed run this is the run length.
    pub fn type_tag(&self) -> TypeTag {
        TypeTag(self.buffer.argument_types()[self.index])
    }

    /// Type code the slot decodes as: the group's code inside child
    /// traversal, otherwise the slot's own tag with the run flag masked off
    pub fn type_code(&self) -> u8 {
        self.group_code.unwrap_or_else(|| self.type_tag().code())
    }

    /// Logical type of the slot
    pub fn argument_type(&self) -> Result<ArgumentType> {
        let code = self.type_code();
        ArgumentType::from_u8(code).ok_or(WisentError::UnknownArgumentType {
            index: self.index,
            tag: code,
        })
    }

    /// Raw 64-bit slot value, whatever its type
    pub fn raw_value(&self) -> u64 {
        self.buffer.arguments().value_at(self.index)
    }

    /// Slot value reinterpreted as a signed integer, regardless of tag
    pub fn as_i64(&self) -> i64 {
        self.raw_value() as i64
    }

    /// Slot bits reinterpreted as a double, regardless of tag
    pub fn as_f64(&self) -> f64 {
        f64::from_bits(self.raw_value())
    }

    /// Decode the slot according to its type tag
    pub fn resolve(&self) -> Result<Atom<'a>> {
        let value = self.raw_value();
        match self.argument_type()? {
            ArgumentType::Long => Ok(Atom::Integer(value as i64)),
            ArgumentType::Double => Ok(Atom::Float(f64::from_bits(value))),
            ArgumentType::String => self.buffer.string_at(value).map(Atom::Text),
            ArgumentType::Symbol => self.buffer.string_at(value).map(Atom::Symbol),
            ArgumentType::Expression => self.expression_at(value).map(Atom::Expression),
            kind @ ArgumentType::Bool => Err(WisentError::UnsupportedArgumentType {
                index: self.index,
                kind,
            }),
        }
    }

    /// The nested expression this slot refers to
    pub fn expression(&self) -> Result<Expression<'a>> {
        if self.argument_type()? != ArgumentType::Expression {
            return Err(WisentError::NotAnExpression { index: self.index });
        }
        self.expression_at(self.raw_value())
    }

    /// The nested expression, or `None` for any other known type
    pub fn as_expression(&self) -> Result<Option<Expression<'a>>> {
        match self.argument_type()? {
            ArgumentType::Expression => self.expression().map(Some),
            _ => Ok(None),
        }
    }

    /// Run-grouped children; empty unless the slot is an expression
    pub fn children(&self) -> Result<Children<'a>> {
        match self.as_expression()? {
            Some(expression) => expression.children(),
            None => Ok(Children::empty(self.buffer)),
        }
    }

    /// Children with run grouping removed
    pub fn flat_children(&self) -> Result<FlatChildren<'a>> {
        self.children().map(FlatChildren::new)
    }

    fn expression_at(&self, descriptor_index: u64) -> Result<Expression<'a>> {
        let index = usize::try_from(descriptor_index).unwrap_or(usize::MAX);
        self.buffer.expression(index)
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.buffer.same_region(&other.buffer)
    }
}

impl core::fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Element")
            .field("index", &self.index)
            .field("type_code", &self.type_code())
            .finish()
    }
}

impl core::fmt::Display for Element<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.resolve() {
            Ok(atom) => write!(f, "{atom}"),
            Err(err) => write!(f, "#<{err}>"),
        }
    }
}
