//! Root header, section layout and argument type tags
//!
//! The header is two little-endian u64 counts. Every section start is derived
//! from the previous section's end, nothing else is stored.

use super::constants::*;
use crate::error::{Result, Section, WisentError};
use crate::validation::bounds::advance;
use core::ops::Range;

/// Leading header of a Wisent buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootHeader {
    /// Number of argument slots (values and type tags)
    pub argument_count: u64,
    /// Number of expression descriptors
    pub expression_count: u64,
}

impl RootHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = HEADER_SIZE;

    /// Create a header for the given counts
    pub const fn new(argument_count: u64, expression_count: u64) -> Self {
        Self {
            argument_count,
            expression_count,
        }
    }

    /// Read the header from the start of a region
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(WisentError::InsufficientBuffer { len: bytes.len() });
        }

        let mut argument_count = [0u8; 8];
        argument_count.copy_from_slice(&bytes[0..8]);
        let mut expression_count = [0u8; 8];
        expression_count.copy_from_slice(&bytes[8..16]);

        Ok(Self {
            argument_count: u64::from_le_bytes(argument_count),
            expression_count: u64::from_le_bytes(expression_count),
        })
    }

    /// Convert header to bytes
    pub fn to_bytes_array(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..8].copy_from_slice(&self.argument_count.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.expression_count.to_le_bytes());
        bytes
    }
}

/// Byte spans of every section, derived from the header counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLayout {
    pub arguments: Range<usize>,
    pub argument_types: Range<usize>,
    pub expressions: Range<usize>,
    /// Start of the string blob; the blob runs to the end of the region
    pub strings_start: usize,
}

impl SectionLayout {
    /// Compute section spans by advancing a cursor past each section in order
    pub fn compute(header: &RootHeader) -> Result<Self> {
        let argument_count = to_usize(header.argument_count)?;
        let expression_count = to_usize(header.expression_count)?;

        let arguments = advance(HEADER_SIZE, argument_count, ARGUMENT_VALUE_SIZE)?;
        let argument_types = advance(arguments.end, argument_count, TYPE_TAG_SIZE)?;
        let expressions = advance(
            argument_types.end,
            expression_count,
            EXPRESSION_DESCRIPTOR_SIZE,
        )?;

        Ok(Self {
            strings_start: expressions.end,
            arguments,
            argument_types,
            expressions,
        })
    }

    /// Minimum region length holding every fixed-size section
    pub fn required_len(&self) -> usize {
        self.strings_start
    }

    /// Check that every fixed-size section lies inside a region of `len` bytes
    pub fn check_fits(&self, len: usize) -> Result<()> {
        let sections = [
            (Section::ArgumentValues, &self.arguments),
            (Section::ArgumentTypes, &self.argument_types),
            (Section::Expressions, &self.expressions),
        ];
        for (section, span) in sections {
            if span.end > len {
                return Err(WisentError::SectionOutOfBounds {
                    section,
                    end: span.end,
                    available: len,
                });
            }
        }
        Ok(())
    }
}

fn to_usize(count: u64) -> Result<usize> {
    usize::try_from(count).map_err(|_| WisentError::ArraySizeOverflow)
}

/// Logical argument types, stored in the low 7 bits of a type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ArgumentType {
    Bool = 0,
    Long = 1,
    Double = 2,
    String = 3,
    Symbol = 4,
    Expression = 5,
}

impl ArgumentType {
    /// Convert from the masked u8 representation
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ArgumentType::Bool),
            1 => Some(ArgumentType::Long),
            2 => Some(ArgumentType::Double),
            3 => Some(ArgumentType::String),
            4 => Some(ArgumentType::Symbol),
            5 => Some(ArgumentType::Expression),
            _ => None,
        }
    }

    /// Convert to u8 representation
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

impl core::fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ArgumentType::Bool => write!(f, "bool"),
            ArgumentType::Long => write!(f, "long"),
            ArgumentType::Double => write!(f, "double"),
            ArgumentType::String => write!(f, "string"),
            ArgumentType::Symbol => write!(f, "symbol"),
            ArgumentType::Expression => write!(f, "expression"),
        }
    }
}

/// A raw argument type tag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTag(pub u8);

impl TypeTag {
    /// Tag for a single slot of the given type
    pub const fn new(kind: ArgumentType) -> Self {
        Self(kind as u8)
    }

    /// Tag opening a compressed run of the given type
    pub const fn run(kind: ArgumentType) -> Self {
        Self(kind as u8 | RUN_FLAG)
    }

    /// Raw byte as stored
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Type code with the run flag masked off
    pub const fn code(self) -> u8 {
        self.0 & TYPE_MASK
    }

    /// Whether the run-compression flag is set
    pub const fn is_run(self) -> bool {
        self.0 & RUN_FLAG != 0
    }

    /// Logical type, if the masked code is recognized
    pub const fn kind(self) -> Option<ArgumentType> {
        ArgumentType::from_u8(self.code())
    }
}
