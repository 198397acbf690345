//! Error types for Wisent buffer decoding

use crate::format::ArgumentType;

/// Layout section of a Wisent buffer, used to report where a bound was violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    ArgumentValues,
    ArgumentTypes,
    Expressions,
    StringBlob,
}

impl core::fmt::Display for Section {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Section::Header => "header",
            Section::ArgumentValues => "argument values",
            Section::ArgumentTypes => "argument types",
            Section::Expressions => "expression descriptors",
            Section::StringBlob => "string blob",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while decoding a Wisent buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WisentError {
    /// Region is shorter than the fixed header
    InsufficientBuffer { len: usize },
    /// A count times an element size does not fit in `usize`
    ArraySizeOverflow,
    /// A section extends past the end of the region
    SectionOutOfBounds {
        section: Section,
        end: usize,
        available: usize,
    },
    /// Argument slot index past `argument_count`
    ArgumentOutOfBounds { index: usize, count: usize },
    /// Expression descriptor index past `expression_count`
    ExpressionOutOfBounds { index: usize, count: usize },
    /// Descriptor child range is inverted or past `argument_count`
    InvalidChildRange {
        expression: usize,
        start: u64,
        end: u64,
    },
    /// Compressed run longer than 127 slots or past the child range
    InvalidRunLength { index: usize, length: u8 },
    /// String offset past the end of the blob
    StringOutOfBounds { offset: u64, len: usize },
    /// No null terminator between the offset and the end of the blob
    UnterminatedString { offset: u64 },
    /// String bytes are not valid UTF-8
    InvalidUtf8 { offset: u64 },
    /// Type tag outside the known set after masking
    UnknownArgumentType { index: usize, tag: u8 },
    /// Known type tag that has no decoded representation
    UnsupportedArgumentType { index: usize, kind: ArgumentType },
    /// Slot was expected to hold a nested expression
    NotAnExpression { index: usize },
    /// Typed run access did not match the run's declared type
    RunTypeMismatch {
        expected: ArgumentType,
        found: u8,
    },
    /// Integer aggregation left the `i64` range
    AggregateOverflow,
    /// Head path is empty or has an empty segment
    InvalidHeadPath,
    /// String to be stored contains a NUL byte
    InvalidString,
}

impl core::fmt::Display for WisentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WisentError::InsufficientBuffer { len } => {
                write!(f, "Buffer of {len} bytes is too small for the header")
            }
            WisentError::ArraySizeOverflow => write!(f, "Section size calculation overflowed"),
            WisentError::SectionOutOfBounds {
                section,
                end,
                available,
            } => write!(
                f,
                "Section '{section}' ends at byte {end} but only {available} bytes are available"
            ),
            WisentError::ArgumentOutOfBounds { index, count } => {
                write!(f, "Argument index {index} out of bounds ({count} arguments)")
            }
            WisentError::ExpressionOutOfBounds { index, count } => {
                write!(f, "Expression index {index} out of bounds ({count} expressions)")
            }
            WisentError::InvalidChildRange {
                expression,
                start,
                end,
            } => write!(
                f,
                "Expression {expression} has invalid child range {start}..{end}"
            ),
            WisentError::InvalidRunLength { index, length } => {
                write!(f, "Invalid run length {length} at argument {index}")
            }
            WisentError::StringOutOfBounds { offset, len } => {
                write!(f, "String offset {offset} outside blob of {len} bytes")
            }
            WisentError::UnterminatedString { offset } => {
                write!(f, "String at offset {offset} is not null-terminated")
            }
            WisentError::InvalidUtf8 { offset } => {
                write!(f, "String at offset {offset} is not valid UTF-8")
            }
            WisentError::UnknownArgumentType { index, tag } => {
                write!(f, "Unknown argument type tag {tag:#04x} at argument {index}")
            }
            WisentError::UnsupportedArgumentType { index, kind } => {
                write!(f, "Argument {index} has unsupported type {kind}")
            }
            WisentError::NotAnExpression { index } => {
                write!(f, "Argument {index} is not an expression")
            }
            WisentError::RunTypeMismatch { expected, found } => {
                write!(f, "Expected a {expected} run, found type tag {found:#04x}")
            }
            WisentError::AggregateOverflow => write!(f, "Aggregation overflowed i64"),
            WisentError::InvalidHeadPath => write!(f, "Invalid head path"),
            WisentError::InvalidString => write!(f, "String contains a NUL byte"),
        }
    }
}

/// Result type for Wisent operations
pub type Result<T> = core::result::Result<T, WisentError>;

impl core::error::Error for WisentError {}
