//! Format constants for the Wisent buffer layout

/// Size of the leading header: argument count and expression count
pub const HEADER_SIZE: usize = 16;

/// Size of one argument value slot
pub const ARGUMENT_VALUE_SIZE: usize = 8;

/// Size of one argument type tag
pub const TYPE_TAG_SIZE: usize = 1;

/// Size of one expression descriptor record
pub const EXPRESSION_DESCRIPTOR_SIZE: usize = 24;

/// Mask selecting the logical argument type from a tag
pub const TYPE_MASK: u8 = 0x7F;

/// Run-compression flag, meaningful only on the first tag of a child range
pub const RUN_FLAG: u8 = 0x80;

/// Longest run the one-byte length slot can describe
pub const MAX_RUN_LENGTH: u8 = 127;

/// Shortest homogeneous prefix the encoder compresses into a run
pub const RUN_MINIMUM_LENGTH: usize = 5;

/// String terminator in the blob
pub const STRING_TERMINATOR: u8 = 0;
