//! Expression descriptor records

use super::constants::EXPRESSION_DESCRIPTOR_SIZE;
use crate::error::{Result, Section, WisentError};
use bytemuck::{Pod, Zeroable};
use core::ops::Range;

/// Fixed-size record naming an expression's head and its child slot range
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpressionDescriptor {
    /// Byte offset of the head symbol in the string blob
    pub symbol_name_offset: u64,
    /// First child argument slot
    pub start_child_offset: u64,
    /// One past the last child argument slot
    pub end_child_offset: u64,
}

impl ExpressionDescriptor {
    /// Size of a descriptor in bytes
    pub const SIZE: usize = EXPRESSION_DESCRIPTOR_SIZE;

    pub const fn new(
        symbol_name_offset: u64,
        start_child_offset: u64,
        end_child_offset: u64,
    ) -> Self {
        Self {
            symbol_name_offset,
            start_child_offset,
            end_child_offset,
        }
    }

    /// Read a descriptor from unaligned little-endian bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(WisentError::SectionOutOfBounds {
                section: Section::Expressions,
                end: Self::SIZE,
                available: bytes.len(),
            });
        }

        let raw: Self = bytemuck::pod_read_unaligned(&bytes[..Self::SIZE]);
        Ok(Self {
            symbol_name_offset: u64::from_le(raw.symbol_name_offset),
            start_child_offset: u64::from_le(raw.start_child_offset),
            end_child_offset: u64::from_le(raw.end_child_offset),
        })
    }

    /// Convert to little-endian bytes
    pub fn to_bytes_array(&self) -> [u8; Self::SIZE] {
        let le = Self {
            symbol_name_offset: self.symbol_name_offset.to_le(),
            start_child_offset: self.start_child_offset.to_le(),
            end_child_offset: self.end_child_offset.to_le(),
        };
        let mut bytes = [0u8; Self::SIZE];
        bytes.copy_from_slice(bytemuck::bytes_of(&le));
        bytes
    }

    /// Half-open child slot range as stored
    pub fn child_range(&self) -> Range<u64> {
        self.start_child_offset..self.end_child_offset
    }

    /// Number of child slots, zero when the range is inverted
    pub fn child_count(&self) -> u64 {
        self.end_child_offset.saturating_sub(self.start_child_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_layout() {
        assert_eq!(core::mem::size_of::<ExpressionDescriptor>(), 24);

        let descriptor = ExpressionDescriptor::new(5, 1, 4);
        let bytes = descriptor.to_bytes_array();
        assert_eq!(&bytes[0..8], &5u64.to_le_bytes());
        assert_eq!(&bytes[8..16], &1u64.to_le_bytes());
        assert_eq!(&bytes[16..24], &4u64.to_le_bytes());
    }

    #[test]
    fn test_descriptor_unaligned_read() {
        let descriptor = ExpressionDescriptor::new(9, 2, 7);
        let mut bytes = [0u8; 25];
        bytes[1..].copy_from_slice(&descriptor.to_bytes_array());

        let parsed = ExpressionDescriptor::from_bytes(&bytes[1..]).unwrap();
        assert_eq!(parsed, descriptor);
        assert_eq!(parsed.child_range(), 2..7);
        assert_eq!(parsed.child_count(), 5);
    }

    #[test]
    fn test_descriptor_short_input() {
        assert!(ExpressionDescriptor::from_bytes(&[0u8; 23]).is_err());
    }
}
