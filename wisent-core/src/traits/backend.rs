//! Byte sources a buffer view can be constructed over

use crate::buffer::Buffer;
use crate::error::Result;

/// Trait for backends that hold a serialized Wisent buffer
///
/// The backend owns the memory; every [`Buffer`] borrowed from it is bound to
/// the backend's lifetime, so releasing the backend ends all traversals.
pub trait StorageBackend {
    /// Get a slice of the underlying data
    fn as_slice(&self) -> &[u8];

    /// Get the size of the data in bytes
    fn size(&self) -> usize {
        self.as_slice().len()
    }

    /// View the data as a Wisent buffer
    fn buffer(&self) -> Result<Buffer<'_>> {
        Buffer::new(self.as_slice())
    }
}

impl StorageBackend for [u8] {
    fn as_slice(&self) -> &[u8] {
        self
    }
}

#[cfg(any(feature = "alloc", test))]
impl StorageBackend for alloc::vec::Vec<u8> {
    fn as_slice(&self) -> &[u8] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::RootHeader;

    #[test]
    fn test_slice_backend() {
        let bytes = RootHeader::new(0, 0).to_bytes_array();
        let backend: &[u8] = &bytes;
        assert_eq!(backend.size(), 16);
        assert_eq!(backend.buffer().unwrap().argument_count(), 0);
    }
}
