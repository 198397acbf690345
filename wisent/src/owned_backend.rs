//! In-memory storage backend

use wisent_core::{Buffer, StorageBackend};

use crate::Result;

/// A serialized buffer held in heap memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedBuffer(Vec<u8>);

impl OwnedBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// View the bytes as a Wisent buffer
    pub fn buffer(&self) -> Result<Buffer<'_>> {
        Ok(Buffer::new(&self.0)?)
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for OwnedBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl StorageBackend for OwnedBuffer {
    fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use wisent_core::{BufferBuilder, Node, WisentError};

    #[test]
    fn test_owned_buffer() {
        let root = Node::expression("root", vec![Node::Long(1), Node::Long(2)]);
        let owned = OwnedBuffer::new(BufferBuilder::new().encode(&root).unwrap());

        let buffer = owned.buffer().unwrap();
        assert_eq!(buffer.argument_count(), 3);
        assert_eq!(owned.size(), owned.as_slice().len());
        assert_eq!(StorageBackend::buffer(&owned).unwrap().expression_count(), 1);
    }

    #[test]
    fn test_owned_buffer_too_small() {
        let owned = OwnedBuffer::from(vec![0u8; 4]);
        assert!(matches!(
            owned.buffer(),
            Err(Error::Format(WisentError::InsufficientBuffer { len: 4 }))
        ));
    }
}
