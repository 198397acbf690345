//! Memory-mapped file backend for Wisent buffers
//!
//! A [`BufferFile`] maps a serialized buffer read-only. Views borrowed from it
//! cannot outlive it, so releasing the file ends every traversal.

use memmap2::{Mmap, MmapOptions};
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use tracing::debug;
use wisent_core::{Buffer, RootHeader, SectionLayout, StorageBackend};

use crate::{config::LoadConfig, Error, Result};

/// A read-only mapping of a serialized buffer
pub struct BufferFile {
    path: PathBuf,
    header: RootHeader,
    mmap: Mmap,
}

impl BufferFile {
    /// Map the file at `path`
    ///
    /// The header is always checked. The remaining sections are checked here
    /// when `config.verify_layout` is set, otherwise on every [`Self::buffer`].
    pub fn open<P: AsRef<Path>>(path: P, config: &LoadConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| Error::io(&path, source))?;

        let mut options = MmapOptions::new();
        if config.populate {
            options.populate();
        }
        // SAFETY: The mapping is read-only and owned by the returned value.
        // Views only borrow it, so none can outlive the mapping. Buffer files
        // are not expected to be truncated while mapped.
        let mmap = unsafe { options.map(&file) }.map_err(|source| Error::io(&path, source))?;

        let header = RootHeader::from_bytes(&mmap)?;
        if config.verify_layout {
            SectionLayout::compute(&header)?.check_fits(mmap.len())?;
        }

        debug!(
            path = %path.display(),
            arguments = header.argument_count,
            expressions = header.expression_count,
            bytes = mmap.len(),
            "mapped buffer"
        );
        Ok(Self { path, header, mmap })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> RootHeader {
        self.header
    }

    /// Borrow a view over the mapping
    pub fn buffer(&self) -> Result<Buffer<'_>> {
        Ok(Buffer::new(&self.mmap)?)
    }

    /// Unmap the file
    pub fn release(self) {
        debug!(path = %self.path.display(), "released buffer");
    }
}

impl StorageBackend for BufferFile {
    fn as_slice(&self) -> &[u8] {
        &self.mmap
    }
}

impl std::fmt::Debug for BufferFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferFile")
            .field("path", &self.path)
            .field("header", &self.header)
            .field("bytes", &self.mmap.len())
            .finish()
    }
}

/// Map `path`, run `f` over the buffer and unmap it again
///
/// The mapping is released on every exit path, including when `f` fails.
pub fn with_buffer<P, F, T>(path: P, config: &LoadConfig, f: F) -> Result<T>
where
    P: AsRef<Path>,
    F: FnOnce(Buffer<'_>) -> Result<T>,
{
    let file = BufferFile::open(path, config)?;
    let result = file.buffer().and_then(f);
    file.release();
    result
}
