//! Abstract interfaces for Wisent buffers
//!
//! Traits are pure interfaces: byte sources a buffer can be viewed over, and
//! scalar types a run can be read as.

pub mod backend;
pub mod element;

pub use backend::StorageBackend;
pub use element::ScalarAtom;
