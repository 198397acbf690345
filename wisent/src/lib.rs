//! Wisent - Zero-Copy Expression Buffers
//!
//! This library maps serialized Wisent expression buffers into memory and
//! traverses them without copying, with named channels, parallel aggregation
//! and JSON export on top.
//!
//! ## Architecture
//!
//! Wisent keeps the format and its I/O apart:
//!
//! - **wisent-core**: Pure format definitions, views and validation (no I/O)
//! - **wisent**: Memory mapping, channels, parallel aggregation and export
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wisent::{parse_head_path, table, with_buffer, LoadConfig};
//!
//! fn example() -> wisent::Result<()> {
//!     let config = LoadConfig::default();
//!     let total = with_buffer("datapackage.wisent", &config, |buffer| {
//!         let Some(root) = buffer.root() else { return Ok(0) };
//!         let path = parse_head_path("resources/List/Object/path/Table")?;
//!         let Some(table) = root.path(path)? else { return Ok(0) };
//!         match table::column(&table.expression()?, "GB_temperature")? {
//!             Some(values) => wisent::aggregate::par_sum_element(&values),
//!             None => Ok(0),
//!         }
//!     })?;
//!     println!("sum = {total}");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **mmap** (default): memory-mapped files and named channels
//! - **serde** (default): JSON export
//! - **cli**: the `wisent_cli` example

// Re-export core views and format definitions
pub use wisent_core::{
    // Views
    Atom, Buffer, Children, Element, Expression, FlatChildren, ArgumentRun, Lookup,
    // Format definitions
    ArgumentType, ExpressionDescriptor, RootHeader, SectionLayout, TypeTag,
    // Encoding
    BufferBuilder, Node,
    // Traits and utilities
    StorageBackend, ScalarAtom, WisentError, parse_head_path, sum_numeric,
};

pub mod aggregate;
#[cfg(feature = "mmap")]
pub mod channels;
pub mod config;
pub mod error;
#[cfg(feature = "serde")]
pub mod export;
#[cfg(feature = "mmap")]
pub mod mmap_backend;
pub mod owned_backend;
pub mod table;

pub use config::LoadConfig;
pub use error::{Error, Result};
pub use owned_backend::OwnedBuffer;

#[cfg(feature = "mmap")]
pub use channels::ChannelRegistry;
#[cfg(feature = "mmap")]
pub use mmap_backend::{with_buffer, BufferFile};

#[cfg(feature = "serde")]
pub use export::to_json;
