//! Binary format definitions for Wisent expression buffers
//!
//! This module contains pure data structure definitions for the buffer layout.
//! No I/O operations, only layout definitions.

pub mod constants;
pub mod descriptor;
pub mod header;

pub use descriptor::ExpressionDescriptor;
pub use header::{ArgumentType, RootHeader, SectionLayout, TypeTag};
