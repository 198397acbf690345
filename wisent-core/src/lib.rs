#![no_std]

//! Wisent Core - Expression Buffer Format and Zero-Copy Views
//!
//! This crate provides the buffer layout definitions and bounds-checked,
//! allocation-free views for traversing serialized Wisent expression trees

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

pub mod aggregate;
pub mod atom;
pub mod buffer;
#[cfg(any(feature = "alloc", test))]
pub mod encode;
pub mod error;
pub mod expression;
pub mod format;
pub mod query;
pub mod traits;
pub mod validation;

pub use aggregate::{sum_element, sum_numeric};
pub use atom::{Atom, Element};
pub use buffer::{ArgumentValues, Buffer, ExpressionTable};
#[cfg(any(feature = "alloc", test))]
pub use encode::{BufferBuilder, Node};
pub use error::*;
pub use expression::{ArgumentRun, Children, Expression, FlatChildren, RunElements, RunValues};
pub use format::*;
pub use query::{lookup, Lookup};
pub use traits::*;
pub use validation::{parse_head_path, validate_string};
