//! Encoder producing Wisent buffers from an in-memory tree
//!
//! Slots are allocated breadth first: the root takes slot 0 and each
//! expression reserves one contiguous range for its children at the moment it
//! is visited. Run compression is applied last, once every tag is known.

use crate::error::Result;
use crate::format::constants::{
    MAX_RUN_LENGTH, RUN_FLAG, RUN_MINIMUM_LENGTH, STRING_TERMINATOR, TYPE_MASK,
};
use crate::format::{ArgumentType, ExpressionDescriptor, RootHeader};
use crate::validation::validate_string;
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

/// A value to encode
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Long(i64),
    Double(f64),
    Text(String),
    Symbol(String),
    Expression { head: String, children: Vec<Node> },
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Node::Symbol(name.into())
    }

    pub fn expression(head: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Expression {
            head: head.into(),
            children,
        }
    }

    pub fn argument_type(&self) -> ArgumentType {
        match self {
            Node::Long(_) => ArgumentType::Long,
            Node::Double(_) => ArgumentType::Double,
            Node::Text(_) => ArgumentType::String,
            Node::Symbol(_) => ArgumentType::Symbol,
            Node::Expression { .. } => ArgumentType::Expression,
        }
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Long(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Double(value)
    }
}

/// Same rendering as a decoded element
impl core::fmt::Display for Node {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Node::Long(value) => write!(f, "{value}"),
            Node::Double(value) => write!(f, "{value:?}"),
            Node::Text(text) => write!(f, "\"{text}\""),
            Node::Symbol(name) => write!(f, "'{name}"),
            Node::Expression { head, children } => {
                write!(f, "({head}")?;
                for child in children {
                    write!(f, " {child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Encoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferBuilder {
    run_compression: bool,
    run_minimum: usize,
}

impl Default for BufferBuilder {
    fn default() -> Self {
        Self {
            run_compression: true,
            run_minimum: RUN_MINIMUM_LENGTH,
        }
    }
}

impl BufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable leading-run compression
    pub fn with_run_compression(mut self, enabled: bool) -> Self {
        self.run_compression = enabled;
        self
    }

    /// Shortest leading run worth compressing; never below 2
    pub fn with_run_minimum(mut self, minimum: usize) -> Self {
        self.run_minimum = minimum.max(2);
        self
    }

    pub fn run_minimum(&self) -> usize {
        self.run_minimum
    }

    /// Serialize `root` into a complete buffer
    pub fn encode(&self, root: &Node) -> Result<Vec<u8>> {
        let mut sections = Sections::default();
        let mut child_ranges = Vec::new();
        let mut queue = VecDeque::new();

        sections.reserve(1);
        queue.push_back((0usize, root));

        while let Some((slot, node)) = queue.pop_front() {
            let (value, kind) = match node {
                Node::Long(value) => (*value as u64, ArgumentType::Long),
                Node::Double(value) => (value.to_bits(), ArgumentType::Double),
                Node::Text(text) => (sections.push_string(text)?, ArgumentType::String),
                Node::Symbol(name) => (sections.push_string(name)?, ArgumentType::Symbol),
                Node::Expression { head, children } => {
                    let head_offset = sections.push_string(head)?;
                    let range = sections.reserve(children.len());
                    queue.extend(range.clone().zip(children.iter()));

                    let index = sections.descriptors.len() as u64;
                    sections.descriptors.push(ExpressionDescriptor::new(
                        head_offset,
                        range.start as u64,
                        range.end as u64,
                    ));
                    child_ranges.push(range);
                    (index, ArgumentType::Expression)
                }
            };
            sections.values[slot] = value;
            sections.tags[slot] = kind.to_u8();
        }

        if self.run_compression {
            for range in &child_ranges {
                self.compress_leading_run(&mut sections.tags, range);
            }
        }
        Ok(sections.finish())
    }

    /// Flag the leading homogeneous run of `range` and store its length
    fn compress_leading_run(&self, tags: &mut [u8], range: &Range<usize>) {
        let slots = &tags[range.clone()];
        let Some(&first) = slots.first() else {
            return;
        };
        let length = slots
            .iter()
            .take(MAX_RUN_LENGTH as usize)
            .take_while(|&&tag| tag & TYPE_MASK == first & TYPE_MASK)
            .count();
        if length < self.run_minimum {
            return;
        }

        tags[range.start] = first | RUN_FLAG;
        tags[range.start + 1] = length as u8;
    }
}

#[derive(Default)]
struct Sections {
    values: Vec<u64>,
    tags: Vec<u8>,
    descriptors: Vec<ExpressionDescriptor>,
    strings: Vec<u8>,
}

impl Sections {
    /// Reserve `count` contiguous slots
    fn reserve(&mut self, count: usize) -> Range<usize> {
        let start = self.values.len();
        self.values.resize(start + count, 0);
        self.tags.resize(start + count, 0);
        start..start + count
    }

    /// Append a null-terminated string and return its blob offset
    fn push_string(&mut self, value: &str) -> Result<u64> {
        validate_string(value)?;
        let offset = self.strings.len() as u64;
        self.strings.extend_from_slice(value.as_bytes());
        self.strings.push(STRING_TERMINATOR);
        Ok(offset)
    }

    fn finish(self) -> Vec<u8> {
        let header = RootHeader::new(self.values.len() as u64, self.descriptors.len() as u64);
        let mut bytes = Vec::with_capacity(
            RootHeader::SIZE
                + self.values.len() * 8
                + self.tags.len()
                + self.descriptors.len() * ExpressionDescriptor::SIZE
                + self.strings.len(),
        );
        bytes.extend_from_slice(&header.to_bytes_array());
        for value in &self.values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&self.tags);
        for descriptor in &self.descriptors {
            bytes.extend_from_slice(&descriptor.to_bytes_array());
        }
        bytes.extend_from_slice(&self.strings);
        bytes
    }
}
