//! Head-name queries over direct children
//!
//! A lookup keeps only the expression-typed groups of an expression's
//! children, flattens them and keeps the elements whose own head matches the
//! requested name. It never descends further than one level.

use crate::atom::Element;
use crate::error::Result;
use crate::expression::{Children, Expression, RunElements};
use crate::format::ArgumentType;

/// Direct children of `expression` whose head equals `head`
pub fn lookup<'a, 'h>(expression: &Expression<'a>, head: &'h str) -> Result<Lookup<'a, 'h>> {
    expression.children().map(|children| Lookup::new(children, head))
}

/// Lazy, ordered matches of a head-name lookup
///
/// Yields `Err` once if a candidate cannot be decoded, then stops.
#[derive(Clone)]
pub struct Lookup<'a, 'h> {
    groups: Children<'a>,
    current: Option<RunElements<'a>>,
    head: &'h str,
    failed: bool,
}

impl<'a, 'h> Lookup<'a, 'h> {
    fn new(groups: Children<'a>, head: &'h str) -> Self {
        Self {
            groups,
            current: None,
            head,
            failed: false,
        }
    }

    /// Head being searched for
    pub fn head(&self) -> &'h str {
        self.head
    }

    fn next_candidate(&mut self) -> Option<Element<'a>> {
        loop {
            if let Some(element) = self.current.as_mut().and_then(Iterator::next) {
                return Some(element);
            }
            let run = self
                .groups
                .find(|run| run.type_code() == ArgumentType::Expression.to_u8())?;
            self.current = Some(run.iter());
        }
    }

    fn matches(&self, element: &Element<'a>) -> Result<bool> {
        element.expression()?.has_head(self.head)
    }
}

impl<'a> Iterator for Lookup<'a, '_> {
    type Item = Result<Element<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while let Some(element) = self.next_candidate() {
            match self.matches(&element) {
                Ok(true) => return Some(Ok(element)),
                Ok(false) => continue,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

impl<'a> Expression<'a> {
    /// Direct children whose head equals `head`
    pub fn lookup<'h>(&self, head: &'h str) -> Result<Lookup<'a, 'h>> {
        lookup(self, head)
    }

    /// First direct child whose head equals `head`
    pub fn first(&self, head: &str) -> Result<Option<Element<'a>>> {
        self.lookup(head)?.next().transpose()
    }
}

impl<'a> Element<'a> {
    /// Direct children whose head equals `head`; empty unless this is an expression
    pub fn lookup<'h>(&self, head: &'h str) -> Result<Lookup<'a, 'h>> {
        self.children().map(|children| Lookup::new(children, head))
    }

    /// First direct child whose head equals `head`
    ///
    /// `Ok(None)` means there is no such child.
    pub fn first(&self, head: &str) -> Result<Option<Element<'a>>> {
        self.lookup(head)?.next().transpose()
    }

    /// Follow `heads` one level at a time, taking the first match at each step
    ///
    /// Returns `Ok(None)` as soon as a step has no match.
    pub fn path<'h, I>(&self, heads: I) -> Result<Option<Element<'a>>>
    where
        I: IntoIterator<Item = &'h str>,
    {
        let mut current = *self;
        for head in heads {
            match current.first(head)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Whether this slot is an expression whose head equals `head`
    pub fn is_expression_with(&self, head: &str) -> Result<bool> {
        match self.as_expression()? {
            Some(expression) => expression.has_head(head),
            None => Ok(false),
        }
    }
}
