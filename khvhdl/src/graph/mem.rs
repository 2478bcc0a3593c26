use super::signal::*;

use std::hash::{Hash, Hasher};
use std::ptr;

/// A named, ordered sequence of [`Signal`]s treated as a unit, created by the [`Scope`]::[`memory`] method.
///
/// Memories are written as a single array signal in generated VHDL.
/// When a memory is passed to a block parameter, it's decomposed into its element signals for port-map purposes, and the element ports are named `<param>_<index>`.
///
/// [`Scope`]: ./struct.Scope.html
/// [`memory`]: ./struct.Scope.html#method.memory
/// [`Signal`]: ./struct.Signal.html
#[must_use]
pub struct Memory<'a> {
    pub(crate) name: String,
    pub(crate) elements: Vec<&'a Signal>,
}

impl<'a> Memory<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elements(&self) -> &[&'a Signal] {
        &self.elements
    }

    pub fn depth(&self) -> usize {
        self.elements.len()
    }
}

impl<'a> Eq for &'a Memory<'a> {}

impl<'a> Hash for &'a Memory<'a> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(*self as *const _ as usize)
    }
}

impl<'a> PartialEq for &'a Memory<'a> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(*self, *other)
    }
}
