use super::block::*;
use super::mem::*;
use super::signal::*;

use indexmap::IndexMap;

/// What a [`Sub`] entry of a [`HierarchyNode`] refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubKind {
    /// One or more instances of a block
    Block(BlockId),
    /// A process defined directly in the block body
    Process,
}

/// A direct sub-entry declared by a block body, in declaration order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sub {
    pub name: String,
    pub kind: SubKind,
}

/// One node in the flattened elaboration trace, created for every block instance while elaborating a design.
///
/// Nodes are listed depth-first, with the top block at index 0 and level 1.
/// `signals` and `memories` hold parameter-bound entries first (keyed by parameter name, in parameter order), followed by entries declared in the block body (keyed by local name, in declaration order).
#[must_use]
pub struct HierarchyNode<'a> {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) level: u32,
    pub(crate) block: BlockId,
    pub(crate) params: Vec<String>,
    pub(crate) args: Args<'a>,
    pub(crate) signals: IndexMap<String, &'a Signal>,
    pub(crate) memories: IndexMap<String, &'a Memory<'a>>,
    pub(crate) subs: Vec<Sub>,
}

impl<'a> HierarchyNode<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn args(&self) -> &Args<'a> {
        &self.args
    }

    pub fn signals(&self) -> &IndexMap<String, &'a Signal> {
        &self.signals
    }

    pub fn memories(&self) -> &IndexMap<String, &'a Memory<'a>> {
        &self.memories
    }

    pub fn subs(&self) -> &[Sub] {
        &self.subs
    }

    pub(crate) fn is_param(&self, name: &str) -> bool {
        self.params.iter().any(|param| param == name)
    }

    /// Port-map associations for an instance of this node's block: each parameter-bound signal, and each element of every parameter-bound memory, paired with the formal port name it binds to.
    pub(crate) fn port_bindings(&self) -> Vec<(String, &'a Signal)> {
        let mut bindings = Vec::new();
        for (name, &signal) in self.signals.iter() {
            if self.is_param(name) {
                bindings.push((name.clone(), signal));
            }
        }
        for (name, mem) in self.memories.iter() {
            if self.is_param(name) {
                for (i, &element) in mem.elements.iter().enumerate() {
                    bindings.push((format!("{}_{}", name, i), element));
                }
            }
        }
        bindings
    }
}
