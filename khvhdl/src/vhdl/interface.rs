use crate::graph::{HierarchyNode, Memory, Signal};

use indexmap::IndexMap;

use std::collections::HashMap;
use std::rc::Rc;

/// The externally visible shape of one generated entity.
pub struct Interface<'a> {
    pub(crate) name: String,
    pub(crate) port_names: Vec<String>,
    pub(crate) ports: HashMap<String, &'a Signal>,
    /// Memory arguments; their elements are listed individually in `port_names`
    pub(crate) port_memories: Vec<(String, &'a Memory<'a>)>,
    /// Set by the partitioner when this entity instantiates components
    pub(crate) structure: Option<Rc<Structure<'a>>>,
}

impl<'a> Interface<'a> {
    pub(crate) fn new(
        name: impl Into<String>,
        ports: &[(String, &'a Signal)],
        port_memories: &[(String, &'a Memory<'a>)],
    ) -> Interface<'a> {
        Interface {
            name: name.into(),
            port_names: ports.iter().map(|(name, _)| name.clone()).collect(),
            ports: ports.iter().cloned().collect(),
            port_memories: port_memories.to_vec(),
            structure: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn port_names(&self) -> &[String] {
        &self.port_names
    }

    pub fn port(&self, name: &str) -> Option<&'a Signal> {
        self.ports.get(name).copied()
    }

    pub fn structure(&self) -> Option<&Rc<Structure<'a>>> {
        self.structure.as_ref()
    }

    pub(crate) fn is_port(&self, signal: &'a Signal) -> bool {
        self.ports.values().any(|&port| port == signal)
    }

    /// Renames port `from` to `to` in the port list, the port map and on the signal itself.
    pub(crate) fn rename_port(&mut self, from: &str, to: &str) {
        if let Some(signal) = self.ports.remove(from) {
            signal.set_name(to);
            self.ports.insert(to.to_string(), signal);
            for name in self.port_names.iter_mut() {
                if name == from {
                    *name = to.to_string();
                }
            }
        }
    }
}

/// Partitioning results for one entity: the components it instantiates and how.
pub struct Structure<'a> {
    pub(crate) library: String,
    /// Instance name to hierarchy entry, in discovery order
    pub(crate) instances: IndexMap<String, &'a HierarchyNode<'a>>,
    /// Component name to the names of its instances, in group order
    pub(crate) components: IndexMap<String, Vec<String>>,
    /// Extra use clauses for the entity header
    pub(crate) use_clauses: Vec<String>,
}

impl<'a> Structure<'a> {
    pub fn components(&self) -> &IndexMap<String, Vec<String>> {
        &self.components
    }

    pub fn use_clauses(&self) -> &[String] {
        &self.use_clauses
    }

    pub fn instance(&self, name: &str) -> Option<&'a HierarchyNode<'a>> {
        self.instances.get(name).copied()
    }
}
