use super::ir::vhdl_type;

use crate::graph::{EnumType, Memory, Value};

use std::collections::{BTreeMap, BTreeSet};
use std::mem;
use std::rc::Rc;

/// Array type layout registered for a memory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MemLayout {
    pub type_name: String,
    pub depth: usize,
    pub element: String,
}

impl MemLayout {
    /// Layout of `mem` declared as an array signal called `name`.
    pub fn of(name: &str, mem: &Memory) -> MemLayout {
        MemLayout {
            type_name: format!("t_array_{}", name),
            depth: mem.depth(),
            element: vhdl_type(&mem.elements()[0].value()),
        }
    }
}

/// Generation state shared by every conversion in one run, including recursive component conversions.
///
/// Recursive conversions must be bracketed by [`enter_child`] and [`leave_child`] so that the child's allocations are merged back into the parent consistently.
///
/// [`enter_child`]: #method.enter_child
/// [`leave_child`]: #method.leave_child
#[derive(Debug, Default)]
pub struct GenState {
    suffix: u32,
    pub(crate) mem_layouts: BTreeMap<String, MemLayout>,
    pub(crate) enum_types: BTreeSet<Rc<EnumType>>,
    pub(crate) constants: BTreeMap<String, Value>,
    /// Enumerated types appearing in the current block's ports
    pub(crate) enum_port_types: BTreeSet<Rc<EnumType>>,
}

/// Parent state saved by [`GenState::enter_child`].
///
/// [`GenState::enter_child`]: ./struct.GenState.html#method.enter_child
#[must_use]
pub(crate) struct Checkpoint {
    mem_layouts: BTreeMap<String, MemLayout>,
    enum_types: BTreeSet<Rc<EnumType>>,
    constants: BTreeMap<String, Value>,
    enum_port_types: BTreeSet<Rc<EnumType>>,
}

impl GenState {
    pub fn new() -> GenState {
        GenState::default()
    }

    /// Returns a fresh suffix; never returns the same value twice within a run.
    pub(crate) fn next_suffix(&mut self) -> u32 {
        let suffix = self.suffix;
        self.suffix += 1;
        suffix
    }

    /// Saves the parent's state before a component is converted.
    ///
    /// The child starts with the parent's enumerated types and constants, but with no memory layouts and no port types of its own.
    pub(crate) fn enter_child(&mut self) -> Checkpoint {
        Checkpoint {
            mem_layouts: mem::take(&mut self.mem_layouts),
            enum_types: self.enum_types.clone(),
            constants: self.constants.clone(),
            enum_port_types: mem::take(&mut self.enum_port_types),
        }
    }

    /// Merges a finished child conversion back into the parent's state and returns the enumerated types the child exposes in its ports.
    ///
    /// The suffix counter keeps its post-child value. Enumerated types and constants are unioned, except that the child's port types are removed since the child's own package now declares them.
    /// Memory layouts and port types are restored to the parent's.
    pub(crate) fn leave_child(&mut self, checkpoint: Checkpoint) -> BTreeSet<Rc<EnumType>> {
        self.enum_types.extend(checkpoint.enum_types);
        for (name, value) in checkpoint.constants {
            self.constants.entry(name).or_insert(value);
        }
        self.mem_layouts = checkpoint.mem_layouts;

        let child_port_types = mem::replace(&mut self.enum_port_types, checkpoint.enum_port_types);
        for ty in child_port_types.iter() {
            self.enum_types.remove(ty);
        }
        child_port_types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(name: &str) -> MemLayout {
        MemLayout {
            type_name: format!("t_array_{}", name),
            depth: 4,
            element: "std_logic".into(),
        }
    }

    // Stands in for a child conversion: allocates suffixes and registers a type, a constant and a layout.
    fn child(state: &mut GenState, name: &str, port_type: Option<Rc<EnumType>>) -> BTreeSet<Rc<EnumType>> {
        let checkpoint = state.enter_child();
        state.next_suffix();
        state.next_suffix();
        state
            .enum_types
            .insert(EnumType::new(format!("{}_state", name), &["a", "b"]));
        state.constants.insert(format!("{}_K", name), Value::Int(1));
        state.mem_layouts.insert(name.into(), layout(name));
        if let Some(ty) = port_type {
            state.enum_types.insert(ty.clone());
            state.enum_port_types.insert(ty);
        }
        state.leave_child(checkpoint)
    }

    #[test]
    fn suffix_continues_past_child() {
        let mut state = GenState::new();
        assert_eq!(state.next_suffix(), 0);

        child(&mut state, "a", None);

        assert_eq!(state.next_suffix(), 3);
    }

    #[test]
    fn memory_layouts_are_restored() {
        let mut state = GenState::new();
        state.mem_layouts.insert("top".into(), layout("top"));

        child(&mut state, "a", None);

        let names: Vec<_> = state.mem_layouts.keys().cloned().collect();
        assert_eq!(names, vec!["top"]);
    }

    #[test]
    fn child_starts_without_parent_layouts_or_port_types() {
        let mut state = GenState::new();
        state.mem_layouts.insert("top".into(), layout("top"));
        state.enum_port_types.insert(EnumType::new("bus", &["x"]));

        let checkpoint = state.enter_child();

        assert!(state.mem_layouts.is_empty());
        assert!(state.enum_port_types.is_empty());
        let _ = state.leave_child(checkpoint);
        assert_eq!(state.enum_port_types.len(), 1);
    }

    #[test]
    fn port_types_move_to_child_package() {
        let mut state = GenState::new();
        let parent_port = EnumType::new("bus", &["x"]);
        state.enum_port_types.insert(parent_port.clone());
        let child_port = EnumType::new("mode", &["fast", "slow"]);

        let exposed = child(&mut state, "a", Some(child_port.clone()));

        assert!(exposed.contains(&child_port));
        assert!(!state.enum_types.contains(&child_port));
        assert!(state.enum_types.iter().any(|ty| ty.name() == "a_state"));
        assert_eq!(state.enum_port_types.len(), 1);
        assert!(state.enum_port_types.contains(&parent_port));
    }

    #[test]
    fn sibling_merge_is_order_independent() {
        let mut ab = GenState::new();
        child(&mut ab, "a", None);
        child(&mut ab, "b", None);

        let mut ba = GenState::new();
        child(&mut ba, "b", None);
        child(&mut ba, "a", None);

        assert_eq!(ab.enum_types, ba.enum_types);
        assert_eq!(ab.constants, ba.constants);
        assert_eq!(ab.mem_layouts, ba.mem_layouts);
    }
}
