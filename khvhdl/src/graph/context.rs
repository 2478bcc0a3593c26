use super::hierarchy::*;
use super::mem::*;
use super::signal::*;
use super::value::*;

use typed_arena::Arena;

/// A top-level container/owner object for everything a conversion run creates.
///
/// A `Context` owns all [`Signal`]s, [`Memory`]s and [`HierarchyNode`]s produced while elaborating a design, including those produced by recursive component conversions.
/// It must outlive the [`Convertor::convert`] call it's passed to.
///
/// # Examples
///
/// ```
/// use khvhdl::*;
///
/// let c = Context::new();
///
/// // Signals created directly on a context are unnamed until they're bound to a top-level port.
/// let clk = c.signal(false);
/// let data = c.signal(Bits::new(0u32, 8));
/// ```
///
/// [`Convertor::convert`]: ./vhdl/struct.Convertor.html#method.convert
/// [`HierarchyNode`]: ./struct.HierarchyNode.html
/// [`Memory`]: ./struct.Memory.html
/// [`Signal`]: ./struct.Signal.html
#[must_use]
pub struct Context<'a> {
    pub(super) signal_arena: Arena<Signal>,
    pub(super) memory_arena: Arena<Memory<'a>>,
    pub(super) node_arena: Arena<HierarchyNode<'a>>,
}

impl<'a> Context<'a> {
    /// Creates a new, empty `Context`.
    pub fn new() -> Context<'a> {
        Context {
            signal_arena: Arena::new(),
            memory_arena: Arena::new(),
            node_arena: Arena::new(),
        }
    }

    /// Creates an unnamed [`Signal`] holding `value`, typically used as a top-level block argument.
    ///
    /// [`Signal`]: ./struct.Signal.html
    pub fn signal(&'a self, value: impl Into<Value>) -> &'a Signal {
        self.signal_arena.alloc(Signal::new(String::new(), value.into()))
    }

    /// Creates an unnamed [`Memory`] with `depth` elements, each holding `value`.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    ///
    /// [`Memory`]: ./struct.Memory.html
    pub fn memory(&'a self, value: impl Into<Value>, depth: usize) -> &'a Memory<'a> {
        let value = value.into();
        self.alloc_memory(String::new(), vec![value; depth])
    }

    pub(crate) fn alloc_signal(&'a self, name: String, value: Value) -> &'a Signal {
        self.signal_arena.alloc(Signal::new(name, value))
    }

    pub(crate) fn alloc_memory(&'a self, name: String, values: Vec<Value>) -> &'a Memory<'a> {
        if values.is_empty() {
            panic!("Cannot create memory \"{}\" with 0 elements.", name);
        }
        let elements = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                let element_name = if name.is_empty() {
                    String::new()
                } else {
                    format!("{}({})", name, i)
                };
                self.alloc_signal(element_name, value)
            })
            .collect();
        self.alloc_memory_of(name, elements)
    }

    /// Groups existing signals into a memory.
    pub(crate) fn alloc_memory_of(&'a self, name: String, elements: Vec<&'a Signal>) -> &'a Memory<'a> {
        self.memory_arena.alloc(Memory { name, elements })
    }

    pub(crate) fn alloc_node(&'a self, node: HierarchyNode<'a>) -> &'a HierarchyNode<'a> {
        self.node_arena.alloc(node)
    }
}

impl<'a> Default for Context<'a> {
    fn default() -> Self {
        Context::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_elements_are_named_after_memory() {
        let c = Context::new();

        let m = c.alloc_memory("ram".into(), vec![Value::Int(0); 3]);

        let names: Vec<_> = m.elements().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["ram(0)", "ram(1)", "ram(2)"]);
    }

    #[test]
    #[should_panic(expected = "Cannot create memory \"ram\" with 0 elements.")]
    fn empty_memory_error() {
        let c = Context::new();

        let _ = c.alloc_memory("ram".into(), Vec::new());
    }
}
