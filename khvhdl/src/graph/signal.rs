use super::value::*;

use std::cell::{Cell, RefCell};
use std::hash::{Hash, Hasher};
use std::ptr;

/// A named, typed storage location, created by the [`Context`]::[`signal`] or [`Scope`]::[`signal`] methods.
///
/// A signal's type is determined by its current value: [`Value::Bool`] signals are single bits, [`Value::Bits`] signals are unsigned vectors, [`Value::Int`] signals are integers and [`Value::Enum`] signals hold items of their enumerated type.
///
/// Signals are identified by reference, never by name; two signals with the same name from unrelated blocks are distinct.
///
/// [`Context`]: ./struct.Context.html
/// [`signal`]: ./struct.Context.html#method.signal
/// [`Scope`]: ./struct.Scope.html
#[must_use]
pub struct Signal {
    pub(crate) name: RefCell<String>,
    pub(crate) value: RefCell<Value>,

    pub(crate) used: Cell<bool>,
    pub(crate) read: Cell<bool>,
    pub(crate) driven: Cell<bool>,
    pub(crate) cleared: Cell<bool>,
}

impl Signal {
    pub(crate) fn new(name: String, value: Value) -> Signal {
        Signal {
            name: RefCell::new(name),
            value: RefCell::new(value),

            used: Cell::new(false),
            read: Cell::new(false),
            driven: Cell::new(false),
            cleared: Cell::new(false),
        }
    }

    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    pub fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    pub fn is_used(&self) -> bool {
        self.used.get()
    }

    pub fn is_read(&self) -> bool {
        self.read.get()
    }

    pub fn is_driven(&self) -> bool {
        self.driven.get()
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared.get()
    }

    pub(crate) fn set_name(&self, name: impl Into<String>) {
        *self.name.borrow_mut() = name.into();
    }

    /// Releases this signal's storage: its name, flags and value are reset so nothing about it can leak into generated output.
    pub(crate) fn clear(&self) {
        self.name.borrow_mut().clear();
        let reset = self.value.borrow().reset();
        *self.value.borrow_mut() = reset;
        self.used.set(false);
        self.read.set(false);
        self.driven.set(false);
        self.cleared.set(true);
    }
}

impl Eq for &Signal {}

impl Hash for &Signal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(*self as *const _ as usize)
    }
}

impl PartialEq for &Signal {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(*self, *other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    #[test]
    fn identity_is_by_reference() {
        let a = Signal::new("x".into(), Value::Int(0));
        let b = Signal::new("x".into(), Value::Int(0));

        let mut set = HashSet::new();
        set.insert(&a);
        set.insert(&b);
        set.insert(&a);

        assert_eq!(set.len(), 2);
        assert!(&a == &a);
        assert!(&a != &b);
    }

    #[test]
    fn clear_releases_storage() {
        let s = Signal::new("s".into(), Value::from(Bits::new(9u32, 4)));
        s.used.set(true);
        s.read.set(true);

        s.clear();

        assert!(s.is_cleared());
        assert!(!s.is_used());
        assert!(!s.is_read());
        assert_eq!(s.name(), "");
        assert_eq!(s.value(), Value::from(Bits::new(0u32, 4)));
    }
}
