use crate::graph::{Arg, BlockId, HierarchyNode, Value};

use indexmap::IndexMap;

/// One parameter of an instance as captured at its call site.
#[derive(Clone, Debug, PartialEq)]
pub enum Param {
    Value(Value),
    /// Element values of a memory argument
    Memory(Vec<Value>),
}

/// How an instance was called: parameter name to captured value.
pub type ParamSnapshot = IndexMap<String, Param>;

/// Captures the call of `node`.
///
/// Parameter-bound signals and memories contribute their current values rather than their identity, so instances wired to different but equal-valued signals produce equal snapshots.
pub fn snapshot(node: &HierarchyNode) -> ParamSnapshot {
    node.args()
        .iter()
        .map(|(name, arg)| {
            let param = match arg {
                Arg::Signal(signal) => Param::Value(signal.value()),
                Arg::Memory(mem) => {
                    Param::Memory(mem.elements().iter().map(|element| element.value()).collect())
                }
                Arg::Value(value) => Param::Value(value.clone()),
            };
            (name.clone(), param)
        })
        .collect()
}

/// Decides whether two call snapshots describe the same component variant.
///
/// Both must have the same parameter names. Values are compared with [`Value::loose_eq`]; in addition, two fixed-width values must have equal widths, and a fixed-width value never matches a value that isn't fixed-width.
///
/// [`Value::loose_eq`]: ../enum.Value.html#method.loose_eq
pub fn params_equivalent(x: &ParamSnapshot, y: &ParamSnapshot) -> bool {
    if x.len() != y.len() {
        return false;
    }

    for (name, lhs) in x.iter() {
        let rhs = match y.get(name) {
            Some(rhs) => rhs,
            _ => return false,
        };
        let equivalent = match (lhs, rhs) {
            (Param::Value(lhs), Param::Value(rhs)) => values_equivalent(lhs, rhs),
            (Param::Memory(lhs), Param::Memory(rhs)) => {
                lhs.len() == rhs.len()
                    && lhs.iter().zip(rhs.iter()).all(|(lhs, rhs)| values_equivalent(lhs, rhs))
            }
            _ => false,
        };
        if !equivalent {
            return false;
        }
    }

    true
}

/// A component variant claimed during a run.
#[derive(Clone, Debug)]
struct Variant {
    block: BlockId,
    snapshot: ParamSnapshot,
    /// Use clause for the component's enumerated type package
    package: Option<String>,
}

/// Entity names claimed during one conversion run, across every recursion level.
///
/// Reserved names (top-level entities) are never handed out again; component names map to the variant they were claimed for, so an equivalent variant found under another parent reuses the name and file.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    names: IndexMap<String, Option<Variant>>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn reserve(&mut self, name: &str) {
        if !self.names.contains_key(name) {
            self.names.insert(name.to_string(), None);
        }
    }

    /// Returns the name and package use clause of a claimed variant of `block` equivalent to `snapshot`.
    pub fn find(&self, block: BlockId, snapshot: &ParamSnapshot) -> Option<(String, Option<String>)> {
        self.names.iter().find_map(|(name, variant)| match variant {
            Some(variant) if variant.block == block && params_equivalent(&variant.snapshot, snapshot) => {
                Some((name.clone(), variant.package.clone()))
            }
            _ => None,
        })
    }

    /// Claims `preferred`, or `<base>_<n>` with the smallest free `n` starting at 1 if `preferred` is taken.
    pub fn claim(&mut self, preferred: &str, base: &str, block: BlockId, snapshot: ParamSnapshot) -> String {
        let mut name = preferred.to_string();
        let mut n = 1;
        while self.names.contains_key(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        self.names.insert(
            name.clone(),
            Some(Variant {
                block,
                snapshot,
                package: None,
            }),
        );
        name
    }

    pub fn set_package(&mut self, name: &str, use_clause: String) {
        if let Some(Some(variant)) = self.names.get_mut(name) {
            variant.package = Some(use_clause);
        }
    }
}

fn values_equivalent(lhs: &Value, rhs: &Value) -> bool {
    if !lhs.loose_eq(rhs) {
        return false;
    }
    match (lhs.is_fixed_width(), rhs.is_fixed_width()) {
        (true, true) => lhs.bit_width() == rhs.bit_width(),
        (false, false) => true,
        _ => false,
    }
}
