use super::mem::*;
use super::scope::*;
use super::signal::*;
use super::value::*;

use crate::error::{Error, Result};

use indexmap::IndexMap;

use std::rc::Rc;

/// Identifies a block definition registered in a [`Design`].
///
/// Two instances are instances of the same block iff their `BlockId`s are equal.
///
/// [`Design`]: ./struct.Design.html
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BlockId(pub(crate) usize);

pub(crate) type BlockBody = dyn for<'a, 'e> Fn(&mut Scope<'a, 'e>, &Args<'a>) -> Result<()>;

/// A functional block definition: a name, a statically declared parameter list and a body that elaborates one instance.
pub struct Block {
    pub(crate) name: String,
    pub(crate) params: Vec<String>,
    pub(crate) body: Box<BlockBody>,
}

impl Block {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// A registry of [`Block`] definitions.
///
/// Blocks must be registered before any block that instantiates them, since a block body refers to other blocks by the [`BlockId`] returned here.
///
/// # Examples
///
/// ```
/// use khvhdl::*;
///
/// let mut d = Design::new();
///
/// let inverter = d.block("inverter", &["i", "o"], |s, args| {
///     let i = args.get_signal("i")?;
///     let o = args.get_signal("o")?;
///     s.comb("logic", vec![Stmt::assign(o, !i)]);
///     Ok(())
/// });
///
/// let top = d.block("top", &["a", "b"], move |s, args| {
///     let inv_args = Args::new()
///         .signal("i", args.get_signal("a")?)
///         .signal("o", args.get_signal("b")?);
///     s.instance("inv", inverter, inv_args)
/// });
/// ```
///
/// [`Block`]: ./struct.Block.html
/// [`BlockId`]: ./struct.BlockId.html
#[derive(Clone, Default)]
pub struct Design {
    blocks: Vec<Rc<Block>>,
}

impl Design {
    pub fn new() -> Design {
        Design { blocks: Vec::new() }
    }

    /// Registers a block called `name` with parameters `params` and returns its [`BlockId`].
    ///
    /// Every call site must provide an argument for each parameter, except for a parameter called `self`, which is treated as an implicit bound-instance argument.
    ///
    /// [`BlockId`]: ./struct.BlockId.html
    pub fn block<F>(&mut self, name: impl Into<String>, params: &[&str], body: F) -> BlockId
    where
        F: for<'a, 'e> Fn(&mut Scope<'a, 'e>, &Args<'a>) -> Result<()> + 'static,
    {
        let id = BlockId(self.blocks.len());
        self.blocks.push(Rc::new(Block {
            name: name.into(),
            params: params.iter().map(|param| param.to_string()).collect(),
            body: Box::new(body),
        }));
        id
    }

    pub fn get(&self, id: BlockId) -> Result<&Rc<Block>> {
        self.blocks.get(id.0).ok_or(Error::UnknownBlock(id.0))
    }
}

/// A value bound to one block parameter at a call site.
#[derive(Clone)]
pub enum Arg<'a> {
    Signal(&'a Signal),
    Memory(&'a Memory<'a>),
    Value(Value),
}

/// The arguments of one block call, keyed by parameter name in insertion order.
///
/// # Examples
///
/// ```
/// use khvhdl::*;
///
/// let c = Context::new();
///
/// let args = Args::new()
///     .signal("a", c.signal(Bits::new(0u32, 8)))
///     .value("width", 8);
/// assert_eq!(args.get_value("width").unwrap(), Value::Int(8));
/// ```
#[derive(Clone, Default)]
pub struct Args<'a> {
    entries: IndexMap<String, Arg<'a>>,
}

impl<'a> Args<'a> {
    pub fn new() -> Args<'a> {
        Args {
            entries: IndexMap::new(),
        }
    }

    pub fn signal(mut self, name: impl Into<String>, signal: &'a Signal) -> Args<'a> {
        self.insert(name, Arg::Signal(signal));
        self
    }

    pub fn memory(mut self, name: impl Into<String>, mem: &'a Memory<'a>) -> Args<'a> {
        self.insert(name, Arg::Memory(mem));
        self
    }

    pub fn value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Args<'a> {
        self.insert(name, Arg::Value(value.into()));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, arg: Arg<'a>) {
        self.entries.insert(name.into(), arg);
    }

    pub fn remove(&mut self, name: &str) -> Option<Arg<'a>> {
        self.entries.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arg<'a>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Arg<'a>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_signal(&self, name: &str) -> Result<&'a Signal> {
        match self.entries.get(name) {
            Some(Arg::Signal(signal)) => Ok(*signal),
            Some(_) => Err(Error::ArgumentKind {
                arg: name.to_string(),
                expected: "signal",
            }),
            None => Err(Error::NoArgument(name.to_string())),
        }
    }

    pub fn get_memory(&self, name: &str) -> Result<&'a Memory<'a>> {
        match self.entries.get(name) {
            Some(Arg::Memory(mem)) => Ok(*mem),
            Some(_) => Err(Error::ArgumentKind {
                arg: name.to_string(),
                expected: "memory",
            }),
            None => Err(Error::NoArgument(name.to_string())),
        }
    }

    /// Returns the value of argument `name`; signal arguments yield their current value.
    pub fn get_value(&self, name: &str) -> Result<Value> {
        match self.entries.get(name) {
            Some(Arg::Value(value)) => Ok(value.clone()),
            Some(Arg::Signal(signal)) => Ok(signal.value()),
            Some(Arg::Memory(_)) => Err(Error::ArgumentKind {
                arg: name.to_string(),
                expected: "value",
            }),
            None => Err(Error::NoArgument(name.to_string())),
        }
    }

    /// Returns the integer value of argument `name`, e.g. a width parameter.
    pub fn get_int(&self, name: &str) -> Result<i128> {
        self.get_value(name)?
            .numeric_value()
            .ok_or_else(|| Error::ArgumentKind {
                arg: name.to_string(),
                expected: "integer",
            })
    }
}
