use super::block::*;
use super::context::*;
use super::generator::*;
use super::hierarchy::*;
use super::mem::*;
use super::signal::*;
use super::stmt::*;
use super::value::*;

use crate::error::{Error, Result};
use crate::validation::*;

use indexmap::IndexMap;

/// The builder passed to a block body while one instance of the block is elaborated.
///
/// Everything declared through a `Scope` belongs to that instance: signal and memory names are prefixed with the instance's hierarchical path, and processes and user code are recorded as generators owned by the instance.
///
/// # Examples
///
/// ```
/// use khvhdl::*;
///
/// let mut d = Design::new();
///
/// let counter = d.block("counter", &["clk", "count"], |s, args| {
///     let clk = args.get_signal("clk")?;
///     let count = args.get_signal("count")?;
///     let next = s.signal("next", Bits::new(0u32, 8));
///     s.comb("inc", vec![Stmt::assign(next, count + Expr::lit(Bits::new(1u32, 8)))]);
///     s.seq("update", clk, vec![Stmt::assign(count, next)]);
///     Ok(())
/// });
/// ```
pub struct Scope<'a, 'e> {
    elab: &'e mut Elaborator<'a>,
    node: usize,
}

impl<'a, 'e> Scope<'a, 'e> {
    /// The hierarchical path of the instance being elaborated; empty for the top block.
    pub fn path(&self) -> &str {
        &self.elab.nodes[self.node].path
    }

    pub fn context(&self) -> &'a Context<'a> {
        self.elab.context
    }

    /// Declares a signal called `name` in this instance, holding `value`.
    ///
    /// # Panics
    ///
    /// Panics if this instance already has a signal, memory or parameter called `name`.
    pub fn signal(&mut self, name: &str, value: impl Into<Value>) -> &'a Signal {
        self.check_declaration(name);
        let signal = self
            .elab
            .context
            .alloc_signal(self.full_name(name), value.into());
        self.elab.nodes[self.node]
            .signals
            .insert(name.to_string(), signal);
        self.elab.signals.push(signal);
        signal
    }

    /// Declares a memory called `name` in this instance, with `depth` elements each holding `value`.
    ///
    /// # Panics
    ///
    /// Panics if this instance already has a signal, memory or parameter called `name`, or if `depth` is zero.
    pub fn memory(&mut self, name: &str, depth: usize, value: impl Into<Value>) -> &'a Memory<'a> {
        self.check_declaration(name);
        let value = value.into();
        let mem = self
            .elab
            .context
            .alloc_memory(self.full_name(name), vec![value; depth]);
        self.elab.nodes[self.node]
            .memories
            .insert(name.to_string(), mem);
        self.elab.memories.push(mem);
        mem
    }

    /// Declares a named constant.
    pub fn constant(&mut self, name: &str, value: impl Into<Value>) {
        self.elab.constants.insert(name.to_string(), value.into());
    }

    /// Defines a combinational process called `name`.
    ///
    /// # Panics
    ///
    /// Panics if this instance already has a process or sub-instance called `name`.
    pub fn comb(&mut self, name: &str, body: Vec<Stmt<'a>>) {
        self.process(name, Sensitivity::Comb, body);
    }

    /// Defines a process called `name` that runs on the rising edge of `clock`.
    ///
    /// # Panics
    ///
    /// Panics if this instance already has a process or sub-instance called `name`.
    pub fn seq(&mut self, name: &str, clock: &'a Signal, body: Vec<Stmt<'a>>) {
        self.process(name, Sensitivity::RisingEdge(clock), body);
    }

    /// Attaches opaque VHDL `code` to this instance's block.
    pub fn user_code(&mut self, code: impl Into<String>) {
        let block = self.elab.nodes[self.node].block;
        self.elab.generators.push(Generator::UserCode(UserCode {
            block,
            code: code.into(),
        }));
    }

    /// Instantiates `block` as a sub-instance called `name`, elaborating it immediately.
    pub fn instance(&mut self, name: &str, block: BlockId, args: Args<'a>) -> Result<()> {
        self.add_sub(name, SubKind::Block(block))?;
        self.elab.instantiate(self.node, name.to_string(), block, args)
    }

    /// Instantiates `block` once per entry of `args`, as a single sub-entry called `name` whose instances are named `<name>_<index>`.
    pub fn instances(&mut self, name: &str, block: BlockId, args: Vec<Args<'a>>) -> Result<()> {
        self.add_sub(name, SubKind::Block(block))?;
        for (i, args) in args.into_iter().enumerate() {
            self.elab
                .instantiate(self.node, format!("{}_{}", name, i), block, args)?;
        }
        Ok(())
    }

    fn process(&mut self, name: &str, sensitivity: Sensitivity<'a>, body: Vec<Stmt<'a>>) {
        if let Err(e) = self.add_sub(name, SubKind::Process) {
            panic!("{}", e);
        }
        self.elab.generators.push(Generator::Process(Process {
            label: String::new(),
            name: name.to_string(),
            owner: self.node,
            sensitivity,
            body,
        }));
    }

    fn add_sub(&mut self, name: &str, kind: SubKind) -> Result<()> {
        let node = &mut self.elab.nodes[self.node];
        if node.subs.iter().any(|sub| sub.name == name) {
            return Err(Error::DuplicateName {
                scope: node.name.clone(),
                name: name.to_string(),
            });
        }
        node.subs.push(Sub {
            name: name.to_string(),
            kind,
        });
        Ok(())
    }

    fn check_declaration(&self, name: &str) {
        let node = &self.elab.nodes[self.node];
        if node.signals.contains_key(name) || node.memories.contains_key(name) || node.is_param(name) {
            panic!(
                "Cannot declare \"{}\" in \"{}\" because a signal, memory or parameter with the same name already exists.",
                name, node.name
            );
        }
    }

    fn full_name(&self, name: &str) -> String {
        join_path(self.path(), name)
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}_{}", path, name)
    }
}

/// The flattened result of elaborating a top block with concrete arguments.
pub struct Elaboration<'a> {
    pub(crate) name: String,
    /// Depth-first, root first
    pub(crate) hierarchy: Vec<&'a HierarchyNode<'a>>,
    /// Top-level ports in parameter order; memory parameters are expanded to their elements
    pub(crate) ports: Vec<(String, &'a Signal)>,
    /// Top-level memory arguments, keyed by parameter name
    pub(crate) port_memories: Vec<(String, &'a Memory<'a>)>,
    pub(crate) signals: Vec<&'a Signal>,
    pub(crate) memories: Vec<&'a Memory<'a>>,
    pub(crate) generators: Vec<Generator<'a>>,
    pub(crate) constants: IndexMap<String, Value>,
}

impl<'a> Elaboration<'a> {
    pub fn hierarchy(&self) -> &[&'a HierarchyNode<'a>] {
        &self.hierarchy
    }

    pub fn signals(&self) -> &[&'a Signal] {
        &self.signals
    }

    pub fn memories(&self) -> &[&'a Memory<'a>] {
        &self.memories
    }

    pub fn generators(&self) -> &[Generator<'a>] {
        &self.generators
    }
}

pub(crate) struct Elaborator<'a> {
    context: &'a Context<'a>,
    design: Design,

    nodes: Vec<HierarchyNode<'a>>,
    signals: Vec<&'a Signal>,
    memories: Vec<&'a Memory<'a>>,
    generators: Vec<Generator<'a>>,
    constants: IndexMap<String, Value>,

    stack: Vec<BlockId>,
}

impl<'a> Elaborator<'a> {
    fn instantiate(&mut self, parent: usize, name: String, id: BlockId, args: Args<'a>) -> Result<()> {
        let block = self.design.get(id)?.clone();
        validate_args(&block, &args)?;
        validate_instance(&self.design, &self.stack, id, &name)?;

        let parent = &self.nodes[parent];
        let path = join_path(&parent.path, &name);
        let level = parent.level + 1;
        self.nodes
            .push(bound_node(name, path, level, id, &block, args.clone()));
        let index = self.nodes.len() - 1;

        self.stack.push(id);
        let result = {
            let mut scope = Scope {
                elab: &mut *self,
                node: index,
            };
            (block.body)(&mut scope, &args)
        };
        self.stack.pop();
        result
    }
}

fn bound_node<'a>(
    name: String,
    path: String,
    level: u32,
    id: BlockId,
    block: &Block,
    args: Args<'a>,
) -> HierarchyNode<'a> {
    let mut signals = IndexMap::new();
    let mut memories = IndexMap::new();
    for param in block.params.iter() {
        match args.get(param) {
            Some(Arg::Signal(signal)) => {
                signals.insert(param.clone(), *signal);
            }
            Some(Arg::Memory(mem)) => {
                memories.insert(param.clone(), *mem);
            }
            _ => (),
        }
    }

    HierarchyNode {
        name,
        path,
        level,
        block: id,
        params: block.params.clone(),
        args,
        signals,
        memories,
        subs: Vec::new(),
    }
}

/// Elaborates `top` called with `args`, naming the resulting top-level unit `name`.
///
/// Top-level signal arguments are renamed after the parameter they're bound to; elements of top-level memory arguments are renamed `<param>_<index>`.
pub fn elaborate<'a>(
    context: &'a Context<'a>,
    design: &Design,
    top: BlockId,
    name: &str,
    args: Args<'a>,
) -> Result<Elaboration<'a>> {
    let block = design.get(top)?.clone();
    validate_args(&block, &args)?;

    let mut elab = Elaborator {
        context,
        design: design.clone(),

        nodes: Vec::new(),
        signals: Vec::new(),
        memories: Vec::new(),
        generators: Vec::new(),
        constants: IndexMap::new(),

        stack: vec![top],
    };

    let mut ports = Vec::new();
    let mut port_memories = Vec::new();
    for param in block.params.iter() {
        match args.get(param) {
            Some(Arg::Signal(signal)) => {
                signal.set_name(param.as_str());
                ports.push((param.clone(), *signal));
            }
            Some(Arg::Memory(mem)) => {
                for (i, &element) in mem.elements.iter().enumerate() {
                    let port_name = format!("{}_{}", param, i);
                    element.set_name(port_name.as_str());
                    ports.push((port_name, element));
                }
                port_memories.push((param.clone(), *mem));
            }
            _ => (),
        }
    }
    elab.signals.extend(ports.iter().map(|&(_, signal)| signal));

    elab.nodes.push(bound_node(
        name.to_string(),
        String::new(),
        1,
        top,
        &block,
        args.clone(),
    ));
    {
        let mut scope = Scope {
            elab: &mut elab,
            node: 0,
        };
        (block.body)(&mut scope, &args)?;
    }

    let Elaborator {
        nodes,
        signals,
        memories,
        generators,
        constants,
        ..
    } = elab;
    let hierarchy = nodes
        .into_iter()
        .map(|node| context.alloc_node(node))
        .collect();

    Ok(Elaboration {
        name: name.to_string(),
        hierarchy,
        ports,
        port_memories,
        signals,
        memories,
        generators,
        constants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adder_design() -> (Design, BlockId, BlockId) {
        let mut d = Design::new();

        let adder = d.block("adder", &["a", "b", "c"], |s, args| {
            let a = args.get_signal("a")?;
            let b = args.get_signal("b")?;
            let c = args.get_signal("c")?;
            let sum = s.signal("sum", Bits::new(0u32, 8));
            s.comb("logic", vec![Stmt::assign(sum, a + b), Stmt::assign(c, sum)]);
            Ok(())
        });

        let top = d.block("top", &["x", "y", "z"], move |s, args| {
            let x = args.get_signal("x")?;
            let y = args.get_signal("y")?;
            let z = args.get_signal("z")?;
            let t = s.signal("t", Bits::new(0u32, 8));
            s.instance("add0", adder, Args::new().signal("a", x).signal("b", y).signal("c", t))?;
            s.instance("add1", adder, Args::new().signal("a", t).signal("b", y).signal("c", z))?;
            Ok(())
        });

        (d, adder, top)
    }

    fn top_args<'a>(c: &'a Context<'a>) -> Args<'a> {
        Args::new()
            .signal("x", c.signal(Bits::new(0u32, 8)))
            .signal("y", c.signal(Bits::new(0u32, 8)))
            .signal("z", c.signal(Bits::new(0u32, 8)))
    }

    #[test]
    fn builds_depth_first_trace() {
        let (d, adder, top) = adder_design();
        let c = Context::new();

        let e = elaborate(&c, &d, top, "top", top_args(&c)).unwrap();

        let names: Vec<_> = e.hierarchy.iter().map(|n| (n.name(), n.level())).collect();
        assert_eq!(names, vec![("top", 1), ("add0", 2), ("add1", 2)]);
        assert_eq!(e.hierarchy[1].block(), adder);
        assert_eq!(
            e.hierarchy[0].subs(),
            &[
                Sub {
                    name: "add0".into(),
                    kind: SubKind::Block(adder),
                },
                Sub {
                    name: "add1".into(),
                    kind: SubKind::Block(adder),
                },
            ]
        );
    }

    #[test]
    fn names_signals_hierarchically() {
        let (d, _, top) = adder_design();
        let c = Context::new();

        let e = elaborate(&c, &d, top, "top", top_args(&c)).unwrap();

        let names: Vec<_> = e.signals.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["x", "y", "z", "t", "add0_sum", "add1_sum"]);

        let add1 = e.hierarchy[2];
        let keys: Vec<_> = add1.signals().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b", "c", "sum"]);
        assert_eq!(add1.signals()["a"].name(), "t");
    }

    #[test]
    fn records_generators_with_owner() {
        let (d, _, top) = adder_design();
        let c = Context::new();

        let e = elaborate(&c, &d, top, "top", top_args(&c)).unwrap();

        let owners: Vec<_> = e
            .generators
            .iter()
            .map(|g| match g {
                Generator::Process(p) => (p.name.clone(), p.owner),
                _ => panic!("Expected a process"),
            })
            .collect();
        assert_eq!(owners, vec![("logic".to_string(), 1), ("logic".to_string(), 2)]);
    }

    #[test]
    fn instance_arrays_share_one_sub() {
        let mut d = Design::new();
        let leaf = d.block("leaf", &["i"], |_, _| Ok(()));
        let top = d.block("top", &["i"], move |s, args| {
            let i = args.get_signal("i")?;
            s.instances("leaves", leaf, vec![Args::new().signal("i", i); 3])
        });
        let c = Context::new();

        let e = elaborate(&c, &d, top, "top", Args::new().signal("i", c.signal(false))).unwrap();

        assert_eq!(e.hierarchy[0].subs().len(), 1);
        let names: Vec<_> = e.hierarchy[1..].iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["leaves_0", "leaves_1", "leaves_2"]);
    }

    #[test]
    fn recursive_definition_error() {
        let mut d = Design::new();
        let a = d.block("a", &[], |s, _| {
            // Blocks can only refer to blocks registered before them, so recursion needs a forged id.
            s.instance("again", BlockId(0), Args::new())
        });
        let c = Context::new();

        match elaborate(&c, &d, a, "a", Args::new()) {
            Err(Error::RecursiveDefinition { block, instance }) => {
                assert_eq!(block, "a");
                assert_eq!(instance, "again");
            }
            _ => panic!("Expected a recursive definition error"),
        }
    }

    #[test]
    fn duplicate_instance_error() {
        let mut d = Design::new();
        let leaf = d.block("leaf", &[], |_, _| Ok(()));
        let top = d.block("top", &[], move |s, _| {
            s.instance("u", leaf, Args::new())?;
            s.instance("u", leaf, Args::new())
        });
        let c = Context::new();

        match elaborate(&c, &d, top, "top", Args::new()) {
            Err(Error::DuplicateName { scope, name }) => {
                assert_eq!(scope, "top");
                assert_eq!(name, "u");
            }
            _ => panic!("Expected a duplicate name error"),
        }
    }

    #[test]
    #[should_panic(
        expected = "Cannot declare \"x\" in \"top\" because a signal, memory or parameter with the same name already exists."
    )]
    fn duplicate_signal_error() {
        let mut d = Design::new();
        let top = d.block("top", &["x"], |s, _| {
            let _ = s.signal("x", false);
            Ok(())
        });
        let c = Context::new();

        let _ = elaborate(&c, &d, top, "top", Args::new().signal("x", c.signal(false)));
    }
}
