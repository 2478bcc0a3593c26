use super::config::*;
use super::emitter::*;
use super::interface::*;
use super::reserved::*;

use crate::code_writer::CodeWriter;
use crate::error::Result;
use crate::graph::{EnumType, Generator};
use crate::sink::Sink;

use std::collections::BTreeSet;
use std::io::Write;
use std::rc::Rc;

/// Layers component instantiation over a base [`Emitter`].
///
/// The overrides only change behavior for entities the partitioner published a [`Structure`] for:
/// - component instances and their port maps are written after the base emitter's own generators,
/// - enumerated port types go to a `pck_<entity>.vhd` side file instead of the entity's own file,
/// - the structure's use clauses are appended after any others.
///
/// Wrapping an emitter that's already structural delegates straight through to it, so installing the overrides twice is harmless.
///
/// [`Emitter`]: ./trait.Emitter.html
/// [`Structure`]: ./struct.Structure.html
#[derive(Clone, Copy, Debug, Default)]
pub struct Structural<E: Emitter> {
    inner: E,
}

impl<E: Emitter> Structural<E> {
    pub fn install(inner: E) -> Structural<E> {
        Structural { inner }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: Emitter> Emitter for Structural<E> {
    const STRUCTURAL: bool = true;

    fn write_file_header<W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        file_name: &str,
        config: &Config,
    ) -> Result<()> {
        self.inner.write_file_header(w, file_name, config)
    }

    fn write_custom_package<W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        sink: &mut dyn Sink,
        intf: &Interface,
        port_types: &BTreeSet<Rc<EnumType>>,
        config: &Config,
    ) -> Result<()> {
        if E::STRUCTURAL || intf.structure.is_none() || port_types.is_empty() {
            return self
                .inner
                .write_custom_package(w, sink, intf, port_types, config);
        }

        let file_name = format!("pck_{}.vhd", intf.name);
        let mut side = CodeWriter::new(Vec::new());
        self.inner.write_file_header(&mut side, &file_name, config)?;
        self.inner
            .write_custom_package(&mut side, sink, intf, port_types, config)?;
        sink.write_file(&file_name, &side.into_inner())?;

        Ok(())
    }

    fn write_module_header<W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        intf: &Interface,
        needs_package: bool,
        use_clauses: Option<&str>,
        config: &Config,
    ) -> Result<()> {
        let structure = match &intf.structure {
            Some(structure) if !E::STRUCTURAL && !structure.use_clauses.is_empty() => structure,
            _ => {
                return self
                    .inner
                    .write_module_header(w, intf, needs_package, use_clauses, config)
            }
        };

        let extra = structure.use_clauses.join("\n");
        let use_clauses = match use_clauses {
            Some(use_clauses) => format!("{}\n{}", use_clauses, extra),
            _ => extra,
        };
        self.inner
            .write_module_header(w, intf, needs_package, Some(&use_clauses), config)
    }

    fn write_declarations<W: Write>(&self, w: &mut CodeWriter<W>, unit: &Unit) -> Result<()> {
        self.inner.write_declarations(w, unit)
    }

    fn write_generators<'a, W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        generators: &mut Vec<Generator<'a>>,
        unit: &Unit<'a, '_>,
    ) -> Result<()> {
        let structure = match generators.first() {
            Some(Generator::Structure(structure)) if !E::STRUCTURAL => structure.clone(),
            _ => return self.inner.write_generators(w, generators, unit),
        };
        generators.remove(0);

        self.inner.write_generators(w, generators, unit)?;

        for (component, instance_names) in structure.components.iter() {
            for instance_name in instance_names.iter() {
                let node = match structure.instances.get(instance_name) {
                    Some(node) => node,
                    _ => continue,
                };
                let bindings = node.port_bindings();
                if bindings.is_empty() {
                    w.append_line(&format!(
                        "{} : entity {}.{};",
                        instance_name, structure.library, component
                    ))?;
                    w.append_newline()?;
                    continue;
                }

                w.append_line(&format!(
                    "{} : entity {}.{}",
                    instance_name, structure.library, component
                ))?;
                w.indent();
                w.append_line("port map (")?;
                w.indent();
                // Formals follow the renaming the component applied to its own ports
                let formals: Vec<String> = bindings.iter().map(|(formal, _)| formal.clone()).collect();
                let num_bindings = bindings.len();
                for (i, (formal, actual)) in bindings.iter().enumerate() {
                    w.append_indent()?;
                    w.append(&format!("{} => {}", port_name(formal, &formals), actual.name()))?;
                    if i < num_bindings - 1 {
                        w.append(",")?;
                    }
                    w.append_newline()?;
                }
                w.unindent()?;
                w.append_line(");")?;
                w.unindent()?;
                w.append_newline()?;
            }
        }

        Ok(())
    }

    fn write_module_footer<W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        intf: &Interface,
        config: &Config,
    ) -> Result<()> {
        self.inner.write_module_footer(w, intf, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::graph::*;
    use crate::sink::MemorySink;
    use crate::vhdl::GenState;

    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn leaf_design() -> (Design, BlockId) {
        let mut d = Design::new();
        let leaf = d.block("leaf", &["in", "o"], |s, args| {
            let i = args.get_signal("in")?;
            let o = args.get_signal("o")?;
            s.comb("logic", vec![Stmt::assign(o, !i)]);
            Ok(())
        });
        let top = d.block("top", &["a", "b"], move |s, args| {
            let a = args.get_signal("a")?;
            let b = args.get_signal("b")?;
            s.instance("u0", leaf, Args::new().signal("in", a).signal("o", b))
        });
        (d, top)
    }

    fn render<'a, E: Emitter>(
        emitter: &E,
        generators: &mut Vec<Generator<'a>>,
        intf: &Interface<'a>,
    ) -> String {
        let state = GenState::new();
        let config = Config::new();
        let unit = Unit {
            intf,
            signals: &[],
            memories: &[],
            state: &state,
            config: &config,
        };
        let mut w = CodeWriter::new(Vec::new());
        emitter.write_generators(&mut w, generators, &unit).unwrap();
        String::from_utf8(w.into_inner()).unwrap()
    }

    #[test]
    fn writes_instances_after_generators() {
        let (d, top) = leaf_design();
        let c = Context::new();
        let args = Args::new().signal("a", c.signal(false)).signal("b", c.signal(false));
        let elab = elaborate(&c, &d, top, "top", args).unwrap();
        let mut instances = IndexMap::new();
        instances.insert("u0".to_string(), elab.hierarchy()[1]);
        let mut components = IndexMap::new();
        components.insert("leaf".to_string(), vec!["u0".to_string()]);
        let structure = Rc::new(Structure {
            library: "work".into(),
            instances,
            components,
            use_clauses: vec!["use work.leaf;".into()],
        });
        let intf = Interface::new("top", &[], &[]);
        let mut generators = vec![
            Generator::Structure(structure),
            Generator::UserCode(UserCode {
                block: top,
                code: "-- inline".into(),
            }),
        ];

        let text = render(&Structural::install(BaseEmitter), &mut generators, &intf);

        assert_eq!(
            text,
            "-- inline\n\
             \n\
             u0 : entity work.leaf\n    \
             port map (\n        \
             kh_in => a,\n        \
             o => b\n    \
             );\n\
             \n"
        );
        assert_eq!(generators.len(), 1);
    }

    #[test]
    fn portless_instances_have_no_port_map() {
        let mut d = Design::new();
        let beacon = d.block("beacon", &["width"], |s, _| {
            s.user_code("-- beacon");
            Ok(())
        });
        let top = d.block("top", &[], move |s, _| s.instance("b0", beacon, Args::new().value("width", 4)));
        let c = Context::new();
        let elab = elaborate(&c, &d, top, "top", Args::new()).unwrap();
        let mut instances = IndexMap::new();
        instances.insert("b0".to_string(), elab.hierarchy()[1]);
        let mut components = IndexMap::new();
        components.insert("beacon".to_string(), vec!["b0".to_string()]);
        let mut generators = vec![Generator::Structure(Rc::new(Structure {
            library: "work".into(),
            instances,
            components,
            use_clauses: Vec::new(),
        }))];
        let intf = Interface::new("top", &[], &[]);

        let text = render(&Structural::install(BaseEmitter), &mut generators, &intf);

        assert_eq!(text, "b0 : entity work.beacon;\n\n");
    }

    #[test]
    fn formals_avoid_colliding_renames() {
        let mut d = Design::new();
        let leaf = d.block("leaf", &["in", "kh_in", "o"], |s, args| {
            let a = args.get_signal("in")?;
            let b = args.get_signal("kh_in")?;
            let o = args.get_signal("o")?;
            s.comb("logic", vec![Stmt::assign(o, a + b)]);
            Ok(())
        });
        let top = d.block("top", &["x", "y", "z"], move |s, args| {
            let leaf_args = Args::new()
                .signal("in", args.get_signal("x")?)
                .signal("kh_in", args.get_signal("y")?)
                .signal("o", args.get_signal("z")?);
            s.instance("u0", leaf, leaf_args)
        });
        let c = Context::new();
        let args = Args::new()
            .signal("x", c.signal(Bits::new(0u32, 4)))
            .signal("y", c.signal(Bits::new(0u32, 4)))
            .signal("z", c.signal(Bits::new(0u32, 4)));
        let elab = elaborate(&c, &d, top, "top", args).unwrap();
        let mut instances = IndexMap::new();
        instances.insert("u0".to_string(), elab.hierarchy()[1]);
        let mut components = IndexMap::new();
        components.insert("leaf".to_string(), vec!["u0".to_string()]);
        let mut generators = vec![Generator::Structure(Rc::new(Structure {
            library: "work".into(),
            instances,
            components,
            use_clauses: Vec::new(),
        }))];
        let intf = Interface::new("top", &[], &[]);

        let text = render(&Structural::install(BaseEmitter), &mut generators, &intf);

        assert!(text.contains("kh_kh_in => x,\n"));
        assert!(text.contains("kh_in => y,\n"));
        assert!(text.contains("o => z\n"));
    }

    #[test]
    fn nested_install_is_idempotent() {
        let (d, top) = leaf_design();
        let c = Context::new();
        let args = Args::new().signal("a", c.signal(false)).signal("b", c.signal(false));
        let elab = elaborate(&c, &d, top, "top", args).unwrap();
        let make_generators = || {
            let mut instances = IndexMap::new();
            instances.insert("u0".to_string(), elab.hierarchy()[1]);
            let mut components = IndexMap::new();
            components.insert("leaf".to_string(), vec!["u0".to_string()]);
            vec![Generator::Structure(Rc::new(Structure {
                library: "work".into(),
                instances,
                components,
                use_clauses: Vec::new(),
            }))]
        };
        let intf = Interface::new("top", &[], &[]);

        let once = render(&Structural::install(BaseEmitter), &mut make_generators(), &intf);
        let twice = render(
            &Structural::install(Structural::install(BaseEmitter)),
            &mut make_generators(),
            &intf,
        );

        assert_eq!(once, twice);
    }

    #[test]
    fn routes_port_types_to_side_file() {
        let intf = Interface {
            structure: Some(Rc::new(Structure {
                library: "work".into(),
                instances: IndexMap::new(),
                components: IndexMap::new(),
                use_clauses: Vec::new(),
            })),
            ..Interface::new("top", &[], &[])
        };
        let mut types = BTreeSet::new();
        types.insert(EnumType::new("mode", &["fast", "slow"]));
        let mut sink = MemorySink::new();

        let mut w = CodeWriter::new(Vec::new());
        Structural::install(BaseEmitter)
            .write_custom_package(&mut w, &mut sink, &intf, &types, &Config::new())
            .unwrap();

        assert!(w.into_inner().is_empty());
        let side = sink.get("pck_top.vhd").unwrap();
        assert!(side.starts_with("-- File: pck_top.vhd\n"));
        assert!(side.contains("type t_enum_mode is (fast, slow);"));
    }
}
