use super::emitter::*;
use super::variant::*;
use super::*;

use crate::error::{Result, Warning};
use crate::graph::*;
use crate::validation::SELF_PARAM;

use tracing::debug;

/// Converts the component called `name`, re-elaborating the block of `node` with the values captured in `snapshot`.
///
/// Returns the use clause for the component's enumerated type package, if it has one.
pub(crate) fn emit_component<'a, E: Emitter>(
    convertor: &Convertor<E>,
    session: &mut Session<'a, '_>,
    config: &Config,
    name: &str,
    node: &'a HierarchyNode<'a>,
    snapshot: &ParamSnapshot,
) -> Result<Option<String>> {
    let args = component_args(session, name, node, snapshot);
    let child_config = config.for_component(name);
    debug!(component = %name, depth = ?child_config.max_depth, "entering component");

    let checkpoint = session.state.enter_child();
    let result = convertor.convert_with(session, &child_config, node.block(), args);
    let port_types = session.state.leave_child(checkpoint);
    result?;

    debug!(component = %name, port_types = port_types.len(), "left component");
    if port_types.is_empty() {
        Ok(None)
    } else {
        Ok(Some(format!("use {}.pck_{}.all;", config.library, name)))
    }
}

/// Builds fresh arguments for re-elaborating `node`'s block, so the component gets signals of its own.
///
/// Parameter-bound signals and memories are replaced by new ones holding the captured values; every other parameter takes its captured value.
fn component_args<'a>(
    session: &mut Session<'a, '_>,
    name: &str,
    node: &'a HierarchyNode<'a>,
    snapshot: &ParamSnapshot,
) -> Args<'a> {
    let mut args = Args::new();
    for param in node.params.iter() {
        if let Some(signal) = node.signals().get(param) {
            args.insert(param.clone(), Arg::Signal(session.context.signal(signal.value())));
        } else if let Some(mem) = node.memories().get(param) {
            let values = mem.elements().iter().map(|element| element.value()).collect();
            args.insert(
                param.clone(),
                Arg::Memory(session.context.alloc_memory(String::new(), values)),
            );
        }
    }
    for (param, value) in snapshot.iter() {
        if args.contains(param) || !node.is_param(param) {
            continue;
        }
        let arg = match value {
            Param::Value(value) => Arg::Value(value.clone()),
            Param::Memory(values) => {
                Arg::Memory(session.context.alloc_memory(String::new(), values.clone()))
            }
        };
        args.insert(param.clone(), arg);
    }

    if args.remove(SELF_PARAM).is_some() {
        session.report.warn(Warning::BoundSelfArgument {
            component: name.to_string(),
        });
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::sink::MemorySink;

    #[test]
    fn component_args_are_fresh_copies() {
        let mut d = Design::new();
        let leaf = d.block("leaf", &["self", "a", "ram", "width"], |_, _| Ok(()));
        let top = d.block("top", &["x"], move |s, args| {
            let x = args.get_signal("x")?;
            let ram = s.memory("ram", 2, Bits::new(3u32, 4));
            let leaf_args = Args::new()
                .value("self", 0)
                .signal("a", x)
                .memory("ram", ram)
                .value("width", 4);
            s.instance("u", leaf, leaf_args)
        });
        let c = Context::new();
        let x = c.signal(Bits::new(5u32, 8));
        let elab = elaborate(&c, &d, top, "top", Args::new().signal("x", x)).unwrap();
        let node = elab.hierarchy()[1];
        let mut sink = MemorySink::new();
        let mut session = Session {
            context: &c,
            design: &d,
            sink: &mut sink,
            state: GenState::new(),
            registry: Registry::new(),
            report: Report::default(),
        };

        let args = component_args(&mut session, "leaf", node, &snapshot(node));

        let names: Vec<_> = args.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(names, vec!["a", "ram", "width"]);
        let a = args.get_signal("a").unwrap();
        assert!(a != x);
        assert_eq!(a.value(), Value::from(Bits::new(5u32, 8)));
        let ram = args.get_memory("ram").unwrap();
        assert!(ram != node.memories()["ram"]);
        assert_eq!(ram.elements()[1].value(), Value::from(Bits::new(3u32, 4)));
        assert_eq!(args.get_int("width").unwrap(), 4);
        assert_eq!(
            session.report.warnings,
            vec![Warning::BoundSelfArgument {
                component: "leaf".into(),
            }]
        );
    }
}
