use super::driver::*;
use super::emitter::*;
use super::interface::*;
use super::reserved::*;
use super::variant::*;
use super::*;

use crate::error::{Error, Result, Warning};
use crate::graph::*;

use indexmap::IndexMap;
use tracing::debug;

use std::collections::HashSet;
use std::rc::Rc;

/// Instances of one block grouped by equivalent call snapshots, in first-encountered order.
type ComponentGroup = Vec<(Vec<String>, ParamSnapshot)>;

/// Splits the root of `elab` into inline logic and component instances, converts each distinct component and publishes the result for the structural emitter.
pub(crate) fn partition<'a, E: Emitter>(
    convertor: &Convertor<E>,
    session: &mut Session<'a, '_>,
    config: &Config,
    elab: &mut Elaboration<'a>,
    intf: &mut Interface<'a>,
) -> Result<()> {
    let root = elab.hierarchy[0];

    let (instances, direct_impl) = match_instances(&elab.hierarchy, &mut session.report);
    guard_ports(intf, &mut session.report);
    filter_generators(&mut elab.generators, root, &direct_impl);
    discard_residue(elab, intf)?;

    let mut groups: IndexMap<BlockId, ComponentGroup> = IndexMap::new();
    for (name, node) in instances.iter() {
        let snapshot = snapshot(node);
        let group = groups.entry(node.block()).or_insert_with(Vec::new);
        match group
            .iter_mut()
            .find(|(_, existing)| params_equivalent(existing, &snapshot))
        {
            Some((names, _)) => names.push(name.clone()),
            _ => group.push((vec![name.clone()], snapshot)),
        }
    }

    let mut components: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut use_clauses = Vec::new();
    for (block, group) in groups.iter() {
        let base_name = component_name(session.design.get(*block)?.name());
        for (index, (names, snapshot)) in group.iter().enumerate() {
            // Equivalent variants converted elsewhere in this run share their entity
            let (name, package) = match session.registry.find(*block, snapshot) {
                Some(found) => {
                    debug!(component = %found.0, instances = ?names, "reusing component");
                    found
                }
                _ => {
                    let preferred = if group.len() > 1 {
                        format!("{}_{}", base_name, index)
                    } else {
                        base_name.clone()
                    };
                    let name = session
                        .registry
                        .claim(&preferred, &base_name, *block, snapshot.clone());
                    debug!(component = %name, instances = ?names, "grouped component");

                    let package = if config.no_component_files {
                        None
                    } else {
                        emit_component(convertor, session, config, &name, instances[&names[0]], snapshot)?
                    };
                    if let Some(package) = &package {
                        session.registry.set_package(&name, package.clone());
                    }
                    (name, package)
                }
            };

            for use_clause in std::iter::once(format!("use {}.{};", config.library, name)).chain(package) {
                if !use_clauses.contains(&use_clause) {
                    use_clauses.push(use_clause);
                }
            }
            components
                .entry(name)
                .or_insert_with(Vec::new)
                .extend(names.iter().cloned());
        }
    }

    let structure = Rc::new(Structure {
        library: config.library.clone(),
        instances,
        components,
        use_clauses,
    });
    intf.structure = Some(structure.clone());
    elab.generators.insert(0, Generator::Structure(structure));

    Ok(())
}

/// Matches each block sub-entry of the root to its level 2 trace entries.
///
/// Returns the matched instances in discovery order, and the names of root sub-entries with no trace entry, whose logic stays inline.
fn match_instances<'a>(
    hierarchy: &[&'a HierarchyNode<'a>],
    report: &mut Report,
) -> (IndexMap<String, &'a HierarchyNode<'a>>, Vec<String>) {
    let root = hierarchy[0];
    let mut instances = IndexMap::new();
    let mut direct_impl = Vec::new();
    let mut matched = vec![false; hierarchy.len()];

    for sub in root.subs().iter() {
        let mut found = false;
        if let SubKind::Block(block) = sub.kind {
            for (index, node) in hierarchy.iter().enumerate().skip(1) {
                if node.level() != 2 || matched[index] || node.block() != block {
                    continue;
                }
                if is_instance_of(node.name(), &sub.name) {
                    instances.insert(node.name().to_string(), *node);
                    matched[index] = true;
                    found = true;
                }
            }
        }
        if !found {
            direct_impl.push(sub.name.clone());
        }
    }

    for (index, node) in hierarchy.iter().enumerate().skip(1) {
        if !matched[index] && node.level() <= 2 {
            report.warn(Warning::UnmatchedInstance {
                name: node.name().to_string(),
                level: node.level(),
            });
        }
    }

    (instances, direct_impl)
}

/// An instance called `name` belongs to sub-entry `sub` if it is `sub` itself or an array member `<sub>_<index>`.
fn is_instance_of(name: &str, sub: &str) -> bool {
    if name == sub {
        return true;
    }
    match name.strip_prefix(sub).and_then(|rest| rest.strip_prefix('_')) {
        Some(index) => !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Renames ports colliding with reserved words.
pub(crate) fn guard_ports(intf: &mut Interface, report: &mut Report) {
    let originals = intf.port_names.clone();
    for from in originals.iter().filter(|name| is_reserved(name)) {
        let to = port_name(from, &originals);
        report.warn(Warning::ReservedWord {
            from: from.clone(),
            to: to.clone(),
        });
        intf.rename_port(from, &to);
    }
}

/// Keeps only the generators written inline for the root: its own processes and user code attached to its block.
fn filter_generators(generators: &mut Vec<Generator>, root: &HierarchyNode, direct_impl: &[String]) {
    generators.retain(|generator| match generator {
        Generator::Process(process) => {
            process.owner == 0 && direct_impl.iter().any(|name| *name == process.name)
        }
        Generator::UserCode(user_code) => user_code.block == root.block(),
        Generator::Structure(_) => false,
    });
}

/// Removes signals and memories that only exist inside component instances.
///
/// Internal signals are the root's own signals and memory elements; anything else below the root that isn't a port is discarded.
fn discard_residue<'a>(elab: &mut Elaboration<'a>, intf: &Interface<'a>) -> Result<()> {
    let root = elab.hierarchy[0];

    let mut internal: HashSet<&'a Signal> = HashSet::new();
    for (name, &signal) in root.signals().iter() {
        if root.is_param(name) || intf.is_port(signal) {
            continue;
        }
        // Dead internal signals may still feed a component's port map
        if !signal.is_used() {
            signal.used.set(true);
            signal.read.set(true);
        }
        internal.insert(signal);
    }
    for (_, mem) in root.memories().iter() {
        for &element in mem.elements().iter() {
            if !intf.is_port(element) {
                internal.insert(element);
            }
        }
    }

    let mut discard: HashSet<&'a Signal> = HashSet::new();
    let mut discard_memories: Vec<&'a Memory<'a>> = Vec::new();
    for node in elab.hierarchy[1..].iter() {
        for (_, &signal) in node.signals().iter() {
            if !internal.contains(&signal) && !intf.is_port(signal) {
                discard.insert(signal);
            }
        }
        for (_, &mem) in node.memories().iter() {
            let mut residue = false;
            for &element in mem.elements().iter() {
                if !internal.contains(&element) && !intf.is_port(element) {
                    discard.insert(element);
                    residue = true;
                }
            }
            if residue && !discard_memories.contains(&mem) {
                discard_memories.push(mem);
            }
        }
    }

    // A memory is dropped as a whole, so none of its elements may be live
    for &mem in discard_memories.iter() {
        for &element in mem.elements().iter() {
            if !discard.contains(&element) {
                return Err(Error::Classification {
                    component: elab.name.clone(),
                    signal: element.name(),
                });
            }
        }
    }

    elab.signals.retain(|&signal| {
        if discard.contains(&signal) {
            signal.clear();
            false
        } else {
            true
        }
    });
    elab.memories.retain(|mem| !discard_memories.contains(mem));
    for &signal in discard.iter() {
        if !signal.is_cleared() {
            signal.clear();
        }
    }

    debug!(
        component = %elab.name,
        discarded = discard.len(),
        retained = elab.signals.len(),
        "classified signals"
    );

    Ok(())
}
