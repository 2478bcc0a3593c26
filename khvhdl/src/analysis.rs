use crate::graph::*;
use crate::vhdl::{GenState, MemLayout};

/// Prepares a fresh elaboration for writing.
///
/// Marks signal usage from every process, labels processes with unique suffixes, and registers the enumerated types, constants and memory layouts the elaboration needs.
pub(crate) fn analyze(elab: &mut Elaboration, state: &mut GenState) {
    for (_, port) in elab.ports.iter() {
        port.used.set(true);
    }

    for generator in elab.generators.iter_mut() {
        if let Generator::Process(process) = generator {
            mark_usage(process);
            process.label = format!("KH{}_{}", state.next_suffix(), process.name.to_uppercase());
        }
    }

    for &signal in elab.signals.iter() {
        if let Some(ty) = signal.value().enum_type() {
            state.enum_types.insert(ty.clone());
        }
    }
    for (_, port) in elab.ports.iter() {
        if let Some(ty) = port.value().enum_type() {
            state.enum_port_types.insert(ty.clone());
        }
    }

    for (name, value) in elab.constants.iter() {
        state.constants.insert(name.clone(), value.clone());
    }

    for &mem in elab.memories.iter() {
        register_memory(state, mem.name(), mem);
    }
    for (name, mem) in elab.port_memories.iter() {
        register_memory(state, name, mem);
    }
}

fn mark_usage(process: &Process) {
    let mut read = |signal: &Signal| {
        signal.used.set(true);
        signal.read.set(true);
    };
    let mut driven = |signal: &Signal| {
        signal.used.set(true);
        signal.driven.set(true);
    };

    if let Sensitivity::RisingEdge(clock) = process.sensitivity {
        read(clock);
    }
    for stmt in process.body.iter() {
        stmt.visit_signals(&mut read, &mut driven);
    }
}

fn register_memory(state: &mut GenState, name: &str, mem: &Memory) {
    if let Some(ty) = mem.elements()[0].value().enum_type() {
        state.enum_types.insert(ty.clone());
    }
    state
        .mem_layouts
        .insert(name.to_string(), MemLayout::of(name, mem));
}
