use super::compiler::*;
use super::config::*;
use super::interface::*;
use super::ir::*;
use super::reserved::*;
use super::state::*;
use super::*;

use crate::code_writer::CodeWriter;
use crate::error::Result;
use crate::graph::{EnumType, Generator, Memory, Signal};
use crate::sink::Sink;

use std::collections::BTreeSet;
use std::io::Write;
use std::rc::Rc;

/// Everything the emitter needs to write the body of one entity.
pub struct Unit<'a, 'u> {
    pub intf: &'u Interface<'a>,
    pub signals: &'u [&'a Signal],
    pub memories: &'u [&'a Memory<'a>],
    pub state: &'u GenState,
    pub config: &'u Config,
}

/// Writes the parts of one generated VHDL file, in order.
pub trait Emitter {
    /// Whether this emitter already writes component instances
    const STRUCTURAL: bool = false;

    fn write_file_header<W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        file_name: &str,
        config: &Config,
    ) -> Result<()>;

    /// Writes the declarations of enumerated types used in `intf`'s ports.
    fn write_custom_package<W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        sink: &mut dyn Sink,
        intf: &Interface,
        port_types: &BTreeSet<Rc<EnumType>>,
        config: &Config,
    ) -> Result<()>;

    /// Writes library and use clauses, the entity and the start of the architecture.
    fn write_module_header<W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        intf: &Interface,
        needs_package: bool,
        use_clauses: Option<&str>,
        config: &Config,
    ) -> Result<()>;

    fn write_declarations<W: Write>(&self, w: &mut CodeWriter<W>, unit: &Unit) -> Result<()>;

    fn write_generators<'a, W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        generators: &mut Vec<Generator<'a>>,
        unit: &Unit<'a, '_>,
    ) -> Result<()>;

    fn write_module_footer<W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        intf: &Interface,
        config: &Config,
    ) -> Result<()>;
}

/// Writes flat entities: every process inline, no component instances.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseEmitter;

impl Emitter for BaseEmitter {
    fn write_file_header<W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        file_name: &str,
        config: &Config,
    ) -> Result<()> {
        w.append_line(&format!("-- File: {}", file_name))?;
        w.append_line(&format!(
            "-- Generated by khvhdl {}",
            env!("CARGO_PKG_VERSION")
        ))?;
        if let Some(header) = &config.header {
            for line in header.lines() {
                w.append_line(format!("-- {}", line).trim_end())?;
            }
        }
        w.append_newline()?;

        Ok(())
    }

    fn write_custom_package<W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        _sink: &mut dyn Sink,
        intf: &Interface,
        port_types: &BTreeSet<Rc<EnumType>>,
        _config: &Config,
    ) -> Result<()> {
        if port_types.is_empty() {
            return Ok(());
        }

        let package = format!("pck_{}", intf.name);
        write_libraries(w)?;
        w.append_newline()?;
        w.append_line(&format!("package {} is", package))?;
        w.append_newline()?;
        w.indent();
        for ty in port_types.iter() {
            write_enum_type(w, ty)?;
        }
        w.unindent()?;
        w.append_newline()?;
        w.append_line(&format!("end package {};", package))?;
        w.append_newline()?;

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
        write_libraries(w)?;
        w.append_newline()?;
        w.append_line(&format!(
            "use {}.{}.all;",
            config.library,
            support_package_name()
        ))?;
        if needs_package {
            w.append_line(&format!("use {}.pck_{}.all;", config.library, intf.name))?;
        }
        if let Some(use_clauses) = use_clauses {
            w.append_lines(use_clauses)?;
        }
        w.append_newline()?;

        w.append_line(&format!("entity {} is", intf.name))?;
        if !intf.port_names.is_empty() {
            w.indent();
            w.append_line("port (")?;
            w.indent();
            let num_ports = intf.port_names.len();
            for (i, name) in intf.port_names.iter().enumerate() {
                let signal = intf.ports[name];
                w.append_indent()?;
                w.append(&format!(
                    "{}: {} {}",
                    name,
                    if signal.is_driven() { "out" } else { "in" },
                    vhdl_type(&signal.value())
                ))?;
                if i < num_ports - 1 {
                    w.append(";")?;
                }
                w.append_newline()?;
            }
            w.unindent()?;
            w.append_line(");")?;
            w.unindent()?;
        }
        w.append_line(&format!("end entity {};", intf.name))?;
        w.append_newline()?;
        w.append_newline()?;

        w.append_line(&format!(
            "architecture {} of {} is",
            config.architecture, intf.name
        ))?;
        w.append_newline()?;
        w.indent();

        Ok(())
    }

    fn write_declarations<W: Write>(&self, w: &mut CodeWriter<W>, unit: &Unit) -> Result<()> {
        let mut wrote_any = false;

        for ty in unit
            .state
            .enum_types
            .iter()
            .filter(|ty| !unit.state.enum_port_types.contains(*ty))
        {
            write_enum_type(w, ty)?;
            wrote_any = true;
        }

        for (name, value) in unit.state.constants.iter() {
            w.append_line(&format!(
                "constant {}: {} := {};",
                name,
                vhdl_type(value),
                vhdl_literal(value)
            ))?;
            wrote_any = true;
        }

        for (name, mem) in memory_names(unit) {
            let layout = match unit.state.mem_layouts.get(&name) {
                Some(layout) => layout.clone(),
                _ => MemLayout::of(&name, mem),
            };
            w.append_line(&format!(
                "type {} is array(0 to {}) of {};",
                layout.type_name,
                layout.depth - 1,
                layout.element
            ))?;
            SignalDecl {
                name,
                ty: layout.type_name,
            }
            .write(w)?;
            wrote_any = true;
        }

        for &signal in unit.signals.iter() {
            if unit.intf.is_port(signal) || !signal.is_used() || signal.is_cleared() {
                continue;
            }
            SignalDecl {
                name: signal.name(),
                ty: vhdl_type(&signal.value()),
            }
            .write(w)?;
            wrote_any = true;
        }

        if let Some(component_declarations) = &unit.config.component_declarations {
            w.append_lines(component_declarations)?;
            wrote_any = true;
        }

        if wrote_any {
            w.append_newline()?;
        }
        w.unindent()?;
        w.append_line("begin")?;
        w.append_newline()?;
        w.indent();

        Ok(())
    }

    fn write_generators<'a, W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        generators: &mut Vec<Generator<'a>>,
        unit: &Unit<'a, '_>,
    ) -> Result<()> {
        let mut compiler = Compiler::new();
        for (name, mem) in unit.intf.port_memories.iter() {
            compiler.name_memory(mem, sanitize(name));
        }

        for generator in generators.iter() {
            match generator {
                Generator::Process(process) => {
                    compiler.compile_process(process).write(w)?;
                    w.append_newline()?;
                }
                Generator::UserCode(user_code) => {
                    w.append_lines(&user_code.code)?;
                    w.append_newline()?;
                }
                // Only meaningful to structural emitters
                Generator::Structure(_) => (),
            }
        }

        // Memory arguments are declared as arrays and bridged to their element ports
        for (name, mem) in unit.intf.port_memories.iter() {
            let name = sanitize(name);
            for (i, element) in mem.elements().iter().enumerate() {
                if element.is_driven() {
                    w.append_line(&format!("{} <= {}({});", element.name(), name, i))?;
                } else {
                    w.append_line(&format!("{}({}) <= {};", name, i, element.name()))?;
                }
            }
            w.append_newline()?;
        }

        Ok(())
    }

    fn write_module_footer<W: Write>(
        &self,
        w: &mut CodeWriter<W>,
        _intf: &Interface,
        config: &Config,
    ) -> Result<()> {
        w.unindent()?;
        w.append_line(&format!("end architecture {};", config.architecture))?;

        Ok(())
    }
}

fn write_libraries<W: Write>(w: &mut CodeWriter<W>) -> Result<()> {
    w.append_line("library IEEE;")?;
    w.append_line("use IEEE.std_logic_1164.all;")?;
    w.append_line("use IEEE.numeric_std.all;")?;

    Ok(())
}

fn write_enum_type<W: Write>(w: &mut CodeWriter<W>, ty: &EnumType) -> Result<()> {
    w.append_line(&format!(
        "type {} is ({});",
        ty.vhdl_name(),
        ty.items.join(", ")
    ))
}

/// Array names of the memories declared in `unit`, local memories first.
fn memory_names<'a>(unit: &Unit<'a, '_>) -> Vec<(String, &'a Memory<'a>)> {
    let mut names = Vec::new();
    for &mem in unit.memories.iter() {
        names.push((mem.name().to_string(), mem));
    }
    for (name, mem) in unit.intf.port_memories.iter() {
        names.push((sanitize(name), *mem));
    }
    names
}

/// Writes the versioned support package shared by every file of a conversion run.
pub(crate) fn write_support_package<E: Emitter>(
    emitter: &E,
    sink: &mut dyn Sink,
    config: &Config,
) -> Result<()> {
    let package = support_package_name();
    let file_name = format!("{}.vhd", package);

    let mut w = CodeWriter::new(Vec::new());
    emitter.write_file_header(&mut w, &file_name, config)?;
    write_libraries(&mut w)?;
    w.append_newline()?;

    w.append_line(&format!("package {} is", package))?;
    w.append_newline()?;
    w.indent();
    for arg in SUPPORT_TYPES.iter() {
        w.append_line(&format!("function bool(arg: {}) return boolean;", arg))?;
    }
    w.append_line("function stdl(arg: boolean) return std_logic;")?;
    w.unindent()?;
    w.append_newline()?;
    w.append_line(&format!("end package {};", package))?;
    w.append_newline()?;

    w.append_line(&format!("package body {} is", package))?;
    w.append_newline()?;
    w.indent();
    for (arg, test) in SUPPORT_TYPES.iter().zip(SUPPORT_TESTS.iter()) {
        w.append_line(&format!("function bool(arg: {}) return boolean is", arg))?;
        w.append_line("begin")?;
        w.indent();
        w.append_line(&format!("return {};", test))?;
        w.unindent()?;
        w.append_line("end function bool;")?;
        w.append_newline()?;
    }
    w.append_line("function stdl(arg: boolean) return std_logic is")?;
    w.append_line("begin")?;
    w.indent();
    w.append_line("if arg then")?;
    w.indent();
    w.append_line("return '1';")?;
    w.unindent()?;
    w.append_line("else")?;
    w.indent();
    w.append_line("return '0';")?;
    w.unindent()?;
    w.append_line("end if;")?;
    w.unindent()?;
    w.append_line("end function stdl;")?;
    w.unindent()?;
    w.append_newline()?;
    w.append_line(&format!("end package body {};", package))?;

    sink.write_file(&file_name, &w.into_inner())?;

    Ok(())
}

const SUPPORT_TYPES: [&str; 4] = ["std_logic", "unsigned", "integer", "boolean"];
const SUPPORT_TESTS: [&str; 4] = ["arg = '1'", "arg /= 0", "arg /= 0", "arg"];
