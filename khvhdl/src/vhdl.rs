//! Hierarchy-preserving VHDL code generation.
//!
//! A [`Convertor`] elaborates a top block and writes one VHDL entity per distinct component, wiring components together with `entity` instantiations and port maps.
//! Instances of the same block called with equivalent arguments share one component; instances whose arguments differ (including fixed-width values differing only in width) get distinctly named components.
//!
//! [`Convertor`]: ./struct.Convertor.html

mod compiler;
mod config;
mod driver;
mod emitter;
mod interface;
mod ir;
mod partition;
mod reserved;
mod state;
mod structural;
mod variant;

pub use config::*;
pub use emitter::*;
pub use interface::*;
pub use reserved::{is_reserved, sanitize};
pub use state::GenState;
pub use structural::*;
pub use variant::{params_equivalent, Param, ParamSnapshot};

pub(crate) use state::MemLayout;

use reserved::component_name;
use variant::Registry;

use crate::analysis::analyze;
use crate::code_writer::CodeWriter;
use crate::error::{Result, Warning};
use crate::graph::{elaborate, Args, BlockId, Context, Design};
use crate::sink::Sink;

use tracing::{debug, warn};

// Bumped whenever the support package's contents change
const SUPPORT_PACKAGE_VERSION: &str = "01";

/// Name of the support package every generated entity uses.
pub fn support_package_name() -> String {
    format!("pck_khvhdl_{}", SUPPORT_PACKAGE_VERSION)
}

/// The outcome of a successful conversion.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Report {
    /// Names of the entities written, in completion order
    pub components: Vec<String>,
    pub warnings: Vec<Warning>,
}

impl Report {
    pub(crate) fn warn(&mut self, warning: Warning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Everything shared by the conversions of one run.
pub(crate) struct Session<'a, 's> {
    pub context: &'a Context<'a>,
    pub design: &'s Design,
    pub sink: &'s mut dyn Sink,
    pub state: GenState,
    /// Entity names claimed so far in this run
    pub registry: Registry,
    pub report: Report,
}

/// Converts blocks into VHDL files.
///
/// # Examples
///
/// ```
/// use khvhdl::*;
/// use khvhdl::vhdl::*;
///
/// let mut d = Design::new();
/// let inverter = d.block("inverter", &["i", "o"], |s, args| {
///     let i = args.get_signal("i")?;
///     let o = args.get_signal("o")?;
///     s.comb("logic", vec![Stmt::assign(o, !i)]);
///     Ok(())
/// });
/// let top = d.block("top", &["a", "b"], move |s, args| {
///     let inv_args = Args::new()
///         .signal("i", args.get_signal("a")?)
///         .signal("o", args.get_signal("b")?);
///     s.instance("inv", inverter, inv_args)
/// });
///
/// let c = Context::new();
/// let args = Args::new().signal("a", c.signal(false)).signal("b", c.signal(false));
/// let mut sink = MemorySink::new();
///
/// let report = Convertor::new(Config::new()).convert(&c, &d, top, args, &mut sink)?;
///
/// assert_eq!(report.components, vec!["inverter", "top"]);
/// assert!(sink.get("inverter.vhd").is_some());
/// assert!(sink.get("top.vhd").unwrap().contains("inv : entity work.inverter"));
/// # Ok::<(), khvhdl::Error>(())
/// ```
pub struct Convertor<E: Emitter = Structural<BaseEmitter>> {
    emitter: E,
    config: Config,
}

impl Convertor {
    pub fn new(config: Config) -> Convertor {
        Convertor::with_emitter(Structural::install(BaseEmitter), config)
    }
}

impl<E: Emitter> Convertor<E> {
    pub fn with_emitter(emitter: E, config: Config) -> Convertor<E> {
        Convertor { emitter, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Converts `top` called with `args`, writing every generated file to `sink`.
    ///
    /// Errors abort the whole run, including recursive component conversions; files written before the error are left in `sink`.
    pub fn convert<'a>(
        &self,
        context: &'a Context<'a>,
        design: &Design,
        top: BlockId,
        args: Args<'a>,
        sink: &mut dyn Sink,
    ) -> Result<Report> {
        let mut session = Session {
            context,
            design,
            sink,
            state: GenState::new(),
            registry: Registry::new(),
            report: Report::default(),
        };
        self.convert_with(&mut session, &self.config, top, args)?;
        Ok(session.report)
    }

    pub(crate) fn convert_with<'a>(
        &self,
        session: &mut Session<'a, '_>,
        config: &Config,
        top: BlockId,
        args: Args<'a>,
    ) -> Result<()> {
        let name = match &config.name {
            Some(name) => name.clone(),
            _ => component_name(session.design.get(top)?.name()),
        };
        session.registry.reserve(&name);
        debug!(component = %name, depth = ?config.max_depth, "converting");

        let mut elab = elaborate(session.context, session.design, top, &name, args)?;
        analyze(&mut elab, &mut session.state);
        let mut intf = Interface::new(&name, &elab.ports, &elab.port_memories);

        if !config.max_depth.is_flat() {
            partition::partition(self, session, config, &mut elab, &mut intf)?;
        } else if config.no_support_package {
            // Flat leaf components still need ports that match their parent's port maps
            partition::guard_ports(&mut intf, &mut session.report);
        }

        let file_name = format!("{}.vhd", name);
        let mut w = CodeWriter::new(Vec::new());
        self.emitter.write_file_header(&mut w, &file_name, config)?;
        let needs_package = !session.state.enum_port_types.is_empty();
        self.emitter.write_custom_package(
            &mut w,
            session.sink,
            &intf,
            &session.state.enum_port_types,
            config,
        )?;
        self.emitter.write_module_header(
            &mut w,
            &intf,
            needs_package,
            config.use_clauses.as_deref(),
            config,
        )?;
        let unit = Unit {
            intf: &intf,
            signals: &elab.signals,
            memories: &elab.memories,
            state: &session.state,
            config,
        };
        self.emitter.write_declarations(&mut w, &unit)?;
        self.emitter
            .write_generators(&mut w, &mut elab.generators, &unit)?;
        self.emitter.write_module_footer(&mut w, &intf, config)?;
        session.sink.write_file(&file_name, &w.into_inner())?;

        if !config.no_support_package {
            emitter::write_support_package(&self.emitter, session.sink, config)?;
        }

        debug!(component = %name, "converted");
        session.report.components.push(name);

        Ok(())
    }
}
