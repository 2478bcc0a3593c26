//! Hierarchy-preserving structural [VHDL](https://en.wikipedia.org/wiki/VHDL) generation for hardware designs described in [Rust](https://www.rust-lang.org/).
//!
//! khvhdl provides an API to describe a [`Design`] as a set of functional blocks, each with a statically declared parameter list and a body that declares [`Signal`]s, [`Memory`]s, processes and sub-instances.
//! A [`vhdl::Convertor`] then writes one VHDL entity per distinct component instead of flattening the whole design, wiring components together with `entity` instantiations and port maps.
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! khvhdl = "0.1"
//! ```
//!
//! # Examples
//!
//! ```rust
//! # fn main() -> khvhdl::Result<()> {
//! use khvhdl::*;
//! use khvhdl::vhdl::*;
//!
//! let mut d = Design::new();
//!
//! // A block with an 8-bit input and output
//! let adder = d.block("adder", &["a", "b", "sum"], |s, args| {
//!     let a = args.get_signal("a")?;
//!     let b = args.get_signal("b")?;
//!     let sum = args.get_signal("sum")?;
//!     s.comb("logic", vec![Stmt::assign(sum, a + b)]);
//!     Ok(())
//! });
//!
//! // Two instances of the same block share one component
//! let top = d.block("top", &["x", "y", "z"], move |s, args| {
//!     let x = args.get_signal("x")?;
//!     let y = args.get_signal("y")?;
//!     let z = args.get_signal("z")?;
//!     let t = s.signal("t", Bits::new(0u32, 8));
//!     s.instance("add0", adder, Args::new().signal("a", x).signal("b", y).signal("sum", t))?;
//!     s.instance("add1", adder, Args::new().signal("a", t).signal("b", y).signal("sum", z))
//! });
//!
//! // Signals created on the context are the top-level ports
//! let c = Context::new();
//! let args = Args::new()
//!     .signal("x", c.signal(Bits::new(0u32, 8)))
//!     .signal("y", c.signal(Bits::new(0u32, 8)))
//!     .signal("z", c.signal(Bits::new(0u32, 8)));
//!
//! // Write adder.vhd, top.vhd and the support package into memory
//! let mut sink = MemorySink::new();
//! let report = Convertor::new(Config::new()).convert(&c, &d, top, args, &mut sink)?;
//!
//! assert_eq!(report.components, vec!["adder", "top"]);
//! # Ok(())
//! # }
//! ```
//!
//! [`Design`]: ./struct.Design.html
//! [`Memory`]: ./struct.Memory.html
//! [`Signal`]: ./struct.Signal.html
//! [`vhdl::Convertor`]: ./vhdl/struct.Convertor.html

// Must be kept up-to-date with version in Cargo.toml
#![doc(html_root_url = "https://docs.rs/khvhdl/0.1.0")]

mod analysis;
mod code_writer;
mod error;
mod graph;
mod sink;
mod validation;
pub mod vhdl;

pub use error::*;
pub use graph::*;
pub use sink::*;
