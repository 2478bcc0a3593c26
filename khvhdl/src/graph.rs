mod block;
mod context;
mod generator;
mod hierarchy;
mod mem;
mod scope;
mod signal;
mod stmt;
mod value;

pub use block::*;
pub use context::*;
pub use generator::*;
pub use hierarchy::*;
pub use mem::*;
pub use scope::*;
pub use signal::*;
pub use stmt::*;
pub use value::*;
