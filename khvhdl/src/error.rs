//! Error and warning types.

use std::io;

use thiserror::Error;

/// Errors that abort a conversion run.
///
/// Errors raised inside a recursive component conversion propagate unmodified up to the outermost [`Convertor::convert`] call.
/// Files written before the failure are left in place.
///
/// [`Convertor::convert`]: ./vhdl/struct.Convertor.html#method.convert
#[derive(Debug, Error)]
pub enum Error {
    /// IO error while writing an output file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A [`CodeWriter`](crate::code_writer::CodeWriter) was unindented more times than it was indented.
    #[error("Code writer indent level underflow")]
    IndentUnderflow,

    /// A call site didn't provide a value for one of the block's parameters.
    #[error("Block \"{block}\" was called without a value for parameter \"{param}\"")]
    MissingArgument { block: String, param: String },

    /// A call site provided a value for a parameter the block doesn't declare.
    #[error("Block \"{block}\" was called with argument \"{arg}\", but declares no such parameter")]
    UnknownArgument { block: String, arg: String },

    /// A block body asked for an argument that wasn't provided.
    #[error("No argument called \"{0}\"")]
    NoArgument(String),

    /// A block body asked for an argument as the wrong kind (signal, memory or value).
    #[error("Argument \"{arg}\" is not a {expected}")]
    ArgumentKind { arg: String, expected: &'static str },

    /// A block instantiates itself, directly or through other blocks.
    #[error("Cannot elaborate block \"{block}\" because it has a recursive definition formed by an instance called \"{instance}\"")]
    RecursiveDefinition { block: String, instance: String },

    /// A `BlockId` doesn't belong to the `Design` it was used with.
    #[error("Unknown block id {0}")]
    UnknownBlock(usize),

    /// A name was declared twice in the same scope.
    #[error("\"{name}\" is already declared in \"{scope}\"")]
    DuplicateName { scope: String, name: String },

    /// Signal classification produced inconsistent results.
    #[error("Signal \"{signal}\" is classified as both a port and discardable in \"{component}\"")]
    Classification { component: String, signal: String },
}

/// Non-fatal conditions detected during conversion.
///
/// Every warning is logged once through `tracing` at the point it's detected, and collected in the [`Report`](crate::vhdl::Report).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Warning {
    /// A hierarchy entry couldn't be matched to any sub-instance of the top block.
    #[error("Missing instance name for \"{name}\" (level {level})")]
    UnmatchedInstance { name: String, level: u32 },

    /// A port name collided with a VHDL reserved word and was renamed.
    #[error("Invalid VHDL name for signal \"{from}\", renamed to \"{to}\"")]
    ReservedWord { from: String, to: String },

    /// A bound-instance `self` argument was dropped before recursive conversion.
    #[error("Detected \"self\" argument for component \"{component}\", removed before recursive conversion")]
    BoundSelfArgument { component: String },
}

pub type Result<T> = std::result::Result<T, Error>;
