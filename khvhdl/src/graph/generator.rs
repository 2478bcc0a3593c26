use super::block::*;
use super::stmt::*;

use crate::vhdl::Structure;

use std::rc::Rc;

/// A process defined in a block body with [`Scope::comb`] or [`Scope::seq`].
///
/// [`Scope::comb`]: ./struct.Scope.html#method.comb
/// [`Scope::seq`]: ./struct.Scope.html#method.seq
#[derive(Clone)]
pub struct Process<'a> {
    /// Unique label, assigned during analysis
    pub(crate) label: String,
    pub(crate) name: String,
    /// Index of the owning node in the hierarchy trace
    pub(crate) owner: usize,
    pub(crate) sensitivity: Sensitivity<'a>,
    pub(crate) body: Vec<Stmt<'a>>,
}

impl<'a> Process<'a> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Opaque, user-supplied VHDL attached to a block with [`Scope::user_code`].
///
/// [`Scope::user_code`]: ./struct.Scope.html#method.user_code
#[derive(Clone)]
pub struct UserCode {
    /// The block this code is attached to
    pub(crate) block: BlockId,
    pub(crate) code: String,
}

#[derive(Clone)]
pub enum Generator<'a> {
    Process(Process<'a>),
    UserCode(UserCode),
    /// Partitioning results carried to the writer; only ever the first element of a generator list
    Structure(Rc<Structure<'a>>),
}
