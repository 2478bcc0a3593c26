use super::mem::*;
use super::signal::*;
use super::value::*;

use std::ops::{Add, BitAnd, BitOr, BitXor, Not, Sub};

/// An expression read by a process statement.
///
/// Expressions are usually built from signal references with Rust's operators:
///
/// ```
/// use khvhdl::*;
///
/// let c = Context::new();
///
/// let a = c.signal(Bits::new(0u32, 8));
/// let b = c.signal(Bits::new(0u32, 8));
/// let sum = a + b;
/// let masked = (a & b) | Expr::lit(Bits::new(1u32, 8));
/// ```
#[derive(Clone)]
pub enum Expr<'a> {
    Ref(&'a Signal),
    Lit(Value),
    MemRead {
        mem: &'a Memory<'a>,
        address: Box<Expr<'a>>,
    },
    Not(Box<Expr<'a>>),
    Bin {
        op: BinOp,
        lhs: Box<Expr<'a>>,
        rhs: Box<Expr<'a>>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    BitAnd,
    BitOr,
    BitXor,
    Equal,
    NotEqual,
}

impl<'a> Expr<'a> {
    pub fn lit(value: impl Into<Value>) -> Expr<'a> {
        Expr::Lit(value.into())
    }

    pub fn read(mem: &'a Memory<'a>, address: impl Into<Expr<'a>>) -> Expr<'a> {
        Expr::MemRead {
            mem,
            address: Box::new(address.into()),
        }
    }

    pub fn eq(self, rhs: impl Into<Expr<'a>>) -> Expr<'a> {
        Expr::bin(BinOp::Equal, self, rhs.into())
    }

    pub fn ne(self, rhs: impl Into<Expr<'a>>) -> Expr<'a> {
        Expr::bin(BinOp::NotEqual, self, rhs.into())
    }

    fn bin(op: BinOp, lhs: Expr<'a>, rhs: Expr<'a>) -> Expr<'a> {
        Expr::Bin {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Calls `f` for every signal this expression reads, including memory elements.
    pub(crate) fn visit_signals(&self, f: &mut dyn FnMut(&'a Signal)) {
        match self {
            Expr::Ref(signal) => f(signal),
            Expr::Lit(_) => (),
            Expr::MemRead { mem, address } => {
                for element in mem.elements.iter() {
                    f(element);
                }
                address.visit_signals(f);
            }
            Expr::Not(source) => source.visit_signals(f),
            Expr::Bin { lhs, rhs, .. } => {
                lhs.visit_signals(f);
                rhs.visit_signals(f);
            }
        }
    }
}

impl<'a> From<&'a Signal> for Expr<'a> {
    fn from(signal: &'a Signal) -> Self {
        Expr::Ref(signal)
    }
}

macro_rules! bin_op_impls {
    ($($trait:ident, $method:ident, $op:expr;)*) => {
        $(
            impl<'a, R: Into<Expr<'a>>> $trait<R> for Expr<'a> {
                type Output = Expr<'a>;

                fn $method(self, rhs: R) -> Expr<'a> {
                    Expr::bin($op, self, rhs.into())
                }
            }

            impl<'a, R: Into<Expr<'a>>> $trait<R> for &'a Signal {
                type Output = Expr<'a>;

                fn $method(self, rhs: R) -> Expr<'a> {
                    Expr::bin($op, Expr::Ref(self), rhs.into())
                }
            }
        )*
    };
}

bin_op_impls! {
    Add, add, BinOp::Add;
    Sub, sub, BinOp::Sub;
    BitAnd, bitand, BinOp::BitAnd;
    BitOr, bitor, BinOp::BitOr;
    BitXor, bitxor, BinOp::BitXor;
}

impl<'a> Not for Expr<'a> {
    type Output = Expr<'a>;

    fn not(self) -> Expr<'a> {
        Expr::Not(Box::new(self))
    }
}

impl<'a> Not for &'a Signal {
    type Output = Expr<'a>;

    fn not(self) -> Expr<'a> {
        Expr::Not(Box::new(Expr::Ref(self)))
    }
}

/// The storage location a [`Stmt::Assign`] writes.
#[derive(Clone)]
pub enum Target<'a> {
    Signal(&'a Signal),
    Memory {
        mem: &'a Memory<'a>,
        address: Expr<'a>,
    },
}

impl<'a> From<&'a Signal> for Target<'a> {
    fn from(signal: &'a Signal) -> Self {
        Target::Signal(signal)
    }
}

/// A statement in a process body.
#[derive(Clone)]
pub enum Stmt<'a> {
    Assign {
        target: Target<'a>,
        expr: Expr<'a>,
    },
    If {
        cond: Expr<'a>,
        then: Vec<Stmt<'a>>,
        otherwise: Vec<Stmt<'a>>,
    },
}

impl<'a> Stmt<'a> {
    pub fn assign(target: impl Into<Target<'a>>, expr: impl Into<Expr<'a>>) -> Stmt<'a> {
        Stmt::Assign {
            target: target.into(),
            expr: expr.into(),
        }
    }

    pub fn write(mem: &'a Memory<'a>, address: impl Into<Expr<'a>>, expr: impl Into<Expr<'a>>) -> Stmt<'a> {
        Stmt::Assign {
            target: Target::Memory {
                mem,
                address: address.into(),
            },
            expr: expr.into(),
        }
    }

    pub fn when(cond: impl Into<Expr<'a>>, then: Vec<Stmt<'a>>, otherwise: Vec<Stmt<'a>>) -> Stmt<'a> {
        Stmt::If {
            cond: cond.into(),
            then,
            otherwise,
        }
    }

    /// Calls `read` for every signal this statement reads and `driven` for every signal it writes.
    pub(crate) fn visit_signals(
        &self,
        read: &mut dyn FnMut(&'a Signal),
        driven: &mut dyn FnMut(&'a Signal),
    ) {
        match self {
            Stmt::Assign { target, expr } => {
                match target {
                    Target::Signal(signal) => driven(signal),
                    Target::Memory { mem, address } => {
                        for element in mem.elements.iter() {
                            driven(element);
                        }
                        address.visit_signals(read);
                    }
                }
                expr.visit_signals(read);
            }
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                cond.visit_signals(read);
                for stmt in then.iter().chain(otherwise.iter()) {
                    stmt.visit_signals(read, driven);
                }
            }
        }
    }
}

/// When a process runs.
#[derive(Clone)]
pub enum Sensitivity<'a> {
    /// Runs whenever any signal it reads changes
    Comb,
    /// Runs on the rising edge of `clock`
    RisingEdge(&'a Signal),
}
