use super::ir::*;

use crate::graph;

use std::collections::HashMap;

/// Lowers process statement trees to VHDL IR.
pub struct Compiler<'a> {
    mem_names: HashMap<&'a graph::Memory<'a>, String>,
}

impl<'a> Compiler<'a> {
    pub fn new() -> Compiler<'a> {
        Compiler {
            mem_names: HashMap::new(),
        }
    }

    /// Overrides the array name used for `mem`, e.g. for memories passed as top-level arguments.
    pub fn name_memory(&mut self, mem: &'a graph::Memory<'a>, name: impl Into<String>) {
        self.mem_names.insert(mem, name.into());
    }

    pub fn memory_name(&self, mem: &'a graph::Memory<'a>) -> String {
        match self.mem_names.get(&mem) {
            Some(name) => name.clone(),
            _ => mem.name().to_string(),
        }
    }

    pub fn compile_process(&self, process: &graph::Process<'a>) -> Process {
        Process {
            label: process.label.clone(),
            clock: match process.sensitivity {
                graph::Sensitivity::Comb => None,
                graph::Sensitivity::RisingEdge(clock) => Some(clock.name()),
            },
            body: self.compile_stmts(&process.body),
        }
    }

    fn compile_stmts(&self, stmts: &[graph::Stmt<'a>]) -> Vec<Stmt> {
        stmts.iter().map(|stmt| self.compile_stmt(stmt)).collect()
    }

    fn compile_stmt(&self, stmt: &graph::Stmt<'a>) -> Stmt {
        match stmt {
            graph::Stmt::Assign { target, expr } => Stmt::Assign {
                target: match target {
                    graph::Target::Signal(signal) => Expr::Ref {
                        name: signal.name(),
                    },
                    graph::Target::Memory { mem, address } => self.compile_index(mem, address),
                },
                expr: self.compile_expr(expr),
            },
            graph::Stmt::If {
                cond,
                then,
                otherwise,
            } => Stmt::If {
                cond: self.compile_expr(cond),
                then: self.compile_stmts(then),
                otherwise: self.compile_stmts(otherwise),
            },
        }
    }

    pub fn compile_expr(&self, expr: &graph::Expr<'a>) -> Expr {
        match expr {
            graph::Expr::Ref(signal) => Expr::Ref {
                name: signal.name(),
            },
            graph::Expr::Lit(value) => Expr::Literal {
                text: vhdl_literal(value),
            },
            graph::Expr::MemRead { mem, address } => self.compile_index(mem, address),
            graph::Expr::Not(source) => Expr::UnOp {
                source: Box::new(self.compile_expr(source)),
                op: UnOp::Not,
            },
            graph::Expr::Bin { op, lhs, rhs } => Expr::BinOp {
                lhs: Box::new(self.compile_expr(lhs)),
                rhs: Box::new(self.compile_expr(rhs)),
                op: match op {
                    graph::BinOp::Add => BinOp::Add,
                    graph::BinOp::Sub => BinOp::Sub,
                    graph::BinOp::BitAnd => BinOp::BitAnd,
                    graph::BinOp::BitOr => BinOp::BitOr,
                    graph::BinOp::BitXor => BinOp::BitXor,
                    graph::BinOp::Equal => BinOp::Equal,
                    graph::BinOp::NotEqual => BinOp::NotEqual,
                },
            },
        }
    }

    fn compile_index(&self, mem: &'a graph::Memory<'a>, address: &graph::Expr<'a>) -> Expr {
        let address = match address {
            graph::Expr::Lit(graph::Value::Int(_)) => self.compile_expr(address),
            _ => Expr::ToInteger {
                source: Box::new(self.compile_expr(address)),
            },
        };
        Expr::Index {
            name: self.memory_name(mem),
            address: Box::new(address),
        }
    }
}
