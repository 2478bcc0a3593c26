use crate::code_writer::CodeWriter;
use crate::error::Result;
use crate::graph::Value;

use std::io::Write;

/// Returns the VHDL type of signals holding `value`.
pub fn vhdl_type(value: &Value) -> String {
    match value {
        Value::Bool(_) => "std_logic".into(),
        Value::Int(_) => "integer".into(),
        Value::Bits(bits) => format!("unsigned({} downto 0)", bits.bit_width() - 1),
        Value::Enum(item) => item.ty.vhdl_name(),
    }
}

/// Returns the VHDL literal for `value`.
pub fn vhdl_literal(value: &Value) -> String {
    match value {
        Value::Bool(true) => "'1'".into(),
        Value::Bool(false) => "'0'".into(),
        Value::Int(value) => format!("{}", value),
        Value::Bits(bits) => format!("to_unsigned({}, {})", bits.value(), bits.bit_width()),
        Value::Enum(item) => item.name().into(),
    }
}

pub struct SignalDecl {
    pub name: String,
    pub ty: String,
}

impl SignalDecl {
    pub fn write<W: Write>(&self, w: &mut CodeWriter<W>) -> Result<()> {
        w.append_line(&format!("signal {}: {};", self.name, self.ty))
    }
}

#[derive(Clone)]
pub enum Expr {
    BinOp {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        op: BinOp,
    },
    Index {
        name: String,
        address: Box<Expr>,
    },
    Literal {
        text: String,
    },
    Ref {
        name: String,
    },
    ToInteger {
        source: Box<Expr>,
    },
    UnOp {
        source: Box<Expr>,
        op: UnOp,
    },
}

impl Expr {
    pub fn write<W: Write>(&self, w: &mut CodeWriter<W>) -> Result<()> {
        match self {
            Expr::BinOp { lhs, rhs, op } => {
                w.append("(")?;
                lhs.write(w)?;
                w.append(&format!(
                    " {} ",
                    match op {
                        BinOp::Add => "+",
                        BinOp::BitAnd => "and",
                        BinOp::BitOr => "or",
                        BinOp::BitXor => "xor",
                        BinOp::Equal => "=",
                        BinOp::NotEqual => "/=",
                        BinOp::Sub => "-",
                    }
                ))?;
                rhs.write(w)?;
                w.append(")")?;
            }
            Expr::Index { name, address } => {
                w.append(&format!("{}(", name))?;
                address.write(w)?;
                w.append(")")?;
            }
            Expr::Literal { text } => {
                w.append(text)?;
            }
            Expr::Ref { name } => {
                w.append(name)?;
            }
            Expr::ToInteger { source } => {
                w.append("to_integer(")?;
                source.write(w)?;
                w.append(")")?;
            }
            Expr::UnOp { source, op } => {
                w.append(match op {
                    UnOp::Not => "not ",
                })?;
                source.write(w)?;
            }
        }

        Ok(())
    }
}

#[derive(Clone, Copy)]
pub enum BinOp {
    Add,
    BitAnd,
    BitOr,
    BitXor,
    Equal,
    NotEqual,
    Sub,
}

#[derive(Clone, Copy)]
pub enum UnOp {
    Not,
}

pub enum Stmt {
    Assign {
        target: Expr,
        expr: Expr,
    },
    If {
        cond: Expr,
        then: Vec<Stmt>,
        otherwise: Vec<Stmt>,
    },
}

impl Stmt {
    pub fn write<W: Write>(&self, w: &mut CodeWriter<W>) -> Result<()> {
        match self {
            Stmt::Assign { target, expr } => {
                w.append_indent()?;
                target.write(w)?;
                w.append(" <= ")?;
                expr.write(w)?;
                w.append(";")?;
                w.append_newline()?;
            }
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                w.append_indent()?;
                w.append("if bool(")?;
                cond.write(w)?;
                w.append(") then")?;
                w.append_newline()?;
                w.indent();
                for stmt in then.iter() {
                    stmt.write(w)?;
                }
                w.unindent()?;
                if !otherwise.is_empty() {
                    w.append_line("else")?;
                    w.indent();
                    for stmt in otherwise.iter() {
                        stmt.write(w)?;
                    }
                    w.unindent()?;
                }
                w.append_line("end if;")?;
            }
        }

        Ok(())
    }
}

pub struct Process {
    pub label: String,
    /// Rising-edge clock; combinational processes are sensitive to `all`
    pub clock: Option<String>,
    pub body: Vec<Stmt>,
}

impl Process {
    pub fn write<W: Write>(&self, w: &mut CodeWriter<W>) -> Result<()> {
        let sensitivity = match &self.clock {
            Some(clock) => clock.as_str(),
            _ => "all",
        };
        w.append_line(&format!("{}: process ({}) is", self.label, sensitivity))?;
        w.append_line("begin")?;
        w.indent();
        if let Some(clock) = &self.clock {
            w.append_line(&format!("if rising_edge({}) then", clock))?;
            w.indent();
        }
        for stmt in self.body.iter() {
            stmt.write(w)?;
        }
        if self.clock.is_some() {
            w.unindent()?;
            w.append_line("end if;")?;
        }
        w.unindent()?;
        w.append_line(&format!("end process {};", self.label))?;

        Ok(())
    }
}
