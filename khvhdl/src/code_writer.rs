use crate::error::{Error, Result};

use std::io::Write;

pub struct CodeWriter<W: Write> {
    w: W,
    indent_level: u32,
}

impl<W: Write> CodeWriter<W> {
    pub fn new(w: W) -> CodeWriter<W> {
        CodeWriter { w, indent_level: 0 }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn unindent(&mut self) -> Result<()> {
        if self.indent_level == 0 {
            return Err(Error::IndentUnderflow);
        }
        self.indent_level -= 1;
        Ok(())
    }

    pub fn append_indent(&mut self) -> Result<()> {
        for _ in 0..self.indent_level {
            write!(self.w, "    ")?;
        }
        Ok(())
    }

    pub fn append_newline(&mut self) -> Result<()> {
        writeln!(self.w)?;
        Ok(())
    }

    pub fn append(&mut self, s: &str) -> Result<()> {
        write!(self.w, "{}", s)?;
        Ok(())
    }

    pub fn append_line(&mut self, s: &str) -> Result<()> {
        self.append_indent()?;
        self.append(s)?;
        self.append_newline()?;
        Ok(())
    }

    /// Appends each line of `s` at the current indent level.
    pub fn append_lines(&mut self, s: &str) -> Result<()> {
        for line in s.lines() {
            if line.is_empty() {
                self.append_newline()?;
            } else {
                self.append_line(line)?;
            }
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_lines() {
        let mut w = CodeWriter::new(Vec::new());

        w.append_line("begin").unwrap();
        w.indent();
        w.append_lines("a <= b;\n\nc <= d;").unwrap();
        w.unindent().unwrap();
        w.append_line("end;").unwrap();

        let text = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(text, "begin\n    a <= b;\n\n    c <= d;\nend;\n");
    }

    #[test]
    fn unindent_underflow_error() {
        let mut w = CodeWriter::new(Vec::new());

        match w.unindent() {
            Err(Error::IndentUnderflow) => (),
            _ => panic!("Expected an indent underflow error"),
        }
    }
}
