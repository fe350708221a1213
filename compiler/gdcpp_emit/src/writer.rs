//! Indented text output for generated C++.

const INDENT: &str = "    ";

/// Line-oriented output buffer with an indentation level.
#[derive(Debug, Default)]
pub struct CodeWriter {
    indent: usize,
    output: String,
}

impl CodeWriter {
    pub fn new() -> Self {
        CodeWriter {
            indent: 0,
            output: String::with_capacity(4096),
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str(INDENT);
        }
    }

    /// Write a line with indentation and a newline.
    pub fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    /// Write a line at column zero, ignoring the current indentation.
    pub fn writeln_flush(&mut self, s: &str) {
        self.output.push_str(s);
        self.output.push('\n');
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Open a `{` block: write `head {` and indent.
    pub fn open(&mut self, head: &str) {
        self.writeln(&format!("{head} {{"));
        self.indent();
    }

    /// Close a block with `tail` (normally `}` or `};`).
    pub fn close(&mut self, tail: &str) {
        self.dedent();
        self.writeln(tail);
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}
