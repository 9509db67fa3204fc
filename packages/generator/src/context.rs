use std::cell::{Cell, RefCell};

/// Spaces per indentation level
pub const INDENT_WIDTH: usize = 4;

/// Output buffer for code generation with line-aware indentation
pub struct EmitContext {
    buffer: RefCell<String>,
    indent_level: Cell<usize>,
    at_line_start: Cell<bool>,
}

impl EmitContext {
    pub fn new() -> Self {
        Self {
            buffer: RefCell::new(String::new()),
            indent_level: Cell::new(0),
            at_line_start: Cell::new(true),
        }
    }

    /// Append text, indenting it first when it starts a line
    pub fn add(&self, text: &str) {
        if text.is_empty() {
            return;
        }

        let mut buffer = self.buffer.borrow_mut();
        if self.at_line_start.get() {
            buffer.push_str(&" ".repeat(self.indent_level.get() * INDENT_WIDTH));
            self.at_line_start.set(false);
        }
        buffer.push_str(text);
    }

    /// Append text and terminate the line
    pub fn add_line(&self, text: &str) {
        self.add(text);
        self.end_line();
    }

    /// Terminate the current line. On an empty line this writes a bare newline.
    pub fn end_line(&self) {
        self.buffer.borrow_mut().push('\n');
        self.at_line_start.set(true);
    }

    /// Increase indentation until the returned guard is dropped
    pub fn indent(&self) -> IndentGuard<'_> {
        self.indent_level.set(self.indent_level.get() + 1);
        IndentGuard { ctx: self }
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level.get()
    }

    pub fn get_output(&self) -> String {
        self.buffer.borrow().clone()
    }

    fn dedent(&self) {
        let level = self.indent_level.get();
        if level > 0 {
            self.indent_level.set(level - 1);
        }
    }
}

impl Default for EmitContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Restores the previous indentation level when dropped, on every exit path
#[must_use = "indentation is restored as soon as the guard is dropped"]
pub struct IndentGuard<'a> {
    ctx: &'a EmitContext,
}

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        self.ctx.dedent();
    }
}
