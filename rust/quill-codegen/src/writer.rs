//! Indentation-tracking text sink used by the renderer.
//!
//! A [`CodeWriter`] accumulates generated source one line at a time at the
//! current indentation depth. It is single-use: build one, write into it,
//! and take the buffer with [`CodeWriter::finish`]. No state survives a
//! generation call.

/// Accumulates generated source, tracking the current indentation depth.
pub struct CodeWriter {
    buf: String,
    indent_unit: String,
    depth: usize,
}

impl CodeWriter {
    /// A writer indenting by `indent_width` spaces per level.
    pub fn new(indent_width: u32) -> Self {
        CodeWriter {
            buf: String::new(),
            indent_unit: " ".repeat(indent_width as usize),
            depth: 0,
        }
    }

    /// Write one line at the current depth. An empty string produces a blank
    /// line with no trailing spaces.
    pub fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str(&self.indent_unit);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    /// Write a blank line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Write a `///` doc comment, one marker per line of `text`.
    pub fn doc(&mut self, text: &str) {
        for line in text.lines() {
            if line.is_empty() {
                self.line("///");
            } else {
                self.line(&format!("/// {line}"));
            }
        }
    }

    /// Run `body` one indentation level deeper.
    pub fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.push();
        body(self);
        self.pop();
    }

    /// Write `open {`, the indented body, then the closing brace.
    pub fn braced(&mut self, open: &str, body: impl FnOnce(&mut Self)) {
        self.line(&format!("{open} {{"));
        self.indented(body);
        self.line("}");
    }

    /// Increase the indentation depth.
    pub fn push(&mut self) {
        self.depth += 1;
    }

    /// Decrease the indentation depth.
    pub fn pop(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Whether nothing has been written yet.
    pub fn is_fresh(&self) -> bool {
        self.buf.is_empty()
    }

    /// Take the accumulated text.
    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_lines() {
        let mut w = CodeWriter::new(4);
        w.line("hello");
        w.line("world");
        assert_eq!(w.finish(), "hello\nworld\n");
    }

    #[test]
    fn indentation_tracks_depth() {
        let mut w = CodeWriter::new(2);
        w.line("level 0");
        w.indented(|w| {
            w.line("level 1");
            w.indented(|w| w.line("level 2"));
            w.line("level 1 again");
        });
        w.line("level 0 again");
        assert_eq!(
            w.finish(),
            "level 0\n  level 1\n    level 2\n  level 1 again\nlevel 0 again\n"
        );
    }

    #[test]
    fn braced_blocks() {
        let mut w = CodeWriter::new(4);
        w.braced("enum Greeter", |w| {
            w.braced("enum Method", |w| w.line("typealias Input = HelloRequest"));
        });
        insta::assert_snapshot!(w.finish().trim_end(), @r"
        enum Greeter {
            enum Method {
                typealias Input = HelloRequest
            }
        }
        ");
    }

    #[test]
    fn blank_lines_carry_no_indentation() {
        let mut w = CodeWriter::new(4);
        w.indented(|w| {
            w.line("first");
            w.blank();
            w.line("");
            w.line("second");
        });
        assert_eq!(w.finish(), "    first\n\n\n    second\n");
    }

    #[test]
    fn doc_comments() {
        let mut w = CodeWriter::new(4);
        w.doc("Says hello.\n\nOne reply per request.");
        assert_eq!(
            w.finish(),
            "/// Says hello.\n///\n/// One reply per request.\n"
        );
    }

    #[test]
    fn pop_saturates() {
        let mut w = CodeWriter::new(4);
        w.pop();
        w.line("still at the margin");
        assert_eq!(w.finish(), "still at the margin\n");
    }
}
