//! Indentation-aware text writer shared by every emitter.
//!
//! Indentation changes can be attached to a write as a [`Gutter`] (a delta applied before
//! and/or after the text), so "write then indent" and "dedent then write" are single calls.
//! A buffered mode collects output aside so an emitter can decide how to frame a block
//! after seeing whether anything was written into it.

/// Indentation deltas applied around a single write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gutter {
    /// Applied before the text is written.
    pub pre: isize,
    /// Applied after the text (and its newlines) are written.
    pub post: isize,
}

impl Gutter {
    pub const NONE: Gutter = Gutter { pre: 0, post: 0 };

    pub fn pre(pre: isize) -> Self {
        Self { pre, post: 0 }
    }

    pub fn post(post: isize) -> Self {
        Self { pre: 0, post }
    }
}

/// Writer that tracks indentation and builds generated source text
pub struct CodeWriter {
    /// The output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Spaces per indentation level
    indent_width: usize,
    /// Whether we're at the start of a line
    at_line_start: bool,
    /// Outputs suspended by `begin_buffer`, innermost last
    suspended: Vec<String>,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new(4)
    }
}

impl CodeWriter {
    /// Create a new writer with the given indentation width
    pub fn new(indent_width: usize) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_width,
            at_line_start: true,
            suspended: Vec::new(),
        }
    }

    /// Get the generated output. Any open buffers are flushed first.
    pub fn finish(mut self) -> String {
        while !self.suspended.is_empty() {
            self.flush_buffer();
        }
        self.output
    }

    /// Increase indentation level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation level
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Get current indentation level
    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    fn shift(&mut self, delta: isize) {
        if delta >= 0 {
            self.indent_level += delta.unsigned_abs();
        } else {
            self.indent_level = self.indent_level.saturating_sub(delta.unsigned_abs());
        }
    }

    /// Write indentation if at line start
    fn write_indent(&mut self) {
        if self.at_line_start {
            let indent = " ".repeat(self.indent_level * self.indent_width);
            self.output.push_str(&indent);
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    /// Write just a newline
    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Write multiple blank lines
    pub fn blank_lines(&mut self, count: usize) {
        for _ in 0..count {
            self.newline();
        }
    }

    /// Write one empty line
    pub fn blank(&mut self) {
        self.newline();
    }

    /// Write a string and newline
    pub fn line(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    /// Write `text` followed by `newlines` newlines, shifting indentation by the gutter.
    pub fn line_with(&mut self, text: &str, newlines: usize, gutter: Gutter) {
        self.shift(gutter.pre);
        self.write(text);
        self.blank_lines(newlines);
        self.shift(gutter.post);
    }

    /// Write a line, then indent (`struct X {`).
    pub fn open(&mut self, text: &str) {
        self.line_with(text, 1, Gutter::post(1));
    }

    /// Dedent, then write a line (`};`).
    pub fn close(&mut self, text: &str) {
        self.line_with(text, 1, Gutter::pre(-1));
    }

    /// Write every line of a multi-line block at the current indentation.
    pub fn lines(&mut self, block: &str) {
        for l in block.lines() {
            if l.is_empty() {
                self.newline();
            } else {
                self.line(l);
            }
        }
    }

    // ------------------------------------------------------------------
    // Buffered output
    // ------------------------------------------------------------------

    /// Start collecting output aside. Buffers nest.
    pub fn begin_buffer(&mut self) {
        let outer = std::mem::take(&mut self.output);
        self.suspended.push(outer);
        self.at_line_start = true;
    }

    /// Number of lines written since the innermost `begin_buffer`.
    pub fn buffered_lines(&self) -> usize {
        if self.suspended.is_empty() {
            return 0;
        }
        self.output.lines().count()
    }

    /// Close the innermost buffer and return its text, restoring the enclosing output.
    ///
    /// The caller can write a header line before putting the text back with
    /// [`CodeWriter::write_raw`].
    pub fn end_buffer(&mut self) -> String {
        match self.suspended.pop() {
            Some(outer) => {
                let buffered = std::mem::replace(&mut self.output, outer);
                self.at_line_start = self.output.is_empty() || self.output.ends_with('\n');
                buffered
            }
            None => String::new(),
        }
    }

    /// Append the innermost buffer to the enclosing output.
    pub fn flush_buffer(&mut self) {
        let buffered = self.end_buffer();
        self.write_raw(&buffered);
    }

    /// Drop the innermost buffer.
    pub fn discard_buffer(&mut self) {
        self.end_buffer();
    }

    /// Append already-indented text verbatim.
    pub fn write_raw(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.output.push_str(text);
        self.at_line_start = text.ends_with('\n');
    }

    // ------------------------------------------------------------------
    // C++ boilerplate
    // ------------------------------------------------------------------

    /// Banner comment at the top of a generated file.
    pub fn file_header(&mut self, artifact: &str, comment: &str) {
        self.line("/*");
        self.line(&format!(" * {artifact}"));
        if !comment.is_empty() {
            self.line(" *");
            for l in comment.lines() {
                self.line(format!(" * {l}").trim_end());
            }
        }
        self.line(" */");
        self.blank();
    }

    pub fn pragma_once(&mut self) {
        self.line("#pragma once");
        self.blank();
    }

    /// `#include <header>`
    pub fn include_system(&mut self, header: &str) {
        self.line(&format!("#include <{header}>"));
    }

    /// `#include "header"`
    pub fn include(&mut self, header: &str) {
        self.line(&format!("#include \"{header}\""));
    }

    /// Open a namespace. Its body is not indented.
    pub fn namespace_open(&mut self, namespace: &str) {
        self.line(&format!("namespace {namespace} {{"));
        self.blank();
    }

    pub fn namespace_close(&mut self, namespace: &str) {
        self.line(&format!("}}  // namespace {namespace}"));
    }

    /// Access specifier inside a class body, half-indented (`  public:`).
    pub fn access(&mut self, label: &str) {
        self.dedent();
        self.line(&format!("  {label}:"));
        self.indent();
    }

    /// Single-line doxygen brief.
    pub fn brief(&mut self, text: &str) {
        self.line(&format!("/// {}", text.trim()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_writer() -> CodeWriter {
        CodeWriter::default()
    }

    // ========================================
    // Constructor and finish tests
    // ========================================

    #[test]
    fn test_new_writer_empty_output() {
        let writer = default_writer();
        assert_eq!(writer.finish(), "");
    }

    #[test]
    fn test_new_writer_at_level_zero() {
        let writer = default_writer();
        assert_eq!(writer.current_indent(), 0);
    }

    // ========================================
    // Write tests
    // ========================================

    #[test]
    fn test_write_simple() {
        let mut writer = default_writer();
        writer.write("hello");
        assert_eq!(writer.finish(), "hello");
    }

    #[test]
    fn test_write_empty_string() {
        let mut writer = default_writer();
        writer.write("");
        assert_eq!(writer.finish(), "");
    }

    #[test]
    fn test_write_multiple() {
        let mut writer = default_writer();
        writer.write("hello");
        writer.write(" ");
        writer.write("world");
        assert_eq!(writer.finish(), "hello world");
    }

    #[test]
    fn test_line_adds_newline() {
        let mut writer = default_writer();
        writer.line("hello");
        writer.line("");
        assert_eq!(writer.finish(), "hello\n\n");
    }

    #[test]
    fn test_blank_lines_between_content() {
        let mut writer = default_writer();
        writer.line("line1");
        writer.blank_lines(2);
        writer.line("line2");
        assert_eq!(writer.finish(), "line1\n\n\nline2\n");
    }

    // ========================================
    // Indent/dedent tests
    // ========================================

    #[test]
    fn test_dedent_at_zero_stays_zero() {
        let mut writer = default_writer();
        writer.dedent();
        assert_eq!(writer.current_indent(), 0);
    }

    #[test]
    fn test_indent_affects_output() {
        let mut writer = default_writer();
        writer.indent();
        writer.line("indented");
        writer.dedent();
        writer.line("not indented");
        assert_eq!(writer.finish(), "    indented\nnot indented\n");
    }

    #[test]
    fn test_indent_width_2() {
        let mut writer = CodeWriter::new(2);
        writer.indent();
        writer.indent();
        writer.write("text");
        assert_eq!(writer.finish(), "    text");
    }

    #[test]
    fn test_blank_line_has_no_trailing_spaces() {
        let mut writer = default_writer();
        writer.indent();
        writer.line("a");
        writer.blank();
        writer.line("b");
        assert_eq!(writer.finish(), "    a\n\n    b\n");
    }

    // ========================================
    // Gutter tests
    // ========================================

    #[test]
    fn test_open_and_close() {
        let mut writer = default_writer();
        writer.open("struct A {");
        writer.line("int x;");
        writer.close("};");
        assert_eq!(writer.finish(), "struct A {\n    int x;\n};\n");
    }

    #[test]
    fn test_line_with_pre_and_post() {
        let mut writer = default_writer();
        writer.indent();
        writer.indent();
        writer.line_with("} else {", 1, Gutter { pre: -1, post: 1 });
        assert_eq!(writer.current_indent(), 2);
        assert_eq!(writer.finish(), "    } else {\n");
    }

    #[test]
    fn test_line_with_no_newline() {
        let mut writer = default_writer();
        writer.line_with("a", 0, Gutter::NONE);
        writer.line_with("b", 2, Gutter::NONE);
        assert_eq!(writer.finish(), "ab\n\n");
    }

    #[test]
    fn test_negative_gutter_saturates() {
        let mut writer = default_writer();
        writer.line_with("x", 1, Gutter::pre(-3));
        assert_eq!(writer.current_indent(), 0);
    }

    #[test]
    fn test_lines_indents_each_line() {
        let mut writer = default_writer();
        writer.indent();
        writer.lines("a\n\nb");
        assert_eq!(writer.finish(), "    a\n\n    b\n");
    }

    // ========================================
    // Buffer tests
    // ========================================

    #[test]
    fn test_buffer_counts_lines() {
        let mut writer = default_writer();
        writer.line("head");
        writer.begin_buffer();
        assert_eq!(writer.buffered_lines(), 0);
        writer.line("one");
        writer.line("two");
        assert_eq!(writer.buffered_lines(), 2);
        writer.flush_buffer();
        assert_eq!(writer.finish(), "head\none\ntwo\n");
    }

    #[test]
    fn test_buffer_keeps_indentation_of_buffered_lines() {
        let mut writer = default_writer();
        writer.indent();
        writer.begin_buffer();
        writer.line("body();");
        writer.dedent();
        assert_eq!(writer.buffered_lines(), 1);
        writer.flush_buffer();
        writer.line("}");
        assert_eq!(writer.finish(), "    body();\n}\n");
    }

    #[test]
    fn test_header_written_after_buffer_closed() {
        let mut writer = default_writer();
        writer.begin_buffer();
        writer.indent();
        writer.line("v.visit(x);");
        writer.dedent();
        let body = writer.end_buffer();
        writer.open("void f(Visitor& v) {");
        writer.write_raw(&body);
        writer.close("}");
        assert_eq!(writer.finish(), "void f(Visitor& v) {\n    v.visit(x);\n}\n");
    }

    #[test]
    fn test_end_buffer_without_buffer_is_empty() {
        let mut writer = default_writer();
        writer.line("x");
        assert_eq!(writer.end_buffer(), "");
        assert_eq!(writer.finish(), "x\n");
    }

    #[test]
    fn test_discard_buffer() {
        let mut writer = default_writer();
        writer.line("keep");
        writer.begin_buffer();
        writer.line("drop");
        writer.discard_buffer();
        writer.line("after");
        assert_eq!(writer.finish(), "keep\nafter\n");
    }

    #[test]
    fn test_nested_buffers() {
        let mut writer = default_writer();
        writer.begin_buffer();
        writer.line("outer");
        writer.begin_buffer();
        writer.line("inner");
        assert_eq!(writer.buffered_lines(), 1);
        writer.flush_buffer();
        assert_eq!(writer.buffered_lines(), 2);
        writer.flush_buffer();
        assert_eq!(writer.finish(), "outer\ninner\n");
    }

    #[test]
    fn test_finish_flushes_open_buffers() {
        let mut writer = default_writer();
        writer.begin_buffer();
        writer.line("pending");
        assert_eq!(writer.finish(), "pending\n");
    }

    // ========================================
    // Boilerplate tests
    // ========================================

    #[test]
    fn test_file_header() {
        let mut writer = default_writer();
        writer.file_header("ast.hpp", "generated\n\ndo not edit");
        assert_eq!(
            writer.finish(),
            "/*\n * ast.hpp\n *\n * generated\n *\n * do not edit\n */\n\n"
        );
    }

    #[test]
    fn test_access_specifier() {
        let mut writer = default_writer();
        writer.open("class A {");
        writer.access("public");
        writer.line("A() = default;");
        writer.close("};");
        assert_eq!(writer.finish(), "class A {\n  public:\n    A() = default;\n};\n");
    }

    #[test]
    fn test_includes_and_namespace() {
        let mut writer = default_writer();
        writer.pragma_once();
        writer.include_system("memory");
        writer.include("ast/ast.hpp");
        writer.blank();
        writer.namespace_open("nmodl::ast");
        writer.line("class A;");
        writer.blank();
        writer.namespace_close("nmodl::ast");
        insta::assert_snapshot!(writer.finish(), @r#"
        #pragma once

        #include <memory>
        #include "ast/ast.hpp"

        namespace nmodl::ast {

        class A;

        }  // namespace nmodl::ast
        "#);
    }
}
