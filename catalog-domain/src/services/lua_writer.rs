//! Structured builder for Lua table source.
//!
//! All quoting and key formatting goes through this writer so the emitter
//! never concatenates raw strings. Tables opened with [`LuaWriter::open_table`]
//! are dropped on close if nothing was written into them, which keeps empty
//! sub-tables out of the output.

use std::fmt::Write as _;

const RESERVED_WORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// How a table key is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuaKey<'a> {
    /// `name = ...`; the caller guarantees `name` is a valid identifier.
    Ident(&'a str),
    /// `['name'] = ...`
    Bracketed(&'a str),
}

impl<'a> LuaKey<'a> {
    /// Bare identifier when Lua allows one, bracketed string otherwise.
    pub fn auto(name: &'a str) -> Self {
        if is_identifier(name) {
            LuaKey::Ident(name)
        } else {
            LuaKey::Bracketed(name)
        }
    }
}

struct OpenTable {
    start: usize,
    written: bool,
}

pub struct LuaWriter {
    out: String,
    stack: Vec<OpenTable>,
}

impl LuaWriter {
    /// Starts a chunk of the form `return { ... }`.
    pub fn returning_table() -> Self {
        Self {
            out: String::from("return {\n"),
            stack: Vec::new(),
        }
    }

    fn depth(&self) -> usize {
        self.stack.len() + 1
    }

    fn indent(&mut self) {
        for _ in 0..self.depth() {
            self.out.push('\t');
        }
    }

    fn mark_written(&mut self) {
        if let Some(top) = self.stack.last_mut() {
            top.written = true;
        }
    }

    fn push_key(&mut self, key: LuaKey<'_>) {
        match key {
            LuaKey::Ident(name) => self.out.push_str(name),
            LuaKey::Bracketed(name) => {
                self.out.push('[');
                self.out.push_str(&quote(name));
                self.out.push(']');
            }
        }
        self.out.push_str(" = ");
    }

    /// Opens `key = {`. Must be paired with [`LuaWriter::close_table`].
    pub fn open_table(&mut self, key: LuaKey<'_>) {
        let start = self.out.len();
        self.indent();
        self.push_key(key);
        self.out.push_str("{\n");
        self.stack.push(OpenTable {
            start,
            written: false,
        });
    }

    /// Opens an array element `{`.
    pub fn open_element(&mut self) {
        let start = self.out.len();
        self.indent();
        self.out.push_str("{\n");
        self.stack.push(OpenTable {
            start,
            written: false,
        });
    }

    /// Closes the innermost table. Returns `false` if the table was empty and
    /// has been removed from the output.
    pub fn close_table(&mut self) -> bool {
        let Some(table) = self.stack.pop() else {
            return false;
        };
        if !table.written {
            self.out.truncate(table.start);
            return false;
        }
        self.indent();
        self.out.push_str("},\n");
        self.mark_written();
        true
    }

    pub fn string_field(&mut self, key: LuaKey<'_>, value: &str) {
        self.indent();
        self.push_key(key);
        self.out.push_str(&quote(value));
        self.out.push_str(",\n");
        self.mark_written();
    }

    /// Writes `value` verbatim. Only for tokens that are already valid Lua
    /// expressions (numbers, booleans, trusted expressions).
    pub fn raw_field(&mut self, key: LuaKey<'_>, value: &str) {
        self.indent();
        self.push_key(key);
        self.out.push_str(value);
        self.out.push_str(",\n");
        self.mark_written();
    }

    pub fn bool_field(&mut self, key: LuaKey<'_>, value: bool) {
        self.raw_field(key, if value { "true" } else { "false" });
    }

    /// Closes any tables left open and the outer `return` table.
    pub fn finish(mut self) -> String {
        while !self.stack.is_empty() {
            self.close_table();
        }
        self.out.push_str("}\n");
        self.out
    }
}

/// Single-quoted Lua string literal with escapes applied.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch.is_ascii_control() => {
                // \ddd takes up to three digits; pad so a following digit is not absorbed.
                let _ = write!(out, "\\{:03}", ch as u32);
            }
            ch => out.push(ch),
        }
    }
    out.push('\'');
    out
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return false;
    }
    !RESERVED_WORDS.contains(&name)
}
