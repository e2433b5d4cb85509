use crate::lexer::{Token, TokenKind};
use crate::parser::Sink;
use core::fmt;

/// Parser sink that re-emits the input as strict JSON text.
///
/// Kept tokens are copied from the source verbatim together with the
/// whitespace gap in front of them, so input that is already strict comes
/// back byte for byte. Only the relaxed spellings are rewritten: single
/// quotes and bare identifiers become double-quoted strings, comments and
/// trailing commas vanish (their surrounding whitespace stays).
pub(crate) struct Emitter<'a> {
    src: &'a str,
    out: String,
    pos: usize,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            src,
            out: String::with_capacity(src.len()),
            pos: 0,
        }
    }

    fn gap_to(&mut self, start: usize) {
        self.out.push_str(&self.src[self.pos..start]);
    }

    pub(crate) fn finish(mut self) -> String {
        // whatever follows the last token is whitespace
        let tail = &self.src[self.pos..];
        self.out.push_str(tail);
        self.out
    }
}

impl<'a> Sink<'a> for Emitter<'a> {
    fn token(&mut self, tok: &Token<'a>) {
        self.gap_to(tok.start);
        let raw = &self.src[tok.start..tok.end];
        let quoted = match &tok.kind {
            TokenKind::Str { value, single: true } => Some(value.as_ref()),
            // a double-quoted string is already strict unless it leaned on
            // the relaxed \' escape
            TokenKind::Str { value, single: false } if has_quote_escape(raw) => {
                Some(value.as_ref())
            }
            TokenKind::Ident(s) => Some(*s),
            _ => None,
        };
        match quoted {
            // String never fails to write
            Some(s) => {
                let _ = write_quoted(&mut self.out, s);
            }
            None => self.out.push_str(raw),
        }
        self.pos = tok.end;
    }

    fn key(&mut self, tok: &Token<'a>) {
        self.token(tok);
    }

    fn skipped(&mut self, tok: &Token<'a>) {
        self.gap_to(tok.start);
        self.pos = tok.end;
    }
}

/// True when a string's raw text contains a `\'` escape. Walks escape by
/// escape so that `\\` followed by a literal `'` does not count.
fn has_quote_escape(raw: &str) -> bool {
    let b = raw.as_bytes();
    let mut i = 0;
    while i + 1 < b.len() {
        if b[i] == b'\\' {
            if b[i + 1] == b'\'' {
                return true;
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    false
}

/// Writes `s` as a strict JSON string literal, double quotes included.
pub(crate) fn write_quoted<W: fmt::Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '\x08' => out.write_str("\\b")?,
            '\x0c' => out.write_str("\\f")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            '\\' => out.write_str("\\\\")?,
            '"' => out.write_str("\\\"")?,
            c if c < ' ' => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}
