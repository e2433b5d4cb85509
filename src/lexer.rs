use crate::error::{Error, Result};
use std::borrow::Cow;

/// One lexical token. `start..end` is the byte range of the raw text within
/// the source, so `&src[tok.start..tok.end]` recovers it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token<'a> {
    pub(crate) kind: TokenKind<'a>,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// String values borrow from the source when no escape needed decoding.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind<'a> {
    Null,
    True,
    False,
    Num(f64),
    Str { value: Cow<'a, str>, single: bool },
    Ident(&'a str),
    Colon,
    Comma,
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    LineComment,
    BlockComment,
}

impl TokenKind<'_> {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            TokenKind::Null => "'null'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Num(_) => "number",
            TokenKind::Str { .. } => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::ObjectBegin => "'{'",
            TokenKind::ObjectEnd => "'}'",
            TokenKind::ArrayBegin => "'['",
            TokenKind::ArrayEnd => "']'",
            TokenKind::LineComment | TokenKind::BlockComment => "comment",
        }
    }
}

/// Single forward pass over the source bytes. Whitespace is consumed
/// silently; comments come out as tokens and are dealt with by the parser.
pub(crate) struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    tok_start: usize,
    pos: usize,
    buf: String,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            tok_start: 0,
            pos: 0,
            buf: String::new(),
        }
    }

    /// Current byte offset, used for end-of-input error positions.
    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    #[cold]
    fn err(&self, offset: usize, message: impl Into<String>) -> Error {
        Error::Syntax {
            message: message.into(),
            offset,
        }
    }

    fn bnext(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.pos).copied();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn bpeek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
        debug_assert!(self.pos <= self.bytes.len());
    }

    fn skip_ws(&mut self) {
        let (mut p, bs) = (self.pos, self.bytes);
        while p < bs.len() && matches!(bs[p], b'\n' | b' ' | b'\t' | b'\r') {
            p += 1;
        }
        self.pos = p;
    }

    /// `Ok(None)` at end of input.
    pub(crate) fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        self.skip_ws();
        let Some(b) = self.bpeek() else {
            return Ok(None);
        };
        self.tok_start = self.pos;
        let kind = match b {
            b':' => self.punct(TokenKind::Colon),
            b',' => self.punct(TokenKind::Comma),
            b'{' => self.punct(TokenKind::ObjectBegin),
            b'}' => self.punct(TokenKind::ObjectEnd),
            b'[' => self.punct(TokenKind::ArrayBegin),
            b']' => self.punct(TokenKind::ArrayEnd),
            b'"' => self.read_string(b'"')?,
            b'\'' => self.read_string(b'\'')?,
            b'/' if matches!(self.bytes.get(self.pos + 1), Some(b'/') | Some(b'*')) => {
                self.read_comment()?
            }
            _ => self.read_word()?,
        };
        Ok(Some(Token {
            kind,
            start: self.tok_start,
            end: self.pos,
        }))
    }

    fn punct(&mut self, kind: TokenKind<'a>) -> TokenKind<'a> {
        self.bump();
        kind
    }

    fn read_comment(&mut self) -> Result<TokenKind<'a>> {
        self.bump();
        let marker = self.bytes[self.pos];
        self.bump();
        if marker == b'/' {
            // to end of line; the newline itself is whitespace, not comment
            while !matches!(self.bpeek(), None | Some(b'\n')) {
                self.bump();
            }
            return Ok(TokenKind::LineComment);
        }
        // block comments do not nest
        loop {
            match self.bnext() {
                Some(b'*') if self.bpeek() == Some(b'/') => {
                    self.bump();
                    return Ok(TokenKind::BlockComment);
                }
                Some(_) => {}
                None => return Err(self.err(self.tok_start, "unterminated block comment")),
            }
        }
    }

    /// Anything that is not punctuation, a quote, whitespace, or a comment
    /// starter: keywords, numbers, and bare identifiers all begin here and
    /// are told apart only once the full run has been scanned.
    fn read_word(&mut self) -> Result<TokenKind<'a>> {
        let start = self.pos;
        while let Some(b) = self.bpeek() {
            if !is_word_byte(b) {
                break;
            }
            // a comment begun flush against a word still ends it
            if b == b'/' && matches!(self.bytes.get(self.pos + 1), Some(b'/') | Some(b'*')) {
                break;
            }
            self.bump();
        }
        if self.pos == start {
            return Err(self.err(start, format!("unexpected byte 0x{:02x}", self.bytes[start])));
        }
        let text = &self.input[start..self.pos];
        Ok(match text {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => match parse_number(text) {
                Some(n) => TokenKind::Num(n),
                None => TokenKind::Ident(text),
            },
        })
    }

    fn read_string(&mut self, quote: u8) -> Result<TokenKind<'a>> {
        let single = quote == b'\'';
        self.bump();
        self.buf.clear();
        let bs = self.bytes;
        loop {
            let start = self.pos;
            let mut p = self.pos;
            while p < bs.len() && bs[p] != quote && bs[p] != b'\\' && bs[p] >= 0x20 {
                p += 1;
            }
            if p == bs.len() {
                self.pos = p;
                return Err(self.err(self.tok_start, "unterminated string"));
            }
            if bs[p] < 0x20 {
                return Err(self.err(p, format!("raw control character 0x{:02x} in string", bs[p])));
            }
            self.pos = p + 1;
            if bs[p] == quote && self.buf.is_empty() {
                // no escapes, borrow straight from the source
                let value = Cow::Borrowed(&self.input[start..p]);
                return Ok(TokenKind::Str { value, single });
            }
            self.buf.push_str(&self.input[start..p]);
            if bs[p] == quote {
                let value = Cow::Owned(self.buf.clone());
                return Ok(TokenKind::Str { value, single });
            }
            debug_assert_eq!(bs[p], b'\\');
            self.unescape_next()?;
        }
    }

    fn unescape_next(&mut self) -> Result<()> {
        let Some(b) = self.bnext() else {
            return Err(self.err(self.pos, "unterminated string"));
        };
        match b {
            b'b' => self.buf.push('\x08'),
            b'f' => self.buf.push('\x0c'),
            b'n' => self.buf.push('\n'),
            b'r' => self.buf.push('\r'),
            b't' => self.buf.push('\t'),
            b'\\' => self.buf.push('\\'),
            b'/' => self.buf.push('/'),
            b'"' => self.buf.push('"'),
            b'\'' => self.buf.push('\''),
            b'u' => return self.read_hex_escape(),
            _ => return Err(self.err(self.pos - 1, "invalid escape sequence")),
        }
        Ok(())
    }

    fn hex4(&mut self) -> Result<u16> {
        let mut acc = 0;
        for _ in 0..4 {
            let Some(b) = self.bnext() else {
                return Err(self.err(self.pos, "unterminated \\u escape"));
            };
            let n = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => return Err(self.err(self.pos - 1, "invalid \\u escape")),
            };
            acc = acc * 16 + n as u16;
        }
        Ok(acc)
    }

    fn read_hex_escape(&mut self) -> Result<()> {
        // Unpaired surrogate halves become U+FFFD, following
        // https://www.unicode.org/review/pr-121.html algorithm 2
        // (maximal subparts of an illegal sequence).
        use core::char::REPLACEMENT_CHARACTER as REPLACEMENT;
        const TRAIL: core::ops::Range<u16> = 0xdc00..0xe000;

        let lead = self.hex4()?;
        if let Some(c) = char::from_u32(lead as u32) {
            self.buf.push(c);
            return Ok(());
        }
        if TRAIL.contains(&lead) {
            self.buf.push(REPLACEMENT);
            return Ok(());
        }
        let p = self.pos;
        if !self.bytes[p..].starts_with(b"\\u") {
            self.buf.push(REPLACEMENT);
            return Ok(());
        }
        self.pos += 2;
        let trail = self.hex4()?;
        if !TRAIL.contains(&trail) {
            // rewind so the second escape is decoded on its own
            self.pos = p;
            self.buf.push(REPLACEMENT);
            return Ok(());
        }
        let scalar = (((lead as u32 - 0xd800) << 10) | (trail as u32 - 0xdc00)) + 0x10000;
        // a well-formed surrogate pair always names a scalar value
        self.buf.push(char::from_u32(scalar).unwrap_or(REPLACEMENT));
        Ok(())
    }
}

fn is_word_byte(b: u8) -> bool {
    !matches!(
        b,
        b'{' | b'}' | b'[' | b']' | b':' | b',' | b'"' | b'\'' | b' ' | b'\t' | b'\n' | b'\r'
    ) && !b.is_ascii_control()
}

/// Full match against the RFC 8259 number grammar, then an f64 conversion.
/// Returns `None` for anything looser (leading zeros, bare `.5`, `1.`, ...).
fn parse_number(text: &str) -> Option<f64> {
    let b = text.as_bytes();
    let mut i = 0;
    if b.first() == Some(&b'-') {
        i += 1;
    }
    match b.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while matches!(b.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        _ => return None,
    }
    if b.get(i) == Some(&b'.') {
        i += 1;
        if !matches!(b.get(i), Some(b'0'..=b'9')) {
            return None;
        }
        while matches!(b.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if !matches!(b.get(i), Some(b'0'..=b'9')) {
            return None;
        }
        while matches!(b.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
    }
    if i != b.len() {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(s: &str) -> Vec<TokenKind<'_>> {
        let mut lx = Lexer::new(s);
        let mut out = vec![];
        while let Some(t) = lx.next_token().unwrap() {
            out.push(t.kind);
        }
        out
    }

    #[test]
    fn test_number_grammar() {
        for ok in ["0", "-0", "9", "-12", "0.125", "2e3", "2E+3", "2.5e-3", "1e00"] {
            assert!(parse_number(ok).is_some(), "{:?}", ok);
        }
        for bad in ["01", "1.", ".5", "--1", "1e", "1e+", "+1", "0x10", "1.2.3", "-", "1f"] {
            assert!(parse_number(bad).is_none(), "{:?}", bad);
        }
    }

    #[test]
    fn test_word_classification() {
        assert_eq!(kinds("true"), vec![TokenKind::True]);
        assert_eq!(kinds("truex"), vec![TokenKind::Ident("truex")]);
        assert_eq!(kinds("-1.5e2"), vec![TokenKind::Num(-150.0)]);
        assert_eq!(kinds("foo-bar"), vec![TokenKind::Ident("foo-bar")]);
        assert_eq!(kinds("01"), vec![TokenKind::Ident("01")]);
    }

    #[test]
    fn test_word_ends_at_comment() {
        assert_eq!(
            kinds("5//x"),
            vec![TokenKind::Num(5.0), TokenKind::LineComment]
        );
        assert_eq!(
            kinds("tr/**/ue"),
            vec![
                TokenKind::Ident("tr"),
                TokenKind::BlockComment,
                TokenKind::Ident("ue")
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let got = kinds(r#""\r\n\t\u0020\f\b\\\"\/\ud83d\uDE0B""#);
        assert_eq!(
            got,
            vec![TokenKind::Str {
                value: "\r\n\t\u{20}\x0c\x08\\\"/😋".into(),
                single: false
            }]
        );
        // lone surrogate halves decode to U+FFFD
        let got = kinds(r#""\ud83d1 \ude0b\ud83d\ude0b""#);
        assert_eq!(
            got,
            vec![TokenKind::Str {
                value: "\u{FFFD}1 \u{FFFD}😋".into(),
                single: false
            }]
        );
    }

    #[test]
    fn test_single_quotes() {
        assert_eq!(
            kinds(r#"'a"b'"#),
            vec![TokenKind::Str {
                value: r#"a"b"#.into(),
                single: true
            }]
        );
        assert_eq!(
            kinds("'it\\'s'"),
            vec![TokenKind::Str {
                value: "it's".into(),
                single: true
            }]
        );
    }

    #[test]
    fn test_offsets() {
        let mut lx = Lexer::new("  foo ");
        let t = lx.next_token().unwrap().unwrap();
        assert_eq!((t.start, t.end), (2, 5));
        assert_eq!(lx.next_token().unwrap(), None);
    }

    #[test]
    fn test_rejects() {
        for bad in ["\x00", "\"abc", "'abc", "\"\\q\"", "\"\\u12g4\"", "/* x", "\"a\nb\""] {
            let mut lx = Lexer::new(bad);
            let mut res = lx.next_token();
            while let Ok(Some(_)) = res {
                res = lx.next_token();
            }
            assert!(res.is_err(), "{:?}", bad);
        }
    }
}
