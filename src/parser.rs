use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::options::{Warning, WarningKind};

/// Receives the grammar engine's walk. One recognizer drives both output
/// modes: the strict-text emitter and the value builder.
pub(crate) trait Sink<'a> {
    /// A token that belongs to the strict rendition of the input.
    fn token(&mut self, tok: &Token<'a>);
    /// An object member key (string or bare identifier).
    fn key(&mut self, tok: &Token<'a>);
    /// A token the strict rendition drops: a comment or a trailing comma.
    fn skipped(&mut self, tok: &Token<'a>);
}

/// Recursive descent over the token stream. With `relaxed` off, every
/// relaxed production fails at the offending token instead of warning,
/// which is all there is to strict-mode validation.
pub(crate) struct Parser<'a, S> {
    lexer: Lexer<'a>,
    peeked: Option<Token<'a>>,
    pending: Vec<Token<'a>>,
    relaxed: bool,
    record: bool,
    warnings: Vec<Warning>,
    sink: S,
}

impl<'a, S: Sink<'a>> Parser<'a, S> {
    pub(crate) fn new(text: &'a str, relaxed: bool, record: bool, sink: S) -> Self {
        Self {
            lexer: Lexer::new(text),
            peeked: None,
            pending: Vec::new(),
            relaxed,
            record,
            warnings: Vec::new(),
            sink,
        }
    }

    /// Parses exactly one top-level value and requires the rest of the
    /// input to be whitespace or (relaxed) comments.
    pub(crate) fn document(mut self) -> Result<(S, Vec<Warning>)> {
        let tok = self.require("value")?;
        self.value(tok)?;
        if let Some(tok) = self.advance()? {
            return Err(unexpected(&tok, "end of input"));
        }
        self.flush_skipped(usize::MAX);
        Ok((self.sink, self.warnings))
    }

    /// Next grammatical token; comments are collected here, so every token
    /// position transparently tolerates them.
    fn advance(&mut self) -> Result<Option<Token<'a>>> {
        if let Some(t) = self.peeked.take() {
            return Ok(Some(t));
        }
        loop {
            match self.lexer.next_token()? {
                Some(tok)
                    if matches!(tok.kind, TokenKind::LineComment | TokenKind::BlockComment) =>
                {
                    self.relaxation(WarningKind::Comment, tok.start)?;
                    self.pending.push(tok);
                }
                other => return Ok(other),
            }
        }
    }

    /// Hands buffered comments to the sink, oldest first, up to `before`.
    /// Peeking across a comma (see `close_follows`) buffers comments that
    /// sit after a token the sink has not seen yet, so each comment is
    /// released only once the sink has caught up to it in the source.
    fn flush_skipped(&mut self, before: usize) {
        let n = self.pending.iter().take_while(|c| c.start < before).count();
        for c in self.pending.drain(..n) {
            self.sink.skipped(&c);
        }
    }

    fn send(&mut self, tok: &Token<'a>) {
        self.flush_skipped(tok.start);
        self.sink.token(tok);
    }

    fn send_key(&mut self, tok: &Token<'a>) {
        self.flush_skipped(tok.start);
        self.sink.key(tok);
    }

    fn send_skipped(&mut self, tok: &Token<'a>) {
        self.flush_skipped(tok.start);
        self.sink.skipped(tok);
    }

    fn peek(&mut self) -> Result<Option<&Token<'a>>> {
        if self.peeked.is_none() {
            self.peeked = self.advance()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn require(&mut self, expected: &str) -> Result<Token<'a>> {
        match self.advance()? {
            Some(t) => Ok(t),
            None => Err(Error::Syntax {
                message: format!("expected {expected}, found end of input"),
                offset: self.lexer.offset(),
            }),
        }
    }

    /// Choke point for the four relaxed productions.
    fn relaxation(&mut self, kind: WarningKind, offset: usize) -> Result<()> {
        if !self.relaxed {
            return Err(Error::Syntax {
                message: format!("{} is not allowed in strict mode", kind.describe()),
                offset,
            });
        }
        if self.record {
            self.warnings.push(Warning { kind, offset });
        }
        Ok(())
    }

    fn value(&mut self, tok: Token<'a>) -> Result<()> {
        match tok.kind {
            TokenKind::Null | TokenKind::True | TokenKind::False | TokenKind::Num(_) => {
                self.send(&tok)
            }
            TokenKind::Str { single, .. } => {
                if single {
                    self.relaxation(WarningKind::SingleQuotedString, tok.start)?;
                }
                self.send(&tok);
            }
            TokenKind::Ident(_) => {
                self.relaxation(WarningKind::UnquotedIdentifier, tok.start)?;
                self.send(&tok);
            }
            TokenKind::ObjectBegin => {
                self.send(&tok);
                self.object()?;
            }
            TokenKind::ArrayBegin => {
                self.send(&tok);
                self.array()?;
            }
            _ => return Err(unexpected(&tok, "value")),
        }
        Ok(())
    }

    fn member_key(&mut self, tok: Token<'a>) -> Result<()> {
        match tok.kind {
            TokenKind::Str { single, .. } => {
                if single {
                    self.relaxation(WarningKind::SingleQuotedString, tok.start)?;
                }
                self.send_key(&tok);
                Ok(())
            }
            TokenKind::Ident(_) => {
                self.relaxation(WarningKind::UnquotedIdentifier, tok.start)?;
                self.send_key(&tok);
                Ok(())
            }
            _ => Err(unexpected(&tok, "object key")),
        }
    }

    /// `'{'` has been consumed and forwarded.
    fn object(&mut self) -> Result<()> {
        let mut tok = self.require("object key or '}'")?;
        if matches!(tok.kind, TokenKind::ObjectEnd) {
            self.send(&tok);
            return Ok(());
        }
        loop {
            self.member_key(tok)?;
            let colon = self.require("':'")?;
            if !matches!(colon.kind, TokenKind::Colon) {
                return Err(unexpected(&colon, "':'"));
            }
            self.send(&colon);
            let val = self.require("value")?;
            self.value(val)?;
            let sep = self.require("',' or '}'")?;
            match sep.kind {
                TokenKind::Comma => {
                    if self.close_follows(&sep, TokenKind::ObjectEnd)? {
                        return Ok(());
                    }
                    self.send(&sep);
                    tok = self.require("object key")?;
                }
                TokenKind::ObjectEnd => {
                    self.send(&sep);
                    return Ok(());
                }
                _ => return Err(unexpected(&sep, "',' or '}'")),
            }
        }
    }

    /// `'['` has been consumed and forwarded.
    fn array(&mut self) -> Result<()> {
        let mut tok = self.require("value or ']'")?;
        if matches!(tok.kind, TokenKind::ArrayEnd) {
            self.send(&tok);
            return Ok(());
        }
        loop {
            self.value(tok)?;
            let sep = self.require("',' or ']'")?;
            match sep.kind {
                TokenKind::Comma => {
                    if self.close_follows(&sep, TokenKind::ArrayEnd)? {
                        return Ok(());
                    }
                    self.send(&sep);
                    tok = self.require("value")?;
                }
                TokenKind::ArrayEnd => {
                    self.send(&sep);
                    return Ok(());
                }
                _ => return Err(unexpected(&sep, "',' or ']'")),
            }
        }
    }

    /// Trailing-comma handling, shared by objects and arrays: if the token
    /// after `comma` is the matching closer, the comma was trailing. It is
    /// dropped from the sink and the closer is consumed.
    fn close_follows(&mut self, comma: &Token<'a>, close: TokenKind<'static>) -> Result<bool> {
        let follows = matches!(self.peek()?, Some(t) if t.kind == close);
        if follows {
            self.relaxation(WarningKind::TrailingComma, comma.start)?;
            self.send_skipped(comma);
            let close = self.require(close.describe())?;
            self.send(&close);
        }
        Ok(follows)
    }
}

#[cold]
fn unexpected(tok: &Token<'_>, expected: &str) -> Error {
    Error::Syntax {
        message: format!("expected {}, found {}", expected, tok.kind.describe()),
        offset: tok.start,
    }
}
