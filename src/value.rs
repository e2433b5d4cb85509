use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::parser::Sink;
use crate::transform::write_quoted;
use core::fmt;

/// Object container: string keys, insertion order preserved.
pub type Map = indexmap::IndexMap<String, Value>;

/// The parsed value tree. Numbers are always `f64`, and every string-shaped
/// source token (double-quoted, single-quoted, bare identifier) collapses to
/// `Str`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Num(_))
    }
    pub fn is_str(&self) -> bool {
        matches!(self, Self::Str(_))
    }
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }
    pub fn at(&self, i: usize) -> Option<&Value> {
        self.as_array().and_then(|a| a.get(i))
    }
    pub fn take(&mut self) -> Value {
        core::mem::replace(self, Self::Null)
    }
}

static NULL: Value = Value::Null;

impl core::ops::Index<usize> for Value {
    type Output = Value;
    fn index(&self, i: usize) -> &Value {
        self.at(i).unwrap_or(&NULL)
    }
}
impl core::ops::Index<&str> for Value {
    type Output = Value;
    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}
impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Self::Array(a)
    }
}
impl From<Map> for Value {
    fn from(o: Map) -> Self {
        Self::Object(o)
    }
}

macro_rules! impl_from_num {
    ($($t:ident),*) => {$(
        impl From<$t> for Value {
            fn from(n: $t) -> Self { Self::Num(n as f64) }
        }
    )*};
}
impl_from_num!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl core::str::FromStr for Value {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        crate::parse(s)
    }
}

/// Compact strict JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Num(n) => write!(f, "{}", n),
            Self::Str(s) => write_quoted(f, s),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    fmt::Display::fmt(v, f)?;
                }
                f.write_str("]")
            }
            Self::Object(members) => {
                f.write_str("{")?;
                for (i, (k, v)) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_quoted(f, k)?;
                    f.write_str(":")?;
                    fmt::Display::fmt(v, f)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Parser sink that assembles the [`Value`] tree. The grammar engine only
/// forwards tokens in grammatical order, so a flat frame stack suffices.
#[derive(Default)]
pub(crate) struct Builder {
    stack: Vec<Frame>,
    root: Option<Value>,
}

enum Frame {
    Array(Vec<Value>),
    Object(Map, Option<String>),
}

impl Builder {
    pub(crate) fn finish(self) -> Value {
        debug_assert!(self.stack.is_empty());
        self.root.expect("parser accepted input without a value")
    }

    fn place(&mut self, v: Value) {
        match self.stack.last_mut() {
            None => self.root = Some(v),
            Some(Frame::Array(items)) => items.push(v),
            Some(Frame::Object(members, pending)) => {
                let k = pending.take().expect("member value without a key");
                // duplicate keys: the last occurrence wins, in both value
                // and insertion position
                members.shift_remove(&k);
                members.insert(k, v);
            }
        }
    }
}

impl<'a> Sink<'a> for Builder {
    fn token(&mut self, tok: &Token<'a>) {
        match &tok.kind {
            TokenKind::Null => self.place(Value::Null),
            TokenKind::True => self.place(Value::Bool(true)),
            TokenKind::False => self.place(Value::Bool(false)),
            TokenKind::Num(n) => self.place(Value::Num(*n)),
            TokenKind::Str { value, .. } => self.place(Value::Str(value.clone().into_owned())),
            TokenKind::Ident(s) => self.place(Value::Str((*s).into())),
            TokenKind::ObjectBegin => self.stack.push(Frame::Object(Map::new(), None)),
            TokenKind::ArrayBegin => self.stack.push(Frame::Array(Vec::new())),
            TokenKind::ObjectEnd | TokenKind::ArrayEnd => match self.stack.pop() {
                Some(Frame::Object(members, _)) => self.place(Value::Object(members)),
                Some(Frame::Array(items)) => self.place(Value::Array(items)),
                None => debug_assert!(false, "close token without an open container"),
            },
            TokenKind::Colon | TokenKind::Comma => {}
            TokenKind::LineComment | TokenKind::BlockComment => {
                debug_assert!(false, "comments are never grammatical tokens")
            }
        }
    }

    fn key(&mut self, tok: &Token<'a>) {
        let k = match &tok.kind {
            TokenKind::Str { value, .. } => value.clone().into_owned(),
            TokenKind::Ident(s) => (*s).into(),
            _ => unreachable!("parser keys are strings or identifiers"),
        };
        match self.stack.last_mut() {
            Some(Frame::Object(_, pending)) => *pending = Some(k),
            _ => debug_assert!(false, "key outside an object"),
        }
    }

    fn skipped(&mut self, _tok: &Token<'a>) {}
}
