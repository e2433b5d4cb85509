use crate::error::{Error, Result};
use crate::revive::Reviver;
use crate::value::Value;
use core::fmt;

/// Parsing configuration. Starts from a preset and chains:
///
/// ```
/// use relaxed_json::ParseOptions;
/// let opts = ParseOptions::RELAXED.warnings(true);
/// assert!(opts.relaxed && opts.warnings);
/// ```
#[derive(Clone, Copy)]
pub struct ParseOptions<'r> {
    /// Accept the relaxed grammar (default). With this off every relaxed
    /// construct is a syntax error, which is how strict validation works.
    pub relaxed: bool,
    /// Record a [`Warning`] for every relaxation that fires.
    pub warnings: bool,
    /// Post-parse transform callback, see [`Reviver`].
    pub reviver: Option<Reviver<'r>>,
}

impl<'r> ParseOptions<'r> {
    pub const RELAXED: Self = Self {
        relaxed: true,
        warnings: false,
        reviver: None,
    };
    pub const STRICT: Self = Self {
        relaxed: false,
        warnings: false,
        reviver: None,
    };

    pub const fn relaxed(mut self, on: bool) -> Self {
        self.relaxed = on;
        self
    }
    pub const fn warnings(mut self, on: bool) -> Self {
        self.warnings = on;
        self
    }
    pub fn reviver(mut self, r: Reviver<'r>) -> Self {
        self.reviver = Some(r);
        self
    }
}

impl Default for ParseOptions<'_> {
    fn default() -> Self {
        Self::RELAXED
    }
}

impl fmt::Debug for ParseOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("relaxed", &self.relaxed)
            .field("warnings", &self.warnings)
            .field("reviver", &self.reviver.map(|_| "..."))
            .finish()
    }
}

/// The second argument of [`parse_with`](crate::parse_with): omitted, a bare
/// reviver callback, or a full [`ParseOptions`]. Anything else converts to
/// `Invalid` and is rejected with [`Error::BadOptions`] before any lexing.
pub enum OptionsArg<'r> {
    Omitted,
    Reviver(Reviver<'r>),
    Config(ParseOptions<'r>),
    Invalid(&'static str),
}

impl<'r> OptionsArg<'r> {
    pub(crate) fn into_options(self) -> Result<ParseOptions<'r>> {
        match self {
            OptionsArg::Omitted => Ok(ParseOptions::default()),
            OptionsArg::Reviver(r) => Ok(ParseOptions::default().reviver(r)),
            OptionsArg::Config(opts) => Ok(opts),
            OptionsArg::Invalid(what) => Err(Error::BadOptions(what)),
        }
    }
}

impl From<()> for OptionsArg<'static> {
    fn from(_: ()) -> Self {
        OptionsArg::Omitted
    }
}
impl<'r> From<ParseOptions<'r>> for OptionsArg<'r> {
    fn from(opts: ParseOptions<'r>) -> Self {
        OptionsArg::Config(opts)
    }
}
impl<'r> From<Reviver<'r>> for OptionsArg<'r> {
    fn from(r: Reviver<'r>) -> Self {
        OptionsArg::Reviver(r)
    }
}
impl From<bool> for OptionsArg<'static> {
    fn from(_: bool) -> Self {
        OptionsArg::Invalid("expected a reviver callback or a ParseOptions value, found a boolean")
    }
}

/// A relaxation the parser accepted, reported at the token's byte offset.
/// Purely informational: recording warnings never changes the parse result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    TrailingComma,
    UnquotedIdentifier,
    SingleQuotedString,
    Comment,
}

impl WarningKind {
    pub fn describe(self) -> &'static str {
        match self {
            WarningKind::TrailingComma => "trailing comma",
            WarningKind::UnquotedIdentifier => "unquoted identifier",
            WarningKind::SingleQuotedString => "single-quoted string",
            WarningKind::Comment => "comment",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.kind.describe(), self.offset)
    }
}

/// Result of [`parse_with`](crate::parse_with). `value` is `None` only when
/// a reviver deleted the root (the reference primitive's `undefined`).
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub value: Option<Value>,
    pub warnings: Vec<Warning>,
}
