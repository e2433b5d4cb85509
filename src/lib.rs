//! Parser for "relaxed JSON": standard JSON plus line/block comments,
//! trailing commas, single-quoted strings, and bare (unquoted) words. Input
//! is either rewritten into strict RFC 8259 text ([`transform`]) or parsed
//! into a [`Value`] tree ([`parse`], [`parse_with`]). On input that is
//! already strict, both behave exactly like a conforming JSON parser, and
//! `transform` returns its input byte for byte.
//!
//! ## Basic usage
//! ```
//! use relaxed_json::{json, parse, transform};
//! let v = parse("{ foo: 'bar', /* comment */ baz: [1, 2, ], }").unwrap();
//! assert_eq!(v, json!({"foo": "bar", "baz": [1, 2]}));
//! assert_eq!(transform("[1, 2, 3, ]").unwrap(), "[1, 2, 3 ]");
//! ```
//!
//! Strict validation is the same parser with the relaxations switched off:
//! ```
//! use relaxed_json::{parse_with, ParseOptions};
//! assert!(parse_with("[1, 2, 3, ]", ParseOptions::STRICT).is_err());
//! ```
//!
//! [`parse_with`] takes the full options surface: strict/relaxed mode, a
//! warning per accepted relaxation, and a post-parse [`Reviver`] callback
//! with the traversal and deletion semantics of the standard reviver
//! contract.

mod error;
mod lexer;
#[macro_use]
mod mac;
mod options;
mod parser;
mod revive;
mod transform;
mod value;

pub use error::{Error, Result};
pub use options::{OptionsArg, ParseOptions, Parsed, Warning, WarningKind};
pub use revive::Reviver;
pub use value::{Map, Value};

/// Rewrites relaxed JSON text into strict JSON text.
///
/// Accepts exactly what [`parse`] accepts and fails with the same errors.
/// Untouched substrings (including whitespace) are copied through verbatim,
/// so the function is the identity on strict input.
pub fn transform(text: &str) -> Result<String> {
    let emitter = transform::Emitter::new(text);
    let (emitter, _) = parser::Parser::new(text, true, false, emitter).document()?;
    Ok(emitter.finish())
}

/// Parses relaxed JSON text into a [`Value`] with default options.
pub fn parse(text: &str) -> Result<Value> {
    let builder = value::Builder::default();
    let (builder, _) = parser::Parser::new(text, true, false, builder).document()?;
    Ok(builder.finish())
}

/// Parses with explicit options: a [`ParseOptions`] value, a bare
/// [`Reviver`] callback, or `()` for the defaults. Any other argument shape
/// is rejected with [`Error::BadOptions`] before the input is looked at.
///
/// The returned [`Parsed`] carries the warnings recorded while parsing
/// (empty unless [`ParseOptions::warnings`] was set) next to the value.
pub fn parse_with<'r>(text: &str, options: impl Into<OptionsArg<'r>>) -> Result<Parsed> {
    let opts = options.into().into_options()?;
    let builder = value::Builder::default();
    let (builder, warnings) =
        parser::Parser::new(text, opts.relaxed, opts.warnings, builder).document()?;
    let built = builder.finish();
    let value = match opts.reviver {
        Some(reviver) => revive::revive(built, reviver),
        None => Some(built),
    };
    Ok(Parsed { value, warnings })
}
