/// Errors reported by [`parse`](crate::parse), [`parse_with`](crate::parse_with)
/// and [`transform`](crate::transform).
///
/// `Syntax` carries the byte offset of the token (or byte) that could not be
/// accepted, and a message describing what was expected there. `BadOptions`
/// is raised for a malformed options argument before any input is examined.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { message: String, offset: usize },
    #[error("invalid options argument: {0}")]
    BadOptions(&'static str),
}

impl Error {
    /// Byte offset of a syntax error, `None` for options errors.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Syntax { offset, .. } => Some(*offset),
            Error::BadOptions(_) => None,
        }
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
