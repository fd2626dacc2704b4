use std::process::ExitStatus;

use crate::interpret::SpecialForm;
use crate::symtab::Symbol;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unmatched close paren")]
    UnmatchedCloseParen,
    #[error("expected close paren")]
    ExpectedCloseParen,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unrecognized atom: {0:?}")]
    InvalidAtom(String),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("lookup error: {0}")]
    Lookup(Symbol),

    #[error("`{command}` failed with {status}")]
    ExternalProcess { command: String, status: ExitStatus },

    #[error("arity mismatch: expected {expected} argument(s), got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("malformed `{form}`: {reason}")]
    MalformedForm { form: SpecialForm, reason: String },

    #[error("type error: {0}")]
    Type(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in `{0}`")]
    Overflow(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(form: SpecialForm, reason: impl Into<String>) -> Self {
        Error::MalformedForm {
            form,
            reason: reason.into(),
        }
    }
}
