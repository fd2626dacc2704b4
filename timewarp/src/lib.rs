//! A small Lisp whose unbound names resolve through git history.

pub mod builtins;
pub mod closure;
pub mod config;
pub mod env;
pub mod error;
pub mod git;
pub mod interpret;
pub mod lex;
pub mod parse;
pub mod symtab;
pub mod value;

use std::rc::Rc;

pub use builtins::{base_env, global_env};
pub use config::Config;
pub use env::Env;
pub use error::{Error, Result, SyntaxError};
pub use interpret::eval;
pub use parse::{read_str, Reader};
pub use value::Value;

/// Parse the first expression on `line` and evaluate it. A line with no
/// expression (blank, or only a comment) yields `None`.
pub fn eval_line(line: &str, env: &Rc<Env>) -> Result<Option<Value>> {
    match Reader::new(line.as_bytes()).next() {
        Some(expr) => eval(&expr?, env).map(Some),
        None => Ok(None),
    }
}
