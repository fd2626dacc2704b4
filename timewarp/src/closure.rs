use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use crate::env::Env;
use crate::error::{Error, Result};
use crate::interpret::{eval, SpecialForm};
use crate::symtab::Symbol;
use crate::value::Value;

/// Parameter list of a lambda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    /// `(lambda args body)`: every argument collected into one list.
    Variadic(Symbol),
    /// `(lambda (a b) body)`: exactly this many arguments.
    Fixed(Vec<Symbol>),
}

impl Params {
    pub fn from_value(value: &Value) -> Result<Self> {
        if let Some(sym) = value.as_sym() {
            return Ok(Params::Variadic(sym));
        }
        match value.as_list() {
            Some(items) => items
                .iter()
                .map(|item| {
                    item.as_sym().ok_or_else(|| {
                        Error::malformed(
                            SpecialForm::Lambda,
                            format!("parameter {} is not a symbol", item),
                        )
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Params::Fixed),
            None => Err(Error::malformed(
                SpecialForm::Lambda,
                format!("expected a symbol or a parameter list, got {}", value),
            )),
        }
    }

    /// Pair parameters with arguments.
    pub fn bind(&self, args: Vec<Value>) -> Result<Vec<(Symbol, Value)>> {
        match self {
            Params::Variadic(sym) => Ok(vec![(*sym, Value::List(args))]),
            Params::Fixed(params) if params.len() == args.len() => {
                Ok(params.iter().copied().zip(args).collect())
            }
            Params::Fixed(params) => Err(Error::ArityMismatch {
                expected: params.len(),
                got: args.len(),
            }),
        }
    }
}

/// A lambda together with the environment it was defined in.
pub struct Closure {
    pub params: Params,
    pub body: Value,
    pub env: Rc<Env>,
}

impl Closure {
    pub fn new(params: Params, body: Value, env: Rc<Env>) -> Self {
        Closure { params, body, env }
    }

    /// Each call evaluates the body in a fresh child of the captured
    /// environment.
    pub fn call(&self, args: Vec<Value>) -> Result<Value> {
        let frame = Env::child(&self.params, args, Rc::clone(&self.env))?;
        eval(&self.body, &frame)
    }
}

impl Debug for Closure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}
