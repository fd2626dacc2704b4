//! Evaluation of expressions

use std::collections::HashMap;
use std::rc::Rc;

use derive_more::Display;
use lazy_static::lazy_static;

use crate::closure::{Closure, Params};
use crate::env::Env;
use crate::error::{Error, Result};
use crate::symtab::{Symbol, ToSymbol};
use crate::value::Value;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum SpecialForm {
    /// (if cond then else)
    #[display(fmt = "if")]
    If,
    /// (lambda params body)
    #[display(fmt = "lambda")]
    Lambda,
    /// (quote expr)
    #[display(fmt = "quote")]
    Quote,
    /// (do exprs ...)
    #[display(fmt = "do")]
    Do,
    /// (print exprs ...)
    #[display(fmt = "print")]
    Print,
    #[display(fmt = "stash!")]
    Stash,
    #[display(fmt = "pop!")]
    Pop,
    #[display(fmt = "commit!")]
    Commit,
}

impl SpecialForm {
    pub const ALL: [SpecialForm; 8] = [
        SpecialForm::If,
        SpecialForm::Lambda,
        SpecialForm::Quote,
        SpecialForm::Do,
        SpecialForm::Print,
        SpecialForm::Stash,
        SpecialForm::Pop,
        SpecialForm::Commit,
    ];

    /// The form named by `sym`, if any. Keyed by interned identity.
    pub fn of_symbol(sym: Symbol) -> Option<SpecialForm> {
        SPECIAL_FORMS.get(&sym).copied()
    }
}

lazy_static! {
    static ref SPECIAL_FORMS: HashMap<Symbol, SpecialForm> = SpecialForm::ALL
        .iter()
        .map(|form| (form.to_string().to_symbol(), *form))
        .collect();
}

pub fn eval(expr: &Value, env: &Rc<Env>) -> Result<Value> {
    match expr {
        Value::Symbol(sym) => env.find(*sym),
        Value::List(items) => match items.split_first() {
            Some((head, args)) => match head.as_sym().and_then(SpecialForm::of_symbol) {
                Some(form) => eval_form(form, args, env),
                None => apply(items, env),
            },
            None => Err(Error::Type("cannot apply an empty list".into())),
        },
        Value::Unit
        | Value::Bool(_)
        | Value::Int(_)
        | Value::Float(_)
        | Value::Text(_)
        | Value::Closure(_)
        | Value::Primitive(_) => Ok(expr.clone()),
    }
}

fn eval_form(form: SpecialForm, args: &[Value], env: &Rc<Env>) -> Result<Value> {
    match form {
        SpecialForm::If => match args {
            [cond, then, else_] => {
                let branch = if eval(cond, env)?.is_truthy() { then } else { else_ };
                eval(branch, env)
            }
            _ => Err(Error::malformed(
                form,
                format!("expected condition, then and else, got {} argument(s)", args.len()),
            )),
        },
        SpecialForm::Lambda => match args {
            [params, body] => {
                let params = Params::from_value(params)?;
                Ok(Value::Closure(Rc::new(Closure::new(
                    params,
                    body.clone(),
                    Rc::clone(env),
                ))))
            }
            _ => Err(Error::malformed(
                form,
                format!("expected parameters and a body, got {} argument(s)", args.len()),
            )),
        },
        SpecialForm::Quote => match args {
            [quoted] => Ok(quoted.clone()),
            _ => Ok(Value::List(args.to_vec())),
        },
        SpecialForm::Do => {
            let mut last = Value::Unit;
            for arg in args {
                last = eval(arg, env)?;
            }
            Ok(last)
        }
        SpecialForm::Print => {
            let values = Value::List(eval_all(args, env)?);
            println!("{}", values);
            Ok(values)
        }
        SpecialForm::Stash | SpecialForm::Pop | SpecialForm::Commit => {
            log::debug!("`{}` is reserved and does nothing yet", form);
            Ok(Value::Unit)
        }
    }
}

fn eval_all(exprs: &[Value], env: &Rc<Env>) -> Result<Vec<Value>> {
    exprs.iter().map(|e| eval(e, env)).collect()
}

/// Evaluate operator then operands, left to right, and call.
fn apply(items: &[Value], env: &Rc<Env>) -> Result<Value> {
    let mut values = eval_all(items, env)?;
    let func = values.remove(0);
    match func {
        Value::Closure(closure) => closure.call(values),
        Value::Primitive(primitive) => primitive.call(&values),
        other => Err(Error::Type(format!("{} is not callable", other))),
    }
}
