//! Host primitives and the seeded global scope.

use std::cmp::Ordering;
use std::rc::{Rc, Weak};

use crate::config::Config;
use crate::env::Env;
use crate::error::{Error, Result};
use crate::git::GitScope;
use crate::interpret::eval;
use crate::parse::read_str;
use crate::symtab::ToSymbol;
use crate::value::{Primitive, Value};

/// Numeric view of an operand; ints stay exact until a float shows up.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(op: &'static str, value: &Value) -> Result<Num> {
        match value {
            Value::Int(i) => Ok(Num::Int(*i)),
            Value::Float(x) => Ok(Num::Float(*x)),
            other => Err(Error::Type(format!(
                "`{}` expects numbers, got {} {}",
                op,
                other.type_name(),
                other
            ))),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(x) => x,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Num::Int(i) => Value::Int(i),
            Num::Float(x) => Value::Float(x),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Arith {
    Add,
    Sub,
    Mul,
    Div,
}

impl Arith {
    fn name(self) -> &'static str {
        match self {
            Arith::Add => "+",
            Arith::Sub => "-",
            Arith::Mul => "*",
            Arith::Div => "/",
        }
    }

    fn apply(self, a: Num, b: Num) -> Result<Num> {
        match (a, b) {
            (Num::Int(a), Num::Int(b)) => {
                let result = match self {
                    Arith::Add => a.checked_add(b),
                    Arith::Sub => a.checked_sub(b),
                    Arith::Mul => a.checked_mul(b),
                    Arith::Div if b == 0 => return Err(Error::DivisionByZero),
                    Arith::Div => floor_div(a, b),
                };
                result.map(Num::Int).ok_or(Error::Overflow(self.name()))
            }
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                Ok(Num::Float(match self {
                    Arith::Add => a + b,
                    Arith::Sub => a - b,
                    Arith::Mul => a * b,
                    Arith::Div if b == 0.0 => return Err(Error::DivisionByZero),
                    Arith::Div => a / b,
                }))
            }
        }
    }

    fn fold(self, args: &[Value]) -> Result<Value> {
        let nums = args
            .iter()
            .map(|v| Num::of(self.name(), v))
            .collect::<Result<Vec<_>>>()?;
        let result = match (self, nums.as_slice()) {
            (Arith::Add, []) => Num::Int(0),
            (Arith::Mul, []) => Num::Int(1),
            (Arith::Sub, [only]) => Arith::Sub.apply(Num::Int(0), *only)?,
            (Arith::Sub | Arith::Div, []) | (Arith::Div, [_]) => {
                return Err(Error::ArityMismatch {
                    expected: 2,
                    got: nums.len(),
                })
            }
            (_, [first, rest @ ..]) => rest
                .iter()
                .try_fold(*first, |acc, n| self.apply(acc, *n))?,
        };
        Ok(result.into_value())
    }
}

/// Integer division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

fn expect_arity(args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::ArityMismatch {
            expected,
            got: args.len(),
        })
    }
}

fn compare(op: &'static str, args: &[Value]) -> Result<Ordering> {
    expect_arity(args, 2)?;
    let ordering = match (&args[0], &args[1]) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (a, b) => Num::of(op, a)?.as_f64().partial_cmp(&Num::of(op, b)?.as_f64()),
    };
    ordering.ok_or_else(|| Error::Type(format!("`{}` cannot order {} and {}", op, args[0], args[1])))
}

fn comparison(op: &'static str, accept: fn(Ordering) -> bool) -> Primitive {
    Primitive::new(op, move |args| Ok(Value::Bool(accept(compare(op, args)?))))
}

fn arithmetic(op: Arith) -> Primitive {
    Primitive::new(op.name(), move |args| op.fold(args))
}

/// Every primitive that needs nothing but its arguments.
pub fn primitives() -> Vec<Primitive> {
    vec![
        arithmetic(Arith::Add),
        arithmetic(Arith::Sub),
        arithmetic(Arith::Mul),
        arithmetic(Arith::Div),
        comparison(">", Ordering::is_gt),
        comparison("<", Ordering::is_lt),
        comparison(">=", Ordering::is_ge),
        comparison("<=", Ordering::is_le),
        Primitive::new("=", |args| {
            expect_arity(args, 2)?;
            Ok(Value::Bool(args[0] == args[1]))
        }),
        Primitive::new("not", |args| {
            expect_arity(args, 1)?;
            Ok(Value::Bool(!args[0].is_truthy()))
        }),
        Primitive::new("list", |args| Ok(Value::List(args.to_vec()))),
        Primitive::new("read", |args| {
            expect_arity(args, 1)?;
            match &args[0] {
                Value::Text(src) => read_str(src),
                other => Err(Error::Type(format!("`read` expects text, got {}", other))),
            }
        }),
    ]
}

/// `eval` holds the global scope weakly; the scope owns the primitive.
fn eval_primitive(global: Weak<Env>) -> Primitive {
    Primitive::new("eval", move |args| {
        expect_arity(args, 1)?;
        let env = global
            .upgrade()
            .ok_or_else(|| Error::Type("global environment is gone".into()))?;
        eval(&args[0], &env)
    })
}

/// A root scope with every primitive bound and no history fallback.
pub fn base_env() -> Rc<Env> {
    seed(None)
}

/// The interpreter's global scope: primitives plus a git fallback over the
/// configured repository.
pub fn global_env(config: &Config) -> Rc<Env> {
    seed(Some(GitScope::from_config(config)))
}

fn seed(git: Option<GitScope>) -> Rc<Env> {
    Rc::new_cyclic(|global| {
        primitives()
            .into_iter()
            .chain(std::iter::once(eval_primitive(global.clone())))
            .fold(Env::root(git), |env, p| {
                env.with_binding(p.name().to_symbol(), Value::Primitive(p))
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Result<Value> {
        eval(&read_str(src)?, &base_env())
    }

    #[test]
    fn test_arithmetic() {
        let test_cases = [
            ("(+ 1 2 3)", Value::Int(6)),
            ("(+)", Value::Int(0)),
            ("(* 2 3 4)", Value::Int(24)),
            ("(- 10 4 1)", Value::Int(5)),
            ("(- 3)", Value::Int(-3)),
            ("(/ 7 2)", Value::Int(3)),
            ("(/ -7 2)", Value::Int(-4)),
            ("(/ 7.0 2)", Value::Float(3.5)),
            ("(+ 1 0.5)", Value::Float(1.5)),
        ];
        for (src, expected) in test_cases {
            assert_eq!(run(src).unwrap(), expected, "{}", src);
        }
    }

    #[test]
    fn test_arithmetic_errors() {
        assert!(matches!(run("(/ 1 0)"), Err(Error::DivisionByZero)));
        assert!(matches!(run("(+ 9223372036854775807 1)"), Err(Error::Overflow("+"))));
        assert!(matches!(run("(+ 1 \"a\")"), Err(Error::Type(_))));
        assert!(matches!(run("(/ 4)"), Err(Error::ArityMismatch { expected: 2, got: 1 })));
    }

    #[test]
    fn test_comparisons() {
        let test_cases = [
            ("(< 1 2)", true),
            ("(> 1 2)", false),
            ("(>= 2 2.0)", true),
            ("(<= 3 2)", false),
            ("(< \"a\" \"b\")", true),
            ("(= 1 1)", true),
            ("(= '(1 a) (list 1 'a))", true),
            ("(= \"1\" 1)", false),
            ("(not #f)", true),
            ("(not 1)", false),
        ];
        for (src, expected) in test_cases {
            assert_eq!(run(src).unwrap(), Value::Bool(expected), "{}", src);
        }
        assert!(matches!(run("(< 1 2 3)"), Err(Error::ArityMismatch { .. })));
        assert!(matches!(run("(< 1 \"a\")"), Err(Error::Type(_))));
    }

    #[test]
    fn test_read_and_eval() {
        assert_eq!(run("(read \"(+ 1 2)\")").unwrap(), read_str("(+ 1 2)").unwrap());
        assert_eq!(run("(eval (read \"(+ 1 2)\"))").unwrap(), Value::Int(3));
        assert_eq!(run("(eval '(list 1 2))").unwrap(), read_str("(1 2)").unwrap());
        assert!(matches!(run("(read 1)"), Err(Error::Type(_))));
    }

    #[test]
    fn test_global_env_seeding() {
        let env = global_env(&Config::default());
        assert!(env.get("eval".to_symbol()).is_some());
        assert!(env.get("+".to_symbol()).is_some());
    }
}
