//! Expressions and runtime values share one type: code is data.

use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::closure::Closure;
use crate::error::Result;
use crate::symtab::Symbol;

pub type PrimitiveFn = dyn Fn(&[Value]) -> Result<Value>;

/// A host-provided function.
#[derive(Clone)]
pub struct Primitive {
    name: &'static str,
    func: Rc<PrimitiveFn>,
}

impl Primitive {
    pub fn new(name: &'static str, func: impl Fn(&[Value]) -> Result<Value> + 'static) -> Self {
        Primitive {
            name,
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.func)(args)
    }
}

impl Debug for Primitive {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#<primitive {}>", self.name)
    }
}

#[derive(Clone, Debug)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Rc<str>),
    Symbol(Symbol),
    List(Vec<Value>),
    Closure(Rc<Closure>),
    Primitive(Primitive),
}

impl Value {
    pub fn text(s: &str) -> Self {
        Value::Text(Rc::from(s))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Unit => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(x) => *x != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Symbol(_) | Value::Closure(_) | Value::Primitive(_) => true,
        }
    }

    pub fn as_sym(&self) -> Option<Symbol> {
        if let Value::Symbol(sym) = self {
            Some(*sym)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        if let Value::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Closure(_) => "lambda",
            Value::Primitive(_) => "primitive",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Unit, Unit) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Int(a), Float(b)) | (Float(b), Int(a)) => (*a as f64) == *b,
            (Text(a), Text(b)) => a == b,
            (Symbol(a), Symbol(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Closure(a), Closure(b)) => Rc::ptr_eq(a, b),
            (Primitive(a), Primitive(b)) => Rc::ptr_eq(&a.func, &b.func),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Unit => write!(f, "#<unit>"),
            Value::Bool(true) => write!(f, "#t"),
            Value::Bool(false) => write!(f, "#f"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Symbol(sym) => write!(f, "{}", sym),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::Closure(_) => write!(f, "#<lambda>"),
            Value::Primitive(p) => write!(f, "{:?}", p),
        }
    }
}

/// Externally tagged, so a parsed `(+ 1 x)` becomes
/// `{"Lst":[{"Sym":"+"},{"Int":1},{"Sym":"x"}]}`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Unit => serializer.serialize_unit_variant("Value", 0, "Unit"),
            Value::Bool(b) => serializer.serialize_newtype_variant("Value", 1, "Bool", b),
            Value::Int(i) => serializer.serialize_newtype_variant("Value", 2, "Int", i),
            Value::Float(x) => serializer.serialize_newtype_variant("Value", 3, "Float", x),
            Value::Text(s) => serializer.serialize_newtype_variant("Value", 4, "Text", &**s),
            Value::Symbol(sym) => serializer.serialize_newtype_variant("Value", 5, "Sym", sym),
            Value::List(items) => {
                serializer.serialize_newtype_variant("Value", 6, "Lst", &ListRef(items))
            }
            Value::Closure(_) => serializer.serialize_unit_variant("Value", 7, "Lambda"),
            Value::Primitive(p) => {
                serializer.serialize_newtype_variant("Value", 8, "Primitive", p.name())
            }
        }
    }
}

struct ListRef<'a>(&'a [Value]);

impl<'a> Serialize for ListRef<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in self.0 {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symtab::ToSymbol;

    #[test]
    fn test_truthiness() {
        let falsy = [
            Value::Unit,
            Value::Bool(false),
            Value::Int(0),
            Value::Float(0.0),
            Value::text(""),
            Value::List(vec![]),
        ];
        let truthy = [
            Value::Bool(true),
            Value::Int(-1),
            Value::Float(0.5),
            Value::text("no"),
            Value::Symbol("x".to_symbol()),
            Value::List(vec![Value::Unit]),
        ];
        assert!(falsy.iter().all(|v| !v.is_truthy()));
        assert!(truthy.iter().all(|v| v.is_truthy()));
    }

    #[test]
    fn test_display() {
        let v = Value::List(vec![
            Value::Symbol("quote".to_symbol()),
            Value::Int(1),
            Value::Float(2.0),
            Value::text("a\"b"),
            Value::Bool(true),
            Value::List(vec![]),
        ]);
        assert_eq!(v.to_string(), r#"(quote 1 2.0 "a\"b" #t ())"#);
        let p = Value::Primitive(Primitive::new("+", |_| Ok(Value::Unit)));
        assert_eq!(p.to_string(), "#<primitive +>");
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_ne!(Value::Int(2), Value::text("2"));
        let p = Primitive::new("id", |args| Ok(args[0].clone()));
        assert_eq!(Value::Primitive(p.clone()), Value::Primitive(p));
        assert_ne!(
            Value::Primitive(Primitive::new("a", |_| Ok(Value::Unit))),
            Value::Primitive(Primitive::new("a", |_| Ok(Value::Unit)))
        );
    }

    #[test]
    fn test_serialize() {
        let v = Value::List(vec![Value::Symbol("+".to_symbol()), Value::Int(1), Value::text("s")]);
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"Lst":[{"Sym":"+"},{"Int":1},{"Text":"s"}]}"#
        );
    }
}
