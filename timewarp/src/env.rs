use std::collections::HashMap;
use std::rc::Rc;

use crate::closure::Params;
use crate::error::{Error, Result};
use crate::git::GitScope;
use crate::interpret::eval;
use crate::symtab::Symbol;
use crate::value::Value;

/// One scope of bindings. Scopes are shared through `Rc` and never written
/// after construction, so a closure sees exactly what existed when it was
/// created.
pub struct Env {
    bindings: HashMap<Symbol, Value>,
    parent: Option<Rc<Env>>,
    git: Option<GitScope>,
}

impl Env {
    /// A parentless scope. Only a root may fall back to git history.
    pub fn root(git: Option<GitScope>) -> Self {
        Env {
            bindings: HashMap::new(),
            parent: None,
            git,
        }
    }

    /// The call frame of a closure invocation.
    pub fn child(params: &Params, args: Vec<Value>, parent: Rc<Env>) -> Result<Rc<Env>> {
        Ok(Rc::new(Env {
            bindings: params.bind(args)?.into_iter().collect(),
            parent: Some(parent),
            git: None,
        }))
    }

    pub fn with_binding(mut self, sym: Symbol, value: Value) -> Self {
        self.bindings.insert(sym, value);
        self
    }

    pub fn into_rc(self) -> Rc<Env> {
        Rc::new(self)
    }

    /// Binding in this scope only.
    pub fn get(&self, sym: Symbol) -> Option<&Value> {
        self.bindings.get(&sym)
    }

    /// Resolve `sym`: this scope, then each parent in turn, then the git
    /// history of the terminal scope. A value loaded from history is
    /// evaluated here, at the lookup site.
    pub fn find(self: &Rc<Self>, sym: Symbol) -> Result<Value> {
        let mut scope: &Env = self;
        loop {
            if let Some(value) = scope.get(sym) {
                return Ok(value.clone());
            }
            match &scope.parent {
                Some(parent) => scope = &**parent,
                None => break,
            }
        }
        match &scope.git {
            Some(git) => {
                let expr = git.find(sym)?;
                eval(&expr, self)
            }
            None => Err(Error::Lookup(sym)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symtab::ToSymbol;

    #[test]
    fn test_find_walks_parents() {
        let root = Env::root(None)
            .with_binding("a".to_symbol(), Value::Int(1))
            .with_binding("b".to_symbol(), Value::Int(2))
            .into_rc();
        let params = Params::Fixed(vec!["b".to_symbol()]);
        let child = Env::child(&params, vec![Value::Int(20)], Rc::clone(&root)).unwrap();

        assert_eq!(child.find("a".to_symbol()).unwrap(), Value::Int(1));
        assert_eq!(child.find("b".to_symbol()).unwrap(), Value::Int(20));
        assert_eq!(root.find("b".to_symbol()).unwrap(), Value::Int(2));
        assert!(child.get("a".to_symbol()).is_none());
        assert_eq!(child.get("b".to_symbol()), Some(&Value::Int(20)));
    }

    #[test]
    fn test_lookup_error_names_identifier() {
        let root = Env::root(None).into_rc();
        match root.find("nowhere".to_symbol()) {
            Err(Error::Lookup(sym)) => assert_eq!(sym, "nowhere".to_symbol()),
            other => panic!("expected lookup error, got {:?}", other),
        }
    }

    #[test]
    fn test_variadic_child() {
        let root = Env::root(None).into_rc();
        let params = Params::Variadic("rest".to_symbol());
        let child = Env::child(&params, vec![Value::Int(1), Value::Int(2)], root).unwrap();
        assert_eq!(
            child.find("rest".to_symbol()).unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn test_arity_mismatch() {
        let root = Env::root(None).into_rc();
        let params = Params::Fixed(vec!["a".to_symbol(), "b".to_symbol()]);
        assert!(matches!(
            Env::child(&params, vec![Value::Int(1)], root),
            Err(Error::ArityMismatch { expected: 2, got: 1 })
        ));
    }
}
