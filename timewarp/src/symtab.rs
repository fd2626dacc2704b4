//! Process-wide symbol interning.
//!
//! Every distinct identifier text maps to exactly one canonical [`Symbol`].
//! The table only ever grows: symbols live for the rest of the process, which
//! is what makes them `Copy` and comparable by address.

use std::collections::HashSet;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, PoisonError};

use lazy_static::lazy_static;
use serde::{Serialize, Serializer};

lazy_static! {
    static ref SYMBOLS: Mutex<HashSet<&'static str>> = Mutex::new(HashSet::new());
}

/// An interned identifier. Two symbols are equal iff they are the same
/// registry entry; the text is never compared.
#[derive(Clone, Copy)]
pub struct Symbol {
    name: &'static str,
}

impl Symbol {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.name, other.name)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.name.as_ptr() as usize).hash(state)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#<{}>", self.name)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Return the canonical symbol for `name`, registering it on first use.
pub fn intern(name: &str) -> Symbol {
    let mut table = SYMBOLS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(&existing) = table.get(name) {
        return Symbol { name: existing };
    }
    let name: &'static str = Box::leak(name.to_owned().into_boxed_str());
    table.insert(name);
    Symbol { name }
}

pub trait ToSymbol {
    fn to_symbol(&self) -> Symbol;
}

impl ToSymbol for str {
    fn to_symbol(&self) -> Symbol {
        intern(self)
    }
}
