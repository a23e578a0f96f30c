//! The closed set of names an expression may refer to.
//!
//! A [`Registry`] maps identifiers to numeric constants and native functions.
//! It is built once through a [`RegistryBuilder`] and is read-only afterwards;
//! nothing reachable from an expression can add to it. The standard registry
//! holds `pi`, `e` and the math functions from [`math`].

mod math;


use core::fmt;

use hashbrown::HashMap;
use once_cell::sync::Lazy;
use static_assertions::assert_impl_all;

use crate::evaluator::RuntimeError;
use crate::values::Number;

pub use math::register_math;

/// Signature shared by every native function.
pub type NativeFn = fn(&[Number]) -> Result<Number, RuntimeError>;

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    /// Inclusive bounds.
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => (min..=max).contains(&count),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(1) => write!(f, "exactly 1 argument"),
            Arity::Exact(n) => write!(f, "exactly {} arguments", n),
            Arity::Range(min, max) => write!(f, "from {} to {} arguments", min, max),
        }
    }
}

/// A named native function with a fixed arity.
#[derive(Debug, Clone)]
pub struct Function {
    name: &'static str,
    arity: Arity,
    native: NativeFn,
}

impl Function {
    pub fn new(name: &'static str, arity: Arity, native: NativeFn) -> Self {
        Self {
            name,
            arity,
            native,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Check the argument count, then invoke the native implementation.
    pub fn call(&self, args: &[Number]) -> Result<Number, RuntimeError> {
        if !self.arity.accepts(args.len()) {
            return Err(RuntimeError::Arity {
                name: self.name.to_string(),
                expected: self.arity,
                given: args.len(),
            });
        }
        (self.native)(args)
    }
}

#[derive(Debug, Clone)]
pub enum Entry {
    Constant(Number),
    Function(Function),
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: HashMap<&'static str, Entry>,
}

assert_impl_all!(Registry: Send, Sync);

static STANDARD: Lazy<Registry> = Lazy::new(|| register_math(Registry::builder()).build());

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The process-wide registry of math constants and functions.
    ///
    /// Built on first use; every later call returns the same instance.
    pub fn standard() -> &'static Registry {
        &STANDARD
    }

    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn lookup_constant(&self, name: &str) -> Option<&Number> {
        match self.lookup(name)? {
            Entry::Constant(n) => Some(n),
            Entry::Function(_) => None,
        }
    }

    pub fn lookup_function(&self, name: &str) -> Option<&Function> {
        match self.lookup(name)? {
            Entry::Function(f) => Some(f),
            Entry::Constant(_) => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All bound names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects entries for a [`Registry`]. Binding a name twice keeps the
/// last binding.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<&'static str, Entry>,
}

impl RegistryBuilder {
    pub fn constant(mut self, name: &'static str, value: impl Into<Number>) -> Self {
        self.entries.insert(name, Entry::Constant(value.into()));
        self
    }

    pub fn function(mut self, name: &'static str, arity: Arity, native: NativeFn) -> Self {
        self.entries
            .insert(name, Entry::Function(Function::new(name, arity, native)));
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            entries: self.entries,
        }
    }
}
