use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::{Trail, Var};

/// Domain values that know how to unify with another term.
///
/// This is the single extension point for compound terms beyond plain
/// lists. Implementations unify their sub-terms through
/// [`crate::unify`], which records every binding on the supplied trail.
pub trait Structure: fmt::Debug {
    /// Unify `self` with `other`, which has already been dereferenced.
    fn unify_with(&self, other: &Term, trail: &mut Trail) -> bool;

    /// Copy of `self` with bound variables replaced by their values.
    fn resolve(&self) -> Option<Rc<dyn Structure>> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// A term: a variable, a ground value, a list, or a domain structure.
#[derive(Clone, Debug)]
pub enum Term {
    Var(Var),
    Int(i64),
    Atom(Rc<str>),
    List(Rc<[Term]>),
    Structure(Rc<dyn Structure>),
}

impl Term {
    pub fn atom(name: &str) -> Self {
        Term::Atom(Rc::from(name))
    }

    pub fn list(items: impl IntoIterator<Item = Term>) -> Self {
        Term::List(items.into_iter().collect())
    }

    pub fn structure(value: impl Structure + 'static) -> Self {
        Term::Structure(Rc::new(value))
    }

    /// Follow variable bindings until an unbound variable, a cell, or a
    /// non-variable value is reached.
    pub fn deref(&self) -> Term {
        match self {
            Term::Var(var) => var.deref(),
            other => other.clone(),
        }
    }

    /// True iff the term dereferences to an unbound ordinary variable.
    pub fn is_var(&self) -> bool {
        matches!(self.deref(), Term::Var(var) if var.is_unbound())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.deref() {
            Term::Int(value) => Some(value),
            _ => None,
        }
    }

    /// Elements of a list after dereferencing; `None` for anything else.
    pub fn as_list(&self) -> Option<Rc<[Term]>> {
        match self.deref() {
            Term::List(items) => Some(items),
            _ => None,
        }
    }

    /// Identity after dereferencing, without binding anything.
    ///
    /// Two unbound variables are identical only if they are the same
    /// variable, and an unbound variable is never identical to a value.
    pub fn identical(&self, other: &Term) -> bool {
        match (self.deref(), other.deref()) {
            (Term::Var(a), Term::Var(b)) => a.id() == b.id(),
            (Term::Var(_), _) | (_, Term::Var(_)) => false,
            (Term::Int(a), Term::Int(b)) => a == b,
            (Term::Atom(a), Term::Atom(b)) => a == b,
            (Term::List(a), Term::List(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| x.identical(y))
            }
            (Term::Structure(a), Term::Structure(b)) => Rc::ptr_eq(&a, &b),
            _ => false,
        }
    }

    /// Deep copy with every bound ordinary variable replaced by its value.
    ///
    /// A cell is replaced by a copy of the value it holds now, so the result
    /// does not change when the cell is later updated or backtracked.
    /// Unbound variables are kept as themselves.
    pub fn resolve(&self) -> Term {
        match self.deref() {
            Term::Var(var) if var.is_updatable() => match var.binding() {
                Some(value) => value.resolve(),
                None => Term::Var(var),
            },
            Term::List(items) => {
                Term::List(items.iter().map(Term::resolve).collect())
            }
            Term::Structure(value) => value
                .resolve()
                .map(Term::Structure)
                .unwrap_or(Term::Structure(value)),
            other => other,
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.identical(other)
    }
}

impl From<Var> for Term {
    fn from(var: Var) -> Self {
        Term::Var(var)
    }
}

impl From<&Var> for Term {
    fn from(var: &Var) -> Self {
        Term::Var(var.clone())
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::Int(value)
    }
}

impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Term::atom(name)
    }
}

impl From<Vec<Term>> for Term {
    fn from(items: Vec<Term>) -> Self {
        Term::List(items.into())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(var) => write!(f, "{var}"),
            Term::Int(value) => write!(f, "{value}"),
            Term::Atom(name) => write!(f, "{name}"),
            Term::List(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Term::Structure(value) => write!(f, "{value:?}"),
        }
    }
}
