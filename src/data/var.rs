use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use super::Term;

static NEXT_VARIABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier used for variables.
///
/// Identifiers are process-unique and handed out in creation order, so two
/// unbound variables compare by age.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub u64);

impl VariableId {
    fn fresh() -> Self {
        Self(NEXT_VARIABLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{:02}", self.0)
    }
}

/// Reasons a binding can be refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BindError {
    /// An ordinary variable was bound a second time without backtracking.
    #[error("variable {0} is already bound")]
    AlreadyBound(VariableId),
    /// The value dereferences back to the variable being bound.
    #[error("binding {0} would create a cycle")]
    Cycle(VariableId),
    /// The variable's guard does not admit the value.
    #[error("variable {0} rejected the value")]
    Rejected(VariableId),
}

impl BindError {
    /// True for errors that indicate broken trail or frame accounting
    /// rather than an ordinary unification failure.
    pub fn is_invariant_violation(&self) -> bool {
        !matches!(self, BindError::Rejected(_))
    }
}

/// Predicate consulted before a restricted variable accepts a value.
pub type Guard = Rc<dyn Fn(&Term) -> bool>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum VarKind {
    Ordinary,
    Updatable,
}

struct VarCell {
    id: VariableId,
    kind: VarKind,
    guard: Option<Guard>,
    value: RefCell<Option<Term>>,
}

/// A logic variable shared between every term that mentions it.
///
/// Ordinary variables are bound at most once between backtracks and take
/// part in chain following. Updatable variables (cells) always hold a value,
/// stop dereferencing at themselves, and may be rebound through the trail.
#[derive(Clone)]
pub struct Var(Rc<VarCell>);

impl Var {
    /// Create a fresh unbound ordinary variable.
    pub fn new() -> Self {
        Self::build(VarKind::Ordinary, None, None)
    }

    /// Create an ordinary variable that only accepts values the guard admits.
    pub fn restricted(guard: impl Fn(&Term) -> bool + 'static) -> Self {
        Self::build(VarKind::Ordinary, Some(Rc::new(guard)), None)
    }

    /// Create an updatable cell holding `initial`.
    pub fn cell(initial: impl Into<Term>) -> Self {
        Self::build(VarKind::Updatable, None, Some(initial.into()))
    }

    fn build(kind: VarKind, guard: Option<Guard>, value: Option<Term>) -> Self {
        Self(Rc::new(VarCell {
            id: VariableId::fresh(),
            kind,
            guard,
            value: RefCell::new(value),
        }))
    }

    pub fn id(&self) -> VariableId {
        self.0.id
    }

    /// True if a guard restricts the values this variable accepts.
    pub fn is_restricted(&self) -> bool {
        self.0.guard.is_some()
    }

    pub fn is_updatable(&self) -> bool {
        self.0.kind == VarKind::Updatable
    }

    /// The raw binding slot, without following any chain.
    pub fn binding(&self) -> Option<Term> {
        self.0.value.borrow().clone()
    }

    /// True if this is an ordinary variable with an empty binding slot.
    pub fn is_unbound(&self) -> bool {
        !self.is_updatable() && self.0.value.borrow().is_none()
    }

    /// Follow the binding chain to its end.
    ///
    /// Returns the last unbound variable of the chain, the first cell met
    /// on the way, or the non-variable value the chain ends in.
    pub fn deref(&self) -> Term {
        let mut current = self.clone();
        loop {
            if current.is_updatable() {
                return Term::Var(current);
            }
            let next = match &*current.0.value.borrow() {
                None => None,
                Some(Term::Var(next)) => Some(next.clone()),
                Some(value) => return value.clone(),
            };
            match next {
                Some(next) => current = next,
                None => return Term::Var(current),
            }
        }
    }

    /// Whether the guard, if any, admits `value`.
    pub fn admits(&self, value: &Term) -> bool {
        self.0.guard.as_ref().map_or(true, |guard| guard(value))
    }

    /// Store `value` in the binding slot.
    ///
    /// Callers must record the old value on the trail first; unification
    /// does so through [`crate::Trail::record`].
    pub(crate) fn bind(&self, value: Term) -> Result<(), BindError> {
        if !self.is_updatable() && self.0.value.borrow().is_some() {
            return Err(BindError::AlreadyBound(self.id()));
        }
        if let Term::Var(target) = value.deref() {
            if target.id() == self.id() {
                return Err(BindError::Cycle(self.id()));
            }
        }
        if !self.admits(&value) {
            return Err(BindError::Rejected(self.id()));
        }
        *self.0.value.borrow_mut() = Some(value);
        Ok(())
    }

    /// Put back a value previously recorded on the trail.
    pub(crate) fn restore(&self, previous: Option<Term>) {
        *self.0.value.borrow_mut() = previous;
    }
}

impl Default for Var {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Var {}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.kind {
            VarKind::Ordinary => write!(f, "Var({})", self.id()),
            VarKind::Updatable => {
                write!(f, "Cell({}, {:?})", self.id(), self.binding())
            }
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_updatable() {
            return match self.binding() {
                Some(value) => write!(f, "Cell({value})"),
                None => write!(f, "Cell()"),
            };
        }
        match self.deref() {
            Term::Var(end) if !end.is_updatable() => write!(f, "{}", end.id()),
            value => write!(f, "{value}"),
        }
    }
}
