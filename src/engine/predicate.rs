//! The contract every search step implements.
//!
//! A predicate is called once and, if nondeterministic, retried by the
//! engine until its candidates run out. The engine switches on
//! [`Determinism`] to decide whether a frame can ever be retried.

use std::fmt;

use crate::data::Term;
use crate::engine::Engine;

/// Determinism tier of a predicate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Determinism {
    /// Draws one candidate per try from a single-pass sequence.
    Nondeterministic,
    /// Runs the validation hook once; at most one solution.
    SemiDeterministic,
    /// Always succeeds exactly once after `initialize`.
    Deterministic,
}

/// One candidate drawn from a nondeterministic predicate.
pub trait Choice {
    /// Apply the choice, returning true iff it is acceptable.
    fn apply(&self, engine: &mut Engine) -> bool;
}

impl<F> Choice for F
where
    F: Fn(&mut Engine) -> bool,
{
    fn apply(&self, engine: &mut Engine) -> bool {
        self(engine)
    }
}

/// Choice that unifies a target term with a value.
#[derive(Clone, Debug)]
pub struct Binding {
    pub target: Term,
    pub value: Term,
}

impl Choice for Binding {
    fn apply(&self, engine: &mut Engine) -> bool {
        engine.unify(&self.target, &self.value)
    }
}

/// Lazily produced, single-pass sequence of candidate choices.
///
/// Once advanced, an element is never revisited; re-calling the predicate
/// builds a new sequence.
pub struct Candidates {
    inner: Box<dyn Iterator<Item = Box<dyn Choice>>>,
}

impl Candidates {
    pub fn empty() -> Self {
        Self { inner: Box::new(std::iter::empty()) }
    }

    /// Wrap any iterator of choices.
    pub fn new<I, C>(choices: I) -> Self
    where
        I: IntoIterator<Item = C>,
        I::IntoIter: 'static,
        C: Choice + 'static,
    {
        Self {
            inner: Box::new(
                choices
                    .into_iter()
                    .map(|choice| Box::new(choice) as Box<dyn Choice>),
            ),
        }
    }

    /// Candidates that unify `target` with each value in turn.
    pub fn bind<I>(target: impl Into<Term>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Term>,
        I::IntoIter: 'static,
    {
        let target = target.into();
        Self::new(
            values
                .into_iter()
                .map(move |value| Binding { target: target.clone(), value: value.into() }),
        )
    }
}

impl Iterator for Candidates {
    type Item = Box<dyn Choice>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl fmt::Debug for Candidates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidates").finish_non_exhaustive()
    }
}

/// A search step.
///
/// Nondeterministic predicates return their candidates from `initialize`;
/// each retry applies the next candidate and then runs `validate`.
/// Semi-deterministic predicates only run `validate`, once. Deterministic
/// predicates do all their work in `initialize` and always succeed.
pub trait Predicate: fmt::Debug {
    fn determinism(&self) -> Determinism {
        Determinism::Nondeterministic
    }

    /// Set up a fresh call. The returned candidates are ignored unless the
    /// predicate is nondeterministic.
    fn initialize(&self, _engine: &mut Engine) -> Candidates {
        Candidates::empty()
    }

    /// Validation or deduction run after a candidate has been applied.
    fn validate(&self, _engine: &mut Engine) -> bool {
        true
    }
}
