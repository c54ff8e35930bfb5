//! Goals and the control combinators built from them.
//!
//! A goal is an immutable description. Continuations are supplied by the
//! engine when a goal is called, so the same goal can appear in several
//! places (every branch of a disjunction shares the downstream
//! continuation) without rewiring anything at run time.

use std::fmt;
use std::rc::Rc;

use crate::engine::{Engine, Predicate};

/// Drives [`Goal::iterate`]: "while continues(state): run body(state)".
pub trait LoopBody: fmt::Debug {
    /// Whether another iteration should run.
    fn loop_continues(&self, engine: &Engine) -> bool;

    /// Build the goal for one iteration.
    fn make_body(&self, engine: &Engine) -> Goal;
}

/// Per-activation state of a choice-point search.
pub trait ChoiceHandler {
    /// Select the next unresolved decision and prepare its candidates.
    ///
    /// Returns false when nothing is left to decide, which completes the
    /// search successfully.
    fn generate_choice(&mut self, engine: &mut Engine) -> bool;

    /// Commit to the next candidate, apply it and propagate.
    ///
    /// Consumes exactly one candidate per call. `None` reports that the
    /// candidates are exhausted; `Some(false)` that this candidate failed.
    fn make_choice(&mut self, engine: &mut Engine) -> Option<bool>;
}

/// Creates a fresh [`ChoiceHandler`] for each level of a choice-point search.
pub trait Strategy: fmt::Debug {
    fn handler(&self) -> Box<dyn ChoiceHandler>;
}

/// A callable goal.
#[derive(Clone, Debug)]
pub enum Goal {
    /// Proceeds immediately.
    Succeed,
    /// Never succeeds.
    Fail,
    /// A user predicate.
    Call(Rc<dyn Predicate>),
    /// Conjunction, run left to right.
    Sequence(Rc<[Goal]>),
    /// Alternatives tried strictly left to right.
    Disjunction(Rc<[Goal]>),
    /// First solution only.
    Once(Rc<Goal>),
    /// Succeeds iff the goal is satisfiable, keeping none of its bindings.
    NotNot(Rc<Goal>),
    /// Tail-iterative loop.
    Loop(Rc<dyn LoopBody>),
    /// Handler-driven choose/propagate search.
    Search(Rc<dyn Strategy>),
}

impl Goal {
    pub fn pred(predicate: impl Predicate + 'static) -> Self {
        Goal::Call(Rc::new(predicate))
    }

    pub fn disjunction(branches: impl IntoIterator<Item = Goal>) -> Self {
        Goal::Disjunction(branches.into_iter().collect())
    }

    pub fn once(goal: Goal) -> Self {
        Goal::Once(Rc::new(goal))
    }

    pub fn not_not(goal: Goal) -> Self {
        Goal::NotNot(Rc::new(goal))
    }

    pub fn iterate(body: impl LoopBody + 'static) -> Self {
        Goal::Loop(Rc::new(body))
    }

    pub fn choice_point(strategy: impl Strategy + 'static) -> Self {
        Goal::Search(Rc::new(strategy))
    }
}

/// Chain goals so each runs on the success of the one before.
///
/// Purely structural: nothing is called.
pub fn conjunct(goals: impl IntoIterator<Item = Goal>) -> Goal {
    let mut goals: Vec<Goal> = goals.into_iter().collect();
    match goals.len() {
        0 => Goal::Succeed,
        1 => goals.remove(0),
        _ => Goal::Sequence(goals.into()),
    }
}
