//! The call stack and its run loop.
//!
//! Success is recursive: a predicate that succeeds calls its continuation
//! inline, so native stack depth grows with the length of the proof chain.
//! Failure is iterative: [`Engine::execute`] backtracks the top frame and
//! retries whatever frame is then on top, at constant native stack cost.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{self, EngineConfig, Statistics};
use crate::data::{Term, Trail};
use crate::engine::goal::{ChoiceHandler, Goal, Strategy};
use crate::engine::predicate::{Candidates, Determinism, Predicate};
use crate::engine::{conjunct, unify};

/// Outcome of a call or retry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Failure,
    /// Unconditional termination, produced only by a run's sentinel frame.
    Exit,
}

/// What to do once the current goal has succeeded.
#[derive(Debug)]
enum Continuation {
    /// End of the chain: the run has succeeded.
    Finish,
    /// Remaining goals of a sequence.
    Then { goals: Rc<[Goal]>, index: usize, next: Rc<Continuation> },
    Call { goal: Goal, next: Rc<Continuation> },
    /// End of a `Once`: drop every frame above `depth`, keeping bindings.
    Commit { depth: usize, next: Rc<Continuation> },
}

enum Activation {
    Sentinel,
    /// Deterministic and semi-deterministic steps; retired right away.
    Step,
    Candidates {
        predicate: Rc<dyn Predicate>,
        candidates: Candidates,
        next: Rc<Continuation>,
    },
    Branches { branches: Rc<[Goal]>, taken: usize, next: Rc<Continuation> },
    Search {
        strategy: Rc<dyn Strategy>,
        handler: Option<Box<dyn ChoiceHandler>>,
        next: Rc<Continuation>,
    },
}

impl Activation {
    fn label(&self) -> &'static str {
        match self {
            Activation::Sentinel => "sentinel",
            Activation::Step => "step",
            Activation::Candidates { .. } => "predicate",
            Activation::Branches { .. } => "disjunction",
            Activation::Search { .. } => "choice point",
        }
    }
}

/// One activation on the call stack and the trail length when it was pushed.
struct Frame {
    activation: Activation,
    mark: usize,
}

/// Owns the trail and call stack of independent searches.
pub struct Engine {
    config: EngineConfig,
    trail: Trail,
    frames: Vec<Frame>,
    stats: Statistics,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            trail: Trail::new(),
            frames: Vec::new(),
            stats: Statistics::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn reset_statistics(&mut self) {
        self.stats.clear();
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    #[cfg(test)]
    pub(crate) fn trail_mut(&mut self) -> &mut Trail {
        &mut self.trail
    }

    /// Number of frames currently on the call stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Unify two terms, trailing every binding made.
    pub fn unify(&mut self, t1: &Term, t2: &Term) -> bool {
        let before = self.trail.len();
        let unified = unify::unify(&mut self.trail, t1, t2);
        let recorded = self.trail.len().saturating_sub(before);
        self.count_by(config::BINDINGS, recorded as u64);
        unified
    }

    /// Run `goal` to its first solution or to exhaustion.
    ///
    /// Every binding made during the run is undone before returning, whatever
    /// the outcome. Anything the caller needs from a solution must be
    /// captured inside the goal, or through [`Engine::find_first`] and
    /// [`Engine::find_all`].
    ///
    /// May be called from inside a running predicate; the nested run is
    /// isolated above its own sentinel and leaves no bindings behind either.
    pub fn execute(&mut self, goal: &Goal) -> bool {
        log::debug!(
            "execute: start at depth {} (trail {})",
            self.frames.len(),
            self.trail.len()
        );
        let status = self.run(goal, Rc::new(Continuation::Finish));
        log::debug!("execute: finished with {status:?}");
        status == Status::Success
    }

    /// Resolved copy of `template` at the first solution of `goal`.
    pub fn find_first(&mut self, goal: &Goal, template: &Term) -> Option<Term> {
        let answers = Rc::new(RefCell::new(Vec::new()));
        let capture = Capture { template: template.clone(), answers: answers.clone() };
        self.execute(&conjunct([goal.clone(), Goal::pred(capture)]));
        answers.take().into_iter().next()
    }

    /// Resolved copies of `template` at every solution of `goal`, in search
    /// order.
    pub fn find_all(&mut self, goal: &Goal, template: &Term) -> Vec<Term> {
        let answers = Rc::new(RefCell::new(Vec::new()));
        let capture = Capture { template: template.clone(), answers: answers.clone() };
        self.execute(&conjunct([goal.clone(), Goal::pred(capture), Goal::Fail]));
        answers.take()
    }

    fn run(&mut self, goal: &Goal, finish: Rc<Continuation>) -> Status {
        let base = self.frames.len();
        let mark = self.trail.len();
        self.push(mark, Activation::Sentinel);

        let mut status = self.call(goal, finish);
        while status == Status::Failure {
            if let Some(mark) = self.frames.last().map(|frame| frame.mark) {
                self.undo_to(mark);
            }
            status = self.retry();
        }

        self.unwind(base);
        assert_eq!(self.trail.len(), mark, "trail out of balance after run");
        status
    }

    fn call(&mut self, goal: &Goal, next: Rc<Continuation>) -> Status {
        self.count(config::CALLS);
        match goal {
            Goal::Succeed => self.proceed(&next),
            Goal::Fail => Status::Failure,
            Goal::Call(predicate) => self.call_predicate(predicate, next),
            Goal::Sequence(goals) => self.call_sequence(goals, 0, next),
            Goal::Disjunction(branches) => {
                self.push(
                    self.trail.len(),
                    Activation::Branches { branches: branches.clone(), taken: 0, next },
                );
                self.retry()
            }
            Goal::Once(inner) => {
                self.enter_step();
                let depth = self.frames.len();
                self.call(inner, Rc::new(Continuation::Commit { depth, next }))
            }
            Goal::NotNot(inner) => {
                self.push(self.trail.len(), Activation::Step);
                let status = self.run(inner, Rc::new(Continuation::Finish));
                self.retire();
                match status {
                    Status::Success => self.proceed(&next),
                    _ => Status::Failure,
                }
            }
            Goal::Loop(body) => {
                self.enter_step();
                if body.loop_continues(self) {
                    let step = body.make_body(self);
                    let again = Continuation::Call { goal: goal.clone(), next };
                    self.call(&step, Rc::new(again))
                } else {
                    self.proceed(&next)
                }
            }
            Goal::Search(strategy) => {
                let mut handler = strategy.handler();
                self.push(
                    self.trail.len(),
                    Activation::Search {
                        strategy: strategy.clone(),
                        handler: None,
                        next: next.clone(),
                    },
                );
                if handler.generate_choice(self) {
                    if let Some(Frame {
                        activation: Activation::Search { handler: slot, .. },
                        ..
                    }) = self.frames.last_mut()
                    {
                        *slot = Some(handler);
                    }
                    self.retry()
                } else {
                    // nothing left to decide
                    self.retire();
                    self.proceed(&next)
                }
            }
        }
    }

    fn call_predicate(&mut self, predicate: &Rc<dyn Predicate>, next: Rc<Continuation>) -> Status {
        let mark = self.trail.len();
        match predicate.determinism() {
            Determinism::Nondeterministic => {
                let candidates = predicate.initialize(self);
                self.push(
                    mark,
                    Activation::Candidates { predicate: predicate.clone(), candidates, next },
                );
                self.retry()
            }
            Determinism::SemiDeterministic => {
                self.push(mark, Activation::Step);
                predicate.initialize(self);
                self.retire();
                if predicate.validate(self) {
                    self.proceed(&next)
                } else {
                    Status::Failure
                }
            }
            Determinism::Deterministic => {
                self.push(mark, Activation::Step);
                predicate.initialize(self);
                self.retire();
                self.proceed(&next)
            }
        }
    }

    fn call_sequence(
        &mut self,
        goals: &Rc<[Goal]>,
        index: usize,
        next: Rc<Continuation>,
    ) -> Status {
        let Some(goal) = goals.get(index) else {
            return self.proceed(&next);
        };
        let rest = if index + 1 < goals.len() {
            Rc::new(Continuation::Then { goals: goals.clone(), index: index + 1, next })
        } else {
            next
        };
        self.call(goal, rest)
    }

    fn proceed(&mut self, next: &Rc<Continuation>) -> Status {
        match &**next {
            Continuation::Finish => Status::Success,
            Continuation::Then { goals, index, next } => {
                self.call_sequence(goals, *index, next.clone())
            }
            Continuation::Call { goal, next } => self.call(goal, next.clone()),
            Continuation::Commit { depth, next } => {
                self.commit(*depth);
                self.proceed(next)
            }
        }
    }

    /// Try the next alternative of the frame on top of the stack.
    fn retry(&mut self) -> Status {
        self.count(config::RETRIES);
        let index = self.frames.len().saturating_sub(1);
        let Some(frame) = self.frames.last_mut() else {
            return Status::Exit;
        };
        if self.config.trace_frames {
            log::trace!("retry {} at depth {}", frame.activation.label(), index + 1);
        }
        match &mut frame.activation {
            Activation::Sentinel => Status::Exit,
            Activation::Step => self.exhausted(),
            Activation::Candidates { predicate, candidates, next } => match candidates.next() {
                None => self.exhausted(),
                Some(choice) => {
                    let predicate = predicate.clone();
                    let next = next.clone();
                    if choice.apply(self) && predicate.validate(self) {
                        self.proceed(&next)
                    } else {
                        Status::Failure
                    }
                }
            },
            Activation::Branches { branches, taken, next } => {
                match branches.get(*taken).cloned() {
                    None => self.exhausted(),
                    Some(branch) => {
                        *taken += 1;
                        let next = next.clone();
                        self.call(&branch, next)
                    }
                }
            }
            Activation::Search { strategy, handler, next } => {
                let strategy = strategy.clone();
                let next = next.clone();
                let Some(mut active) = handler.take() else {
                    return self.exhausted();
                };
                let outcome = active.make_choice(self);
                if let Some(Frame { activation: Activation::Search { handler, .. }, .. }) =
                    self.frames.get_mut(index)
                {
                    *handler = Some(active);
                }
                match outcome {
                    None => self.exhausted(),
                    Some(false) => Status::Failure,
                    Some(true) => self.call(&Goal::Search(strategy), next),
                }
            }
        }
    }

    /// The top frame has no alternatives left: pop it and fail.
    fn exhausted(&mut self) -> Status {
        self.pop();
        Status::Failure
    }

    fn push(&mut self, mark: usize, activation: Activation) {
        if self.config.trace_frames {
            log::trace!("push {} at depth {}", activation.label(), self.frames.len() + 1);
        }
        self.frames.push(Frame { activation, mark });
        self.count(config::FRAMES_PUSHED);
        if self.config.collect_statistics {
            self.stats.record_max(config::MAX_DEPTH, self.frames.len() as u64);
        }
    }

    /// Push and immediately retire a deterministic step.
    fn enter_step(&mut self) {
        self.push(self.trail.len(), Activation::Step);
        self.retire();
    }

    /// Remove the top frame and undo its trail span.
    fn pop(&mut self) {
        if let Some(frame) = self.frames.pop() {
            if self.config.trace_frames {
                log::trace!("pop {} at depth {}", frame.activation.label(), self.frames.len() + 1);
            }
            self.undo_to(frame.mark);
            self.count(config::FRAMES_POPPED);
        }
    }

    /// Remove the top frame, keeping its bindings as part of the proof.
    fn retire(&mut self) {
        if self.frames.pop().is_some() {
            self.count(config::FRAMES_RETIRED);
        }
    }

    /// Discard every frame above `depth` without undoing bindings.
    fn commit(&mut self, depth: usize) {
        let discarded = self.frames.len().saturating_sub(depth);
        self.frames.truncate(depth);
        if self.config.trace_frames {
            log::trace!("commit: discarded {discarded} frames down to depth {depth}");
        }
        self.count(config::COMMITS);
    }

    /// Pop every frame above `base`, undoing all of their bindings.
    fn unwind(&mut self, base: usize) {
        while self.frames.len() > base {
            self.pop();
        }
    }

    fn undo_to(&mut self, mark: usize) {
        let undone = self.trail.backtrack(mark);
        self.count_by(config::BINDINGS_UNDONE, undone as u64);
    }

    fn count(&mut self, name: &'static str) {
        self.count_by(name, 1);
    }

    fn count_by(&mut self, name: &'static str, amount: u64) {
        if self.config.collect_statistics && amount > 0 {
            self.stats.increment_by(name, amount);
        }
    }
}

/// Records a resolved copy of its template each time it is reached.
#[derive(Debug)]
struct Capture {
    template: Term,
    answers: Rc<RefCell<Vec<Term>>>,
}

impl Predicate for Capture {
    fn determinism(&self) -> Determinism {
        Determinism::Deterministic
    }

    fn initialize(&self, _engine: &mut Engine) -> Candidates {
        self.answers.borrow_mut().push(self.template.resolve());
        Candidates::empty()
    }
}
