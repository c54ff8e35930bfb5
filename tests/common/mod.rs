//! Predicates shared by the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pl_search::{Candidates, Determinism, Engine, Goal, LoopBody, Predicate, Term, Var};

/// Binds a variable to each of its values in turn.
#[derive(Debug)]
pub struct Member {
    pub var: Var,
    pub values: Vec<Term>,
}

impl Predicate for Member {
    fn initialize(&self, _engine: &mut Engine) -> Candidates {
        Candidates::bind(&self.var, self.values.clone())
    }
}

pub fn member(var: &Var, values: &[i64]) -> Goal {
    Goal::pred(Member { var: var.clone(), values: values.iter().map(|&n| Term::Int(n)).collect() })
}

pub fn member_atoms(var: &Var, names: &[&str]) -> Goal {
    Goal::pred(Member { var: var.clone(), values: names.iter().map(|&n| Term::atom(n)).collect() })
}

/// Shared log of rendered rows.
#[derive(Clone, Debug, Default)]
pub struct Rows(Rc<RefCell<Vec<String>>>);

impl Rows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<String> {
        self.0.take()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Deterministic step that records the current values of `terms`.
    pub fn record(&self, terms: Vec<Term>) -> Goal {
        Goal::pred(Record { terms, rows: self.clone() })
    }
}

#[derive(Debug)]
struct Record {
    terms: Vec<Term>,
    rows: Rows,
}

impl Predicate for Record {
    fn determinism(&self) -> Determinism {
        Determinism::Deterministic
    }

    fn initialize(&self, _engine: &mut Engine) -> Candidates {
        let row = Term::list(self.terms.clone()).to_string();
        self.rows.0.borrow_mut().push(row);
        Candidates::empty()
    }
}

pub fn terms(vars: &[&Var]) -> Vec<Term> {
    vars.iter().map(|&v| Term::from(v)).collect()
}

/// Loop body that binds the first unbound variable to one of `values`.
#[derive(Debug)]
pub struct FillFirstUnbound {
    pub vars: Vec<Var>,
    pub values: Vec<i64>,
    pub iterations: Rc<Cell<usize>>,
}

impl LoopBody for FillFirstUnbound {
    fn loop_continues(&self, _engine: &Engine) -> bool {
        self.vars.iter().any(Var::is_unbound)
    }

    fn make_body(&self, _engine: &Engine) -> Goal {
        self.iterations.set(self.iterations.get() + 1);
        match self.vars.iter().find(|v| v.is_unbound()) {
            Some(var) => member(var, &self.values),
            None => Goal::Succeed,
        }
    }
}
