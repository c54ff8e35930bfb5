//! Control-flow behaviour of the engine and its combinators.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{member, member_atoms, terms, FillFirstUnbound, Rows};
use pl_search::{conjunct, var, Determinism, Engine, Goal, Predicate, Term, Var};

#[test]
fn all_solutions_by_failing_after_each() {
    let (v1, v2) = (Var::new(), Var::new());
    let rows = Rows::new();
    let mut engine = Engine::new();
    let found = engine.execute(&conjunct([
        member(&v1, &[1, 2]),
        member_atoms(&v2, &["a", "b"]),
        rows.record(terms(&[&v1, &v2])),
        Goal::Fail,
    ]));
    assert!(!found);
    assert_eq!(rows.take(), vec!["[1, a]", "[1, b]", "[2, a]", "[2, b]"]);
    assert!(var(&Term::from(&v1)) && var(&Term::from(&v2)));
}

#[test]
fn first_solution_only() {
    let (v1, v2) = (Var::new(), Var::new());
    let rows = Rows::new();
    let mut engine = Engine::new();
    let found = engine.execute(&conjunct([
        member(&v1, &[1, 2]),
        member_atoms(&v2, &["a", "b"]),
        rows.record(terms(&[&v1, &v2])),
    ]));
    assert!(found);
    assert_eq!(rows.take(), vec!["[1, a]"]);
    assert!(v1.is_unbound() && v2.is_unbound());
}

#[test]
fn candidates_are_visited_in_order() {
    let v = Var::new();
    let rows = Rows::new();
    let mut engine = Engine::new();
    engine.execute(&conjunct([member(&v, &[1, 2]), rows.record(terms(&[&v])), Goal::Fail]));
    assert_eq!(rows.take(), vec!["[1]", "[2]"]);
}

#[test]
fn exploring_without_once() {
    let (v, w, x) = (Var::new(), Var::new(), Var::new());
    let rows = Rows::new();
    let mut engine = Engine::new();
    engine.execute(&conjunct([
        member(&v, &[1, 2]),
        member(&w, &[1, 2]),
        member(&x, &[1, 2]),
        rows.record(terms(&[&v, &w, &x])),
        Goal::Fail,
    ]));
    assert_eq!(rows.len(), 8);
}

#[test]
fn once_commits_to_first_solution() {
    let (v, w, x) = (Var::new(), Var::new(), Var::new());
    let rows = Rows::new();
    let mut engine = Engine::new();
    engine.execute(&conjunct([
        member(&v, &[1, 2]),
        Goal::once(member(&w, &[1, 2])),
        member(&x, &[1, 2]),
        rows.record(terms(&[&v, &w, &x])),
        Goal::Fail,
    ]));
    assert_eq!(
        rows.take(),
        vec!["[1, 1, 1]", "[1, 1, 2]", "[2, 1, 1]", "[2, 1, 2]"]
    );
}

#[test]
fn once_of_unsatisfiable_goal_fails() {
    let v = Var::new();
    let mut engine = Engine::new();
    let goal = conjunct([member(&v, &[1, 2]), Goal::once(Goal::Fail)]);
    assert!(!engine.execute(&goal));
    assert_eq!(engine.depth(), 0);
}

#[test]
fn once_skips_failing_candidates_before_committing() {
    let w = Var::new();
    let rows = Rows::new();
    let mut engine = Engine::new();
    // the first candidate of the inner chain fails, the second commits
    let inner = conjunct([member(&w, &[1, 2, 3]), member(&w, &[2, 3])]);
    engine.execute(&conjunct([Goal::once(inner), rows.record(terms(&[&w])), Goal::Fail]));
    assert_eq!(rows.take(), vec!["[2]"]);
}

#[test]
fn disjunction_exhausts_left_branch_first() {
    let (v1, v2) = (Var::new(), Var::new());
    let rows = Rows::new();
    let mut engine = Engine::new();
    engine.execute(&conjunct([
        Goal::disjunction([member(&v1, &[1, 2]), member_atoms(&v1, &["a", "b"])]),
        Goal::once(member(&v2, &[1, 2])),
        rows.record(terms(&[&v1, &v2])),
        Goal::Fail,
    ]));
    assert_eq!(rows.take(), vec!["[1, 1]", "[2, 1]", "[a, 1]", "[b, 1]"]);
}

#[test]
fn disjunction_branches_share_continuation() {
    let v = Var::new();
    let mut engine = Engine::new();
    let goal = conjunct([
        Goal::disjunction([member(&v, &[1]), member(&v, &[2]), Goal::Fail, member(&v, &[3])]),
        member(&v, &[2, 3]),
    ]);
    let found = engine.find_all(&goal, &Term::from(&v));
    assert_eq!(found, vec![Term::Int(2), Term::Int(3)]);
}

#[test]
fn deterministic_steps_do_not_add_alternatives() {
    let (v1, v2, v3) = (Var::new(), Var::new(), Var::new());
    let rows = Rows::new();
    let mut engine = Engine::new();
    engine.execute(&conjunct([
        member(&v1, &[1, 2]),
        member(&v2, &[1, 2]),
        rows.record(vec![Term::atom("v1"), Term::from(&v1)]),
        rows.record(vec![Term::atom("v2"), Term::from(&v2)]),
        member_atoms(&v3, &["a", "b"]),
        rows.record(vec![Term::atom("v3"), Term::from(&v3)]),
        Goal::Fail,
    ]));
    let expected: Vec<String> = [(1, 1), (1, 2), (2, 1), (2, 2)]
        .iter()
        .flat_map(|(a, b)| {
            vec![
                format!("[v1, {a}]"),
                format!("[v2, {b}]"),
                "[v3, a]".to_string(),
                "[v3, b]".to_string(),
            ]
        })
        .collect();
    assert_eq!(rows.take(), expected);
}

#[test]
fn loop_fills_every_variable() {
    let (v1, v2) = (Var::new(), Var::new());
    let iterations = Rc::new(Cell::new(0));
    let rows = Rows::new();
    let mut engine = Engine::new();
    let body = FillFirstUnbound {
        vars: vec![v1.clone(), v2.clone()],
        values: vec![1, 2],
        iterations: iterations.clone(),
    };
    let found = engine.execute(&conjunct([
        Goal::iterate(body),
        rows.record(terms(&[&v1, &v2])),
    ]));
    assert!(found);
    assert_eq!(iterations.get(), 2);
    assert_eq!(rows.take(), vec!["[1, 1]"]);
}

#[test]
fn loop_backtracks_through_iterations() {
    let (v1, v2) = (Var::new(), Var::new());
    let rows = Rows::new();
    let mut engine = Engine::new();
    let body = FillFirstUnbound {
        vars: vec![v1.clone(), v2.clone()],
        values: vec![1, 2],
        iterations: Rc::new(Cell::new(0)),
    };
    engine.execute(&conjunct([
        Goal::iterate(body),
        rows.record(terms(&[&v1, &v2])),
        Goal::Fail,
    ]));
    assert_eq!(rows.take(), vec!["[1, 1]", "[1, 2]", "[2, 1]", "[2, 2]"]);
}

#[test]
fn loop_fails_when_a_body_has_no_candidate() {
    let (v1, v2) = (Var::new(), Var::new());
    let mut engine = Engine::new();
    let body = FillFirstUnbound {
        vars: vec![v1.clone(), v2.clone()],
        values: Vec::new(),
        iterations: Rc::new(Cell::new(0)),
    };
    assert!(!engine.execute(&Goal::iterate(body)));
}

#[test]
fn not_not_keeps_no_bindings() {
    let v = Var::new();
    let rows = Rows::new();
    let mut engine = Engine::new();
    let found = engine.execute(&conjunct([
        Goal::not_not(member(&v, &[1, 2])),
        rows.record(terms(&[&v])),
    ]));
    assert!(found);
    let row = rows.take();
    assert_eq!(row.len(), 1);
    assert_ne!(row[0], "[1]");
    assert!(v.is_unbound());
}

#[test]
fn not_not_fails_for_unsatisfiable_goal() {
    let v = Var::new();
    let mut engine = Engine::new();
    let goal = Goal::not_not(conjunct([member(&v, &[1, 2]), member(&v, &[3])]));
    assert!(!engine.execute(&goal));
    assert!(v.is_unbound());
    assert!(engine.trail().is_empty());
}

#[test]
fn not_not_looks_past_a_failing_first_candidate() {
    let v = Var::new();
    let rows = Rows::new();
    let mut engine = Engine::new();
    let goal = conjunct([
        Goal::not_not(conjunct([member(&v, &[1, 2]), member(&v, &[2])])),
        rows.record(vec![Term::atom("after")]),
    ]);
    assert!(engine.execute(&goal));
    assert_eq!(rows.take(), vec!["[after]"]);
}

#[test]
fn not_not_runs_once_per_outer_candidate() {
    let (v, w) = (Var::new(), Var::new());
    let rows = Rows::new();
    let mut engine = Engine::new();
    engine.execute(&conjunct([
        member(&v, &[1, 2, 3]),
        Goal::not_not(conjunct([member(&w, &[2, 3]), member(&v, &[2, 3])])),
        rows.record(terms(&[&v, &w])),
        Goal::Fail,
    ]));
    let rendered: Vec<String> = rows.take();
    assert_eq!(rendered.len(), 2);
    assert!(rendered[0].starts_with("[2, X"));
    assert!(rendered[1].starts_with("[3, X"));
}

/// Unifies two terms once.
#[derive(Debug)]
struct Unify(Term, Term);

impl Predicate for Unify {
    fn determinism(&self) -> Determinism {
        Determinism::SemiDeterministic
    }

    fn validate(&self, engine: &mut Engine) -> bool {
        engine.unify(&self.0, &self.1)
    }
}

#[test]
fn answers_keep_cell_values_at_capture_time() {
    let x = Var::new();
    let cell = Var::cell(Term::Int(0));
    let mut engine = Engine::new();
    let goal = conjunct([
        member(&x, &[1, 2]),
        Goal::pred(Unify(Term::from(&cell), Term::from(&x))),
    ]);
    let template = Term::list(vec![Term::from(&x), Term::from(&cell)]);

    let answers: Vec<String> = engine
        .find_all(&goal, &template)
        .iter()
        .map(Term::to_string)
        .collect();
    assert_eq!(answers, vec!["[1, 1]", "[2, 2]"]);
    assert!(matches!(cell.binding(), Some(Term::Int(0))));
}

#[test]
fn repeated_runs_trace_identically() {
    let (v, w) = (Var::new(), Var::new());
    let rows = Rows::new();
    let goal = conjunct([
        member(&v, &[1, 2]),
        Goal::once(member(&w, &[3, 4])),
        rows.record(terms(&[&v, &w])),
        Goal::Fail,
    ]);
    let mut engine = Engine::new();
    engine.execute(&goal);
    let first = rows.take();
    engine.execute(&goal);
    assert_eq!(rows.take(), first);
    assert!(v.is_unbound() && w.is_unbound());
}

#[test]
fn separate_engines_are_independent() {
    let v = Var::new();
    let mut outer = Engine::new();
    let mut inner = Engine::new();
    let seen = inner.find_all(&member(&v, &[7, 8]), &Term::from(&v));
    assert!(outer.execute(&member(&v, &[1])));
    assert_eq!(seen, vec![Term::Int(7), Term::Int(8)]);
    assert_eq!(outer.depth() + inner.depth(), 0);
}
