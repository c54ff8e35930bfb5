//! SEND + MORE = MONEY, solved with a choice-point search that picks the
//! first unassigned letter and propagates column sums after every choice.

use std::rc::Rc;

use pl_search::config::{CALLS, RETRIES};
use pl_search::{
    conjunct, Candidates, ChoiceHandler, Determinism, Engine, Goal, Predicate, Strategy, Term, Var,
};

fn digit(low: i64, high: i64) -> Var {
    Var::restricted(move |value| matches!(value, Term::Int(n) if (low..=high).contains(n)))
}

fn value(var: &Var) -> Option<i64> {
    Term::from(var).as_int()
}

/// One column: the digits above the line add up to `below + 10 * carry`.
#[derive(Debug)]
struct Column {
    above: Vec<Var>,
    below: Var,
    carry: Var,
}

#[derive(Debug)]
struct Puzzle {
    columns: Vec<Column>,
    letters: Vec<Var>,
    carries: Vec<Var>,
}

impl Puzzle {
    fn next_unassigned(&self) -> Option<(Var, Vec<i64>)> {
        if let Some(letter) = self.letters.iter().find(|v| v.is_unbound()) {
            let taken: Vec<i64> = self.letters.iter().filter_map(value).collect();
            let open = (0..=9).filter(|n| !taken.contains(n)).collect();
            return Some((letter.clone(), open));
        }
        let carry = self.carries.iter().find(|v| v.is_unbound())?;
        Some((carry.clone(), vec![0, 1, 2]))
    }

    fn propagate(&self, engine: &mut Engine) -> bool {
        let mut progress = true;
        while progress {
            progress = false;
            for column in &self.columns {
                let open: Vec<&Var> = column.above.iter().filter(|v| v.is_unbound()).collect();
                let known: i64 = column.above.iter().filter_map(value).sum();
                match open.as_slice() {
                    [] => {
                        progress |= column.below.is_unbound() || column.carry.is_unbound();
                        let below = Term::from(&column.below);
                        let carry = Term::from(&column.carry);
                        if !engine.unify(&below, &Term::Int(known % 10))
                            || !engine.unify(&carry, &Term::Int(known / 10))
                        {
                            return false;
                        }
                    }
                    [last] => {
                        let below = value(&column.below);
                        let (Some(below), Some(carry)) = (below, value(&column.carry)) else {
                            continue;
                        };
                        progress = true;
                        let missing = Term::Int(below + 10 * carry - known);
                        if !engine.unify(&Term::from(*last), &missing) {
                            return false;
                        }
                    }
                    _ => {}
                }
            }
        }
        let mut taken: Vec<i64> = self.letters.iter().filter_map(value).collect();
        let count = taken.len();
        taken.sort_unstable();
        taken.dedup();
        taken.len() == count
    }
}

struct Assign {
    puzzle: Rc<Puzzle>,
    current: Option<Var>,
    choices: std::vec::IntoIter<i64>,
}

impl ChoiceHandler for Assign {
    fn generate_choice(&mut self, _engine: &mut Engine) -> bool {
        match self.puzzle.next_unassigned() {
            Some((var, choices)) => {
                self.current = Some(var);
                self.choices = choices.into_iter();
                true
            }
            None => false,
        }
    }

    fn make_choice(&mut self, engine: &mut Engine) -> Option<bool> {
        let choice = self.choices.next()?;
        let var = self.current.clone()?;
        Some(engine.unify(&Term::from(&var), &Term::Int(choice)) && self.puzzle.propagate(engine))
    }
}

#[derive(Debug)]
struct Solve(Rc<Puzzle>);

impl Strategy for Solve {
    fn handler(&self) -> Box<dyn ChoiceHandler> {
        Box::new(Assign { puzzle: self.0.clone(), current: None, choices: Vec::new().into_iter() })
    }
}

#[derive(Debug)]
struct PrintSum {
    top: Vec<Var>,
    middle: Vec<Var>,
    result: Vec<Var>,
}

impl Predicate for PrintSum {
    fn determinism(&self) -> Determinism {
        Determinism::Deterministic
    }

    fn initialize(&self, _engine: &mut Engine) -> Candidates {
        let row = |vars: &[Var]| vars.iter().map(|v| v.to_string()).collect::<String>();
        println!("    {}", row(&self.top));
        println!("  + {}", row(&self.middle));
        println!("  ------");
        println!("   {}", row(&self.result));
        Candidates::empty()
    }
}

fn main() {
    env_logger::init();

    let [s, m] = [digit(1, 9), digit(1, 2)];
    let [e, n, d, o, r, y] = [(); 6].map(|_| digit(0, 9));
    let [c1, c2, c3] = [(); 3].map(|_| digit(0, 2));

    let column = |above: &[&Var], below: &Var, carry: &Var| Column {
        above: above.iter().map(|&v| v.clone()).collect(),
        below: below.clone(),
        carry: carry.clone(),
    };
    let puzzle = Rc::new(Puzzle {
        columns: vec![
            column(&[&d, &e], &y, &c1),
            column(&[&n, &r, &c1], &e, &c2),
            column(&[&e, &o, &c2], &n, &c3),
            column(&[&s, &m, &c3], &o, &m),
        ],
        letters: [&d, &e, &n, &r, &s, &m, &o, &y].map(Var::clone).to_vec(),
        carries: [&c1, &c2, &c3].map(Var::clone).to_vec(),
    });
    let print = PrintSum {
        top: [&s, &e, &n, &d].map(Var::clone).to_vec(),
        middle: [&m, &o, &r, &e].map(Var::clone).to_vec(),
        result: [&m, &o, &n, &e, &y].map(Var::clone).to_vec(),
    };

    let mut engine = Engine::new();
    let solved = engine.execute(&conjunct([Goal::choice_point(Solve(puzzle)), Goal::pred(print)]));
    println!("solved: {solved}");

    let stats = engine.statistics();
    println!(
        "calls: {}, retries: {}",
        stats.get(CALLS).unwrap_or(0),
        stats.get(RETRIES).unwrap_or(0)
    );
}
