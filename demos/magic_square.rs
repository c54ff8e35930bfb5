//! Enumerates the 3x3 magic squares. Each line of the square is an updatable
//! cell holding `[open cells, remaining sum]`, simplified as digits are placed
//! and restored automatically on backtracking.

use std::rc::Rc;

use pl_search::config::{MAX_DEPTH, RETRIES};
use pl_search::{
    conjunct, Candidates, Determinism, Engine, Goal, LoopBody, Predicate, Term, Var,
};

const SIZE: usize = 3;
const SUM: i64 = 15;

fn constraint(cells: Vec<Term>, remaining: i64) -> Term {
    Term::list(vec![Term::List(cells.into()), Term::Int(remaining)])
}

fn value(var: &Var) -> Option<i64> {
    Term::from(var).as_int()
}

fn simplify(engine: &mut Engine, lines: &[Var]) -> bool {
    let mut changed = true;
    while changed {
        changed = false;
        for line in lines {
            let Some(parts) = line.binding().and_then(|t| t.as_list()) else {
                return false;
            };
            let (Some(cells), Some(target)) = (parts[0].as_list(), parts[1].as_int()) else {
                return false;
            };
            if cells.is_empty() {
                if target != 0 {
                    return false;
                }
                continue;
            }
            let open: Vec<Term> = cells.iter().filter(|t| t.is_var()).cloned().collect();
            let remaining = target - cells.iter().filter_map(Term::as_int).sum::<i64>();
            if remaining < 0 {
                return false;
            }
            match open.len() {
                0 if remaining != 0 => return false,
                1 => {
                    changed = true;
                    if !engine.unify(&open[0], &Term::Int(remaining))
                        || !engine.unify(&Term::from(line), &constraint(Vec::new(), 0))
                    {
                        return false;
                    }
                }
                n if n < cells.len() => {
                    changed = true;
                    if !engine.unify(&Term::from(line), &constraint(open, remaining)) {
                        return false;
                    }
                }
                _ => {}
            }
        }
    }
    true
}

#[derive(Debug)]
struct Square {
    cells: Vec<Var>,
    lines: Vec<Var>,
}

impl Square {
    fn new() -> Self {
        let cells: Vec<Var> = (0..SIZE * SIZE)
            .map(|_| Var::restricted(|t| matches!(t, Term::Int(n) if (1..=9).contains(n))))
            .collect();
        let at = |row: usize, col: usize| Term::from(&cells[row * SIZE + col]);

        let mut lines = Vec::new();
        for i in 0..SIZE {
            lines.push((0..SIZE).map(|j| at(i, j)).collect::<Vec<_>>());
            lines.push((0..SIZE).map(|j| at(j, i)).collect());
        }
        lines.push((0..SIZE).map(|i| at(i, i)).collect());
        lines.push((0..SIZE).map(|i| at(i, SIZE - 1 - i)).collect());

        let lines = lines.into_iter().map(|line| Var::cell(constraint(line, SUM))).collect();
        Square { cells, lines }
    }

    fn used(&self) -> Vec<i64> {
        self.cells.iter().filter_map(value).collect()
    }
}

#[derive(Debug)]
struct Place {
    square: Rc<Square>,
    var: Var,
}

impl Predicate for Place {
    fn initialize(&self, _engine: &mut Engine) -> Candidates {
        let used = self.square.used();
        Candidates::bind(&self.var, (1..=9).filter(|n| !used.contains(n)).collect::<Vec<_>>())
    }

    fn validate(&self, engine: &mut Engine) -> bool {
        let mut used = self.square.used();
        let count = used.len();
        used.sort_unstable();
        used.dedup();
        used.len() == count && simplify(engine, &self.square.lines)
    }
}

#[derive(Debug)]
struct Fill(Rc<Square>);

impl LoopBody for Fill {
    fn loop_continues(&self, _engine: &Engine) -> bool {
        self.0.cells.iter().any(Var::is_unbound)
    }

    fn make_body(&self, _engine: &Engine) -> Goal {
        match self.0.cells.iter().find(|v| v.is_unbound()) {
            Some(var) => Goal::pred(Place { square: self.0.clone(), var: var.clone() }),
            None => Goal::Succeed,
        }
    }
}

#[derive(Debug)]
struct Show(Rc<Square>);

impl Predicate for Show {
    fn determinism(&self) -> Determinism {
        Determinism::Deterministic
    }

    fn initialize(&self, _engine: &mut Engine) -> Candidates {
        for row in self.0.cells.chunks(SIZE) {
            let row: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            println!("  {}", row.join(" "));
        }
        println!();
        Candidates::empty()
    }
}

fn main() {
    env_logger::init();

    let square = Rc::new(Square::new());
    let mut engine = Engine::new();
    engine.execute(&conjunct([
        Goal::iterate(Fill(square.clone())),
        Goal::pred(Show(square.clone())),
        Goal::Fail,
    ]));

    let stats = engine.statistics();
    println!(
        "retries: {}, deepest stack: {}",
        stats.get(RETRIES).unwrap_or(0),
        stats.get(MAX_DEPTH).unwrap_or(0)
    );
}
