use pl_search::config::{BINDINGS, CALLS, COMMITS, MAX_DEPTH, RETRIES};
use pl_search::{
    conjunct, Candidates, Determinism, Engine, EngineConfig, Goal, Predicate, Term, Var,
};
use std::env;

#[derive(Debug)]
struct Member(Var, Vec<Term>);

impl Predicate for Member {
    fn initialize(&self, _engine: &mut Engine) -> Candidates {
        Candidates::bind(&self.0, self.1.clone())
    }
}

#[derive(Debug)]
struct Print(Vec<Term>);

impl Predicate for Print {
    fn determinism(&self) -> Determinism {
        Determinism::Deterministic
    }

    fn initialize(&self, _engine: &mut Engine) -> Candidates {
        println!("  {}", Term::list(self.0.clone()));
        Candidates::empty()
    }
}

fn member(var: &Var, values: &[&str]) -> Goal {
    Goal::pred(Member(var.clone(), values.iter().map(|&v| Term::atom(v)).collect()))
}

fn print(vars: &[&Var]) -> Goal {
    Goal::pred(Print(vars.iter().map(|&v| Term::from(v)).collect()))
}

fn main() {
    env_logger::init();
    let trace = env::args().any(|arg| arg == "--trace");
    let mut engine = Engine::with_config(EngineConfig::default().with_frame_tracing(trace));
    let (v1, v2, v3) = (Var::new(), Var::new(), Var::new());

    println!("All solutions:");
    engine.execute(&conjunct([
        member(&v1, &["1", "2"]),
        member(&v2, &["a", "b"]),
        print(&[&v1, &v2]),
        Goal::Fail,
    ]));

    println!("First solution:");
    engine.execute(&conjunct([
        member(&v1, &["1", "2"]),
        member(&v2, &["a", "b"]),
        print(&[&v1, &v2]),
    ]));

    println!("Once:");
    engine.execute(&conjunct([
        member(&v1, &["1", "2"]),
        Goal::once(member(&v2, &["1", "2"])),
        member(&v3, &["1", "2"]),
        print(&[&v1, &v2, &v3]),
        Goal::Fail,
    ]));

    println!("Disjunction:");
    engine.execute(&conjunct([
        Goal::disjunction([member(&v1, &["1", "2"]), member(&v1, &["a", "b"])]),
        Goal::once(member(&v2, &["1", "2"])),
        print(&[&v1, &v2]),
        Goal::Fail,
    ]));

    println!("Double negation:");
    let satisfiable = engine.execute(&conjunct([
        Goal::not_not(member(&v1, &["1", "2"])),
        print(&[&v1]),
    ]));
    println!("  succeeded: {satisfiable}");

    let stats = engine.statistics();
    println!("\nStatistics:");
    for name in [CALLS, RETRIES, BINDINGS, COMMITS, MAX_DEPTH] {
        println!("  {:<10} {:>8}", name, stats.get(name).unwrap_or(0));
    }
}
