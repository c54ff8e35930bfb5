//! A small logic-programming search core.
//!
//! Problems are written as chains of predicates that bind shared variables
//! through unification. The [`Engine`] runs a chain depth first, leftmost
//! first, undoing bindings through the trail and retrying earlier choices
//! whenever a step fails, in the manner of Prolog resolution.
//!
//! ```
//! use pl_search::{conjunct, Candidates, Engine, Goal, Predicate, Term, Var};
//!
//! #[derive(Debug)]
//! struct Member(Var, Vec<i64>);
//!
//! impl Predicate for Member {
//!     fn initialize(&self, _engine: &mut Engine) -> Candidates {
//!         Candidates::bind(&self.0, self.1.clone())
//!     }
//! }
//!
//! let x = Var::new();
//! let mut engine = Engine::new();
//! let goal = conjunct([Goal::pred(Member(x.clone(), vec![1, 2, 3]))]);
//! let all = engine.find_all(&goal, &Term::from(&x));
//! assert_eq!(all, vec![Term::Int(1), Term::Int(2), Term::Int(3)]);
//! assert!(Term::from(&x).is_var());
//! ```

pub mod config;
pub mod data;
pub mod engine;

pub use config::{EngineConfig, Statistics};
pub use data::{BindError, Structure, Term, Trail, Var, VariableId};
pub use engine::{
    conjunct, dereference, dereference_list, unify, var, Binding, Candidates,
    ChoiceHandler, Choice, Determinism, Engine, Goal, LoopBody, Predicate,
    Status, Strategy,
};
