//! The search engine: unification, the predicate protocol, control
//! combinators, and the call stack that runs them.

mod goal;
mod machine;
mod predicate;
pub mod unify;

pub use goal::{conjunct, ChoiceHandler, Goal, LoopBody, Strategy};
pub use machine::{Engine, Status};
pub use predicate::{Binding, Candidates, Choice, Determinism, Predicate};
pub use unify::{dereference, dereference_list, unify, var};
