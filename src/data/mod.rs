//! Core data structures: terms, variables, and the trail.
//!
//! Variables are shared by reference, so a binding made through one term is
//! visible through every other term mentioning the same variable. Every
//! change to a binding slot goes through the [`Trail`] so that it can be
//! undone on backtracking.

pub mod term;
pub mod trail;
pub mod var;

pub use term::{Structure, Term};
pub use trail::{Trail, TrailEntry};
pub use var::{BindError, Guard, Var, VariableId};
