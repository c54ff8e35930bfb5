//! Unification of terms against the shared trail.
//!
//! There is no occurs check. Bindings are destructive and trailed; a failed
//! unification may leave partial bindings behind, which the caller undoes by
//! backtracking the trail to an earlier mark.

use crate::data::{Term, Trail, Var};

/// Unify two terms, binding variables as needed.
pub fn unify(trail: &mut Trail, t1: &Term, t2: &Term) -> bool {
    let t1 = t1.deref();
    let t2 = t2.deref();

    if t1.identical(&t2) {
        return true;
    }

    match (&t1, &t2) {
        // two fresh variables: a guarded one is never bound to the other
        // while an unguarded one is available
        (Term::Var(left), Term::Var(right))
            if left.is_unbound() && right.is_unbound() =>
        {
            if left.is_restricted() && !right.is_restricted() {
                bind(trail, right, t1.clone())
            } else {
                bind(trail, left, t2.clone())
            }
        }
        (Term::Var(var), _) => bind(trail, var, t2.clone()),
        (_, Term::Var(var)) => bind(trail, var, t1.clone()),
        (Term::List(left), Term::List(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(a, b)| unify(trail, a, b))
        }
        (Term::Structure(value), _) => value.unify_with(&t2, trail),
        (_, Term::Structure(value)) => value.unify_with(&t1, trail),
        _ => false,
    }
}

/// Trail and bind `var`, treating a guard refusal as plain failure.
///
/// Rebinding an ordinary variable or closing a cycle means the trail
/// accounting is broken, so those abort instead of failing.
fn bind(trail: &mut Trail, var: &Var, value: Term) -> bool {
    if !var.admits(&value) {
        return false;
    }
    trail.record(var);
    match var.bind(value) {
        Ok(()) => true,
        Err(err) if err.is_invariant_violation() => panic!("invariant violation: {err}"),
        Err(err) => {
            log::trace!("unify: {err}");
            false
        }
    }
}

/// Dereference a term.
pub fn dereference(term: &Term) -> Term {
    term.deref()
}

/// Dereference every element of a slice.
pub fn dereference_list(terms: &[Term]) -> Vec<Term> {
    terms.iter().map(Term::deref).collect()
}

/// True iff the term is an unbound ordinary variable after dereferencing.
pub fn var(term: &Term) -> bool {
    term.is_var()
}
