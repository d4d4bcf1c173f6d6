//! A DPLL satisfiability solver for propositional formulas in conjunctive normal form.
//!
//! ```
//! use dpllsat::{solve, Clause, Formula, Literal, Variable};
//!
//! let x = |i| Literal::Positive(Variable(i));
//! let f = Formula::new(vec![
//!     Clause::new(vec![x(1)]),
//!     Clause::new(vec![x(1).negated(), x(2)]),
//! ]);
//!
//! let (sat, model) = solve(f).into_parts();
//! assert!(sat);
//! assert_eq!(model, Some(vec![x(1), x(2)]));
//! ```

pub mod formula;
pub mod report;
mod solver;

#[cfg(test)]
mod brute_force;

/// The verdict of a solver run.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum SatResult {
    /// Satisfiable, with one literal per variable assigned during search, ordered by variable.
    /// Variables the search never had to assign are left out.
    Satisfiable(Vec<Literal>),
    Unsatisfiable,
}

impl SatResult {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatResult::Satisfiable(_))
    }

    pub fn model(&self) -> Option<&[Literal]> {
        match self {
            SatResult::Satisfiable(model) => Some(model),
            SatResult::Unsatisfiable => None,
        }
    }

    /// The `(is_satisfiable, model)` pair.
    pub fn into_parts(self) -> (bool, Option<Vec<Literal>>) {
        match self {
            SatResult::Satisfiable(model) => (true, Some(model)),
            SatResult::Unsatisfiable => (false, None),
        }
    }
}

pub use formula::dimacs::DimacsParseError;
pub use formula::{Clause, Conflict, Formula, Literal, Variable};
pub use solver::{solve, Solver, Statistics};
