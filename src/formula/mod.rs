pub mod dimacs;
mod simplify;

pub use simplify::Conflict;

use std::collections::HashSet;
use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;

/// A propositional variable. Variables read from DIMACS are numbered from 1.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Variable(pub usize);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Literal {
    Positive(Variable),
    Negative(Variable),
}

impl Literal {
    /// Converts a DIMACS literal. Returns `None` for 0, which is the clause terminator and never
    /// a literal.
    pub fn from_dimacs(literal: isize) -> Option<Self> {
        if literal > 0 {
            Some(Literal::Positive(Variable(literal.unsigned_abs())))
        } else if literal < 0 {
            Some(Literal::Negative(Variable(literal.unsigned_abs())))
        } else {
            None
        }
    }

    pub fn to_dimacs(&self) -> isize {
        match self {
            Literal::Positive(Variable(x)) => *x as isize,
            Literal::Negative(Variable(x)) => -(*x as isize),
        }
    }

    pub fn variable(&self) -> &Variable {
        match self {
            Literal::Positive(v) => v,
            Literal::Negative(v) => v,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Literal::Positive(_) => true,
            Literal::Negative(_) => false,
        }
    }

    pub fn idx(&self) -> usize {
        self.variable().0
    }

    pub fn negated(&self) -> Self {
        match self {
            Literal::Positive(v) => Literal::Negative(*v),
            Literal::Negative(v) => Literal::Positive(*v),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Literal::Positive(Variable(x)) => write!(f, "{}", x),
            Literal::Negative(Variable(x)) => write!(f, "-{}", x),
        }
    }
}

/// A disjunction of literals. Duplicate literals are dropped on construction; the remaining
/// literals keep the order in which they were first given.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(disjuncts: impl IntoIterator<Item = Literal>) -> Self {
        let mut seen = HashSet::new();
        Self {
            literals: disjuncts.into_iter().filter(|l| seen.insert(*l)).collect(),
        }
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.literals.contains(literal)
    }

    /// The single literal of a unit clause.
    pub fn unit(&self) -> Option<Literal> {
        match self.literals[..] {
            [literal] => Some(literal),
            _ => None,
        }
    }

    fn without(&self, literal: &Literal) -> Self {
        Self {
            literals: self.literals.iter().filter(|l| *l != literal).copied().collect(),
        }
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.literals.is_empty() {
            return f.write_str("false");
        }
        if self.literals.len() > 1 {
            f.write_str("(")?;
        }
        let mut first_literal = true;
        for literal in &self.literals {
            if first_literal {
                first_literal = false;
            } else {
                f.write_str(" | ")?;
            }
            write!(f, "{}", literal)?;
        }
        if self.literals.len() > 1 {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// A conjunction of clauses.
///
/// Clauses are immutable and shared between copies of a formula, so cloning a formula only
/// copies the clause list. [`Formula::simplify`] replaces the clauses it rewrites instead of
/// editing them, which keeps copies independent of each other.
#[derive(Clone, Default, PartialEq)]
pub struct Formula {
    clauses: Vec<Rc<Clause>>,
}

impl Formula {
    pub fn new(conjuncts: impl IntoIterator<Item = Clause>) -> Self {
        Self {
            clauses: conjuncts.into_iter().map(Rc::new).collect(),
        }
    }

    /// The largest variable index mentioned by any clause, or 0 for a formula without literals.
    pub fn num_variables(&self) -> usize {
        self.clauses()
            .flat_map(|clause| clause.literals())
            .map(|literal| literal.idx())
            .max()
            .unwrap_or(0)
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().map(|clause| clause.as_ref())
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Does every clause contain at least one literal of `model`?
    pub fn is_satisfied_by(&self, model: &[Literal]) -> bool {
        let model: HashSet<_> = model.iter().collect();
        self.clauses()
            .all(|clause| clause.literals().any(|literal| model.contains(literal)))
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.clauses.is_empty() {
            return f.write_str("true");
        }
        let mut first_clause = true;
        for clause in &self.clauses {
            if first_clause {
                first_clause = false;
            } else {
                f.write_str(" & ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

impl Debug for Formula {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
pub(crate) fn p(x: usize) -> Literal {
    Literal::Positive(Variable(x))
}

#[cfg(test)]
pub(crate) fn n(x: usize) -> Literal {
    Literal::Negative(Variable(x))
}

/// Builds a formula from DIMACS-style integer clauses.
#[cfg(test)]
pub(crate) fn cnf(clauses: &[&[isize]]) -> Formula {
    Formula::new(clauses.iter().map(|clause| {
        Clause::new(
            clause
                .iter()
                .map(|&l| Literal::from_dimacs(l).expect("0 is not a literal")),
        )
    }))
}

/// Random formulas over variables `1..=max_vars` with clauses of up to three literals. Empty
/// clauses are generated too.
#[cfg(test)]
pub(crate) fn formula_3sat_strategy(
    max_vars: usize,
    max_clauses: usize,
) -> impl proptest::strategy::Strategy<Value = Formula> {
    use proptest::prelude::*;

    (1..=max_vars).prop_flat_map(move |num_vars| {
        let literal = (1..=num_vars, any::<bool>())
            .prop_map(|(x, positive)| if positive { p(x) } else { n(x) });
        let clause = prop::collection::vec(literal, 0..=3).prop_map(Clause::new);
        prop::collection::vec(clause, 0..=max_clauses).prop_map(Formula::new)
    })
}
