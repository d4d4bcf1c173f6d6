use super::assignment::Assignment;
use super::Statistics;
use crate::formula::{Clause, Conflict, Formula, Literal};
use log::trace;
use std::collections::HashSet;

/// Applies unit propagation and pure literal elimination until neither makes progress, every
/// clause is satisfied, or a clause is falsified.
pub(crate) fn propagate(
    formula: &mut Formula,
    assignment: &mut Assignment,
    stats: &mut Statistics,
) -> Result<(), Conflict> {
    while !formula.is_empty() {
        if formula.has_empty_clause() {
            return Err(Conflict);
        }

        let unit = formula.clauses().find_map(Clause::unit);
        if let Some(unit) = unit {
            trace!("unit {}", unit);
            stats.unit_propagations += 1;
            assignment.assign(unit);
            formula.simplify(unit)?;
            continue;
        }

        let pure = pure_literals(formula);
        if pure.is_empty() {
            break;
        }
        for literal in pure {
            trace!("pure {}", literal);
            stats.pure_literals += 1;
            assignment.assign(literal);
            // Never fails: the negation of a pure literal occurs in no clause
            formula.simplify(literal)?;
        }
    }
    Ok(())
}

/// Literals whose negation occurs in no clause, in order of first occurrence.
fn pure_literals(formula: &Formula) -> Vec<Literal> {
    let mut seen = HashSet::new();
    let mut literals = vec![];
    for literal in formula.clauses().flat_map(|clause| clause.literals()) {
        if seen.insert(*literal) {
            literals.push(*literal);
        }
    }
    literals.retain(|literal| !seen.contains(&literal.negated()));
    literals
}
